use crate::body::{FileUpload, MultipartBody, RequestBody};
use crate::catalog;
use crate::models::{DeleteDocumentResponse, DocumentAccepted};
use crate::operation::{Operation, OperationDescriptor};
use crate::request::OperationArgs;
use crate::response::ResponsePayload;
use crate::{ClientError, DecodeError};

/// Reads the upload and metadata into a form; an empty form means no body.
fn document_body(
    file: Option<FileUpload>,
    metadata: Option<String>,
) -> Result<RequestBody, ClientError> {
    let form = MultipartBody::new()
        .optional_file("file", file)?
        .optional_text("metadata", metadata);
    if form.is_empty() {
        Ok(RequestBody::None)
    } else {
        Ok(RequestBody::Multipart(form))
    }
}

/// Uploads a document. At least one of a file or metadata is required.
#[derive(Debug)]
pub struct AddDocument {
    environment_id: String,
    collection_id: String,
    file: Option<FileUpload>,
    metadata: Option<String>,
}

impl AddDocument {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
            file: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: FileUpload) -> Self {
        self.file = Some(file);
        self
    }

    /// Metadata as a serialized JSON object, sent as a text part.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

impl Operation for AddDocument {
    type Output = DocumentAccepted;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::ADD_DOCUMENT;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        let body = document_body(self.file, self.metadata)?;
        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .path_param("collection_id", self.collection_id)
            .body(body))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

/// Replaces a document. At least one of a file or metadata is required.
#[derive(Debug)]
pub struct UpdateDocument {
    environment_id: String,
    collection_id: String,
    document_id: String,
    file: Option<FileUpload>,
    metadata: Option<String>,
}

impl UpdateDocument {
    pub fn new(
        environment_id: impl Into<String>,
        collection_id: impl Into<String>,
        document_id: impl Into<String>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
            document_id: document_id.into(),
            file: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: FileUpload) -> Self {
        self.file = Some(file);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

impl Operation for UpdateDocument {
    type Output = DocumentAccepted;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::UPDATE_DOCUMENT;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        let body = document_body(self.file, self.metadata)?;
        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .path_param("collection_id", self.collection_id)
            .path_param("document_id", self.document_id)
            .body(body))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[derive(Clone, Debug)]
pub struct DeleteDocument {
    environment_id: String,
    collection_id: String,
    document_id: String,
}

impl DeleteDocument {
    pub fn new(
        environment_id: impl Into<String>,
        collection_id: impl Into<String>,
        document_id: impl Into<String>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
            document_id: document_id.into(),
        }
    }
}

impl Operation for DeleteDocument {
    type Output = DeleteDocumentResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::DELETE_DOCUMENT;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .path_param("collection_id", self.collection_id)
            .path_param("document_id", self.document_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use super::{AddDocument, UpdateDocument};
    use crate::body::{DEFAULT_CONTENT_TYPE, FileUpload, PartContent};
    use crate::operation::Operation;
    use crate::request::build_request;
    use crate::{ClientError, ValidationError};

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn neither_file_nor_metadata_is_rejected() {
        let args = AddDocument::new("env-1", "c1").into_args().expect("args");
        let error = build_request(AddDocument::DESCRIPTOR, args).expect_err("nothing to upload");
        assert_eq!(
            error,
            ValidationError::MissingBodyAlternative {
                operation_id: "addDocument".to_owned(),
                alternatives: vec!["file".to_owned(), "metadata".to_owned()],
            }
        );
    }

    #[test]
    fn file_part_gets_filename_and_default_type() {
        let args = AddDocument::new("env-1", "c1")
            .with_file(FileUpload::from_bytes(b"<html/>".to_vec()).with_filename("page.html"))
            .into_args()
            .expect("args");
        let request = build_request(AddDocument::DESCRIPTOR, args).expect("valid");

        let form = request.body.as_multipart().expect("multipart");
        assert!(!form.has_part("metadata"));
        assert_eq!(
            form.part("file").map(|part| &part.content),
            Some(&PartContent::Binary {
                data: b"<html/>".to_vec(),
                filename: Some("page.html".to_owned()),
                content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            })
        );
    }

    #[test]
    fn metadata_alone_is_enough() {
        let args = UpdateDocument::new("env-1", "c1", "doc-1")
            .with_metadata(r#"{"author": "ann"}"#)
            .into_args()
            .expect("args");
        let request = build_request(UpdateDocument::DESCRIPTOR, args).expect("valid");
        assert_eq!(
            request.path,
            "/v1/environments/env-1/collections/c1/documents/doc-1"
        );
        assert!(request.body.as_multipart().is_some_and(|form| form.has_part("metadata")));
    }

    #[test]
    fn unreadable_file_fails_before_building() {
        let error = AddDocument::new("env-1", "c1")
            .with_file(FileUpload::new(BrokenPipe))
            .into_args()
            .expect_err("read fails");
        assert!(matches!(error, ClientError::Upload { ref part, .. } if part == "file"));
    }
}
