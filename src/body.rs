//! Request body assembly.
//!
//! JSON bodies are sparse: they are written with [`ObjectWriter`], whose
//! optional setters leave unset fields out entirely. Multipart bodies combine
//! binary upload parts and text parts; uploads are read fully when added, so
//! the caller's stream is released as soon as the body is assembled.

use std::fmt;
use std::io::{Cursor, Read};

use serde_json::Value;

use crate::ClientError;
use crate::codec::ObjectWriter;

/// Content type used for binary parts that do not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A fully assembled request body.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    None,
    Json(Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    /// Wraps the fields written so far as a JSON object body.
    pub fn sparse(writer: ObjectWriter) -> Self {
        Self::Json(writer.into_value())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartBody> {
        match self {
            Self::Multipart(body) => Some(body),
            _ => None,
        }
    }
}

/// A caller-owned stream to upload as one multipart part.
pub struct FileUpload {
    reader: Box<dyn Read + Send>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl FileUpload {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            filename: None,
            content_type: None,
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Cursor::new(bytes.into()))
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn into_part_content(mut self, part: &str) -> Result<PartContent, ClientError> {
        let mut data = Vec::new();
        self.reader
            .read_to_end(&mut data)
            .map_err(|source| ClientError::Upload {
                part: part.to_owned(),
                source,
            })?;
        Ok(PartContent::Binary {
            data,
            filename: self.filename,
            content_type: self
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
        })
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PartContent {
    Binary {
        data: Vec<u8>,
        filename: Option<String>,
        content_type: String,
    },
    Text {
        value: String,
        content_type: Option<String>,
    },
}

/// One named multipart part.
#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    pub name: String,
    pub content: PartContent,
}

/// Multipart form body, parts kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipartBody {
    parts: Vec<Part>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binary part, reading the upload to its end.
    pub fn file(mut self, name: impl Into<String>, upload: FileUpload) -> Result<Self, ClientError> {
        let name = name.into();
        let content = upload.into_part_content(&name)?;
        self.parts.push(Part { name, content });
        Ok(self)
    }

    pub fn optional_file(
        self,
        name: impl Into<String>,
        upload: Option<FileUpload>,
    ) -> Result<Self, ClientError> {
        match upload {
            Some(upload) => self.file(name, upload),
            None => Ok(self),
        }
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            content: PartContent::Text {
                value: value.into(),
                content_type: None,
            },
        });
        self
    }

    #[must_use]
    pub fn optional_text(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    /// Adds a text part carrying serialized JSON.
    #[must_use]
    pub fn json(mut self, name: impl Into<String>, value: &Value) -> Self {
        self.parts.push(Part {
            name: name.into(),
            content: PartContent::Text {
                value: value.to_string(),
                content_type: Some("application/json".to_owned()),
            },
        });
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.name == name)
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }
}
