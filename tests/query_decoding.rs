use std::sync::Mutex;

use discovery_client::codec::Model;
use discovery_client::models::{QueryAggregation, QueryResult};
use discovery_client::operations::QueryCollection;
use discovery_client::{
    ClientError, DecodeError, DiscoveryClient, OperationArgs, RawResponse, Transport,
    TransportError, WireRequest,
};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};

/// Answers every request with one canned body and keeps what it was sent.
struct FixedTransport {
    body: Value,
    seen: Mutex<Vec<WireRequest>>,
}

impl FixedTransport {
    fn new(body: Value) -> Self {
        Self {
            body,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Transport for FixedTransport {
    async fn send(&self, request: WireRequest) -> Result<RawResponse, TransportError> {
        self.seen
            .lock()
            .map_err(|_| TransportError::Other("poisoned".to_owned()))?
            .push(request);
        Ok(RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: self.body.to_string().into_bytes(),
        })
    }
}

fn query_response() -> Value {
    json!({
        "matching_results": 24,
        "results": [
            {
                "id": "doc-1",
                "collection_id": "c1",
                "result_metadata": {
                    "score": 1.5,
                    "extracted_metadata.filename": "tokio.html"
                },
                "title": "Tokio internals",
                "enriched_text": {"entities": [{"type": "Company", "text": "Tokio"}]}
            }
        ],
        "aggregations": [
            {
                "type": "nested",
                "path": "enriched_text.entities",
                "matching_results": 24,
                "aggregations": [
                    {
                        "type": "term",
                        "field": "enriched_text.entities.type",
                        "count": 2,
                        "results": [
                            {"key": "Company", "matching_results": 14},
                            {"key_as_string": "Person", "matching_results": 10}
                        ]
                    }
                ]
            },
            {"type": "average", "field": "stars", "value": 4.25},
            {"type": "histogram", "field": "price", "interval": 10, "results": []}
        ]
    })
}

#[tokio::test]
async fn query_response_decodes_every_family_member() {
    let client = DiscoveryClient::with_transport(FixedTransport::new(query_response()));
    let response = client
        .invoke(
            QueryCollection::new("env-1", "c1").with_aggregation("nested(enriched_text.entities)"),
        )
        .await
        .expect("query decodes");
    let result = response.into_result();

    assert_eq!(result.matching_results, Some(24));

    let aggregations = result.aggregations.expect("aggregations");
    let kinds: Vec<_> = aggregations.iter().map(QueryAggregation::kind).collect();
    assert_eq!(kinds, ["nested", "average", "histogram"]);

    let QueryAggregation::Nested(nested) = &aggregations[0] else {
        panic!("expected a nested aggregation");
    };
    assert_eq!(nested.path.as_deref(), Some("enriched_text.entities"));
    let inner = nested.common.aggregations.as_ref().expect("inner aggregations");
    let QueryAggregation::Term(term) = &inner[0] else {
        panic!("expected a term aggregation");
    };
    let keys: Vec<_> = term
        .common
        .results
        .iter()
        .flatten()
        .map(|bucket| bucket.key.as_deref())
        .collect();
    assert_eq!(keys, [Some("Company"), Some("Person")]);

    let QueryAggregation::Calculation(average) = &aggregations[1] else {
        panic!("expected a calculation");
    };
    assert_eq!(average.kind, "average");
    assert_eq!(average.value, Some(4.25));

    let seen = client.transport().seen.lock().expect("lock");
    assert_eq!(
        seen[0].body.as_json(),
        Some(&json!({"aggregation": "nested(enriched_text.entities)"}))
    );
}

#[tokio::test]
async fn open_result_keeps_undeclared_fields_through_a_round_trip() {
    let body = query_response();
    let original = body["results"][0].clone();

    let client = DiscoveryClient::with_transport(FixedTransport::new(body));
    let response = client
        .invoke(QueryCollection::new("env-1", "c1"))
        .await
        .expect("query decodes");
    let results = response.result.results.expect("results");
    let document: &QueryResult = &results[0];

    assert_eq!(document.properties.get("title"), Some(&json!("Tokio internals")));
    assert!(document.properties.contains_key("enriched_text"));
    assert!(!document.properties.contains_key("id"));
    assert_eq!(
        document
            .result_metadata
            .as_ref()
            .and_then(|metadata| metadata.filename.as_deref()),
        Some("tokio.html")
    );

    assert_eq!(document.to_value(), original);
}

#[tokio::test]
async fn unknown_aggregation_type_fails_the_whole_call() {
    let client = DiscoveryClient::with_transport(FixedTransport::new(json!({
        "aggregations": [
            {"type": "term", "field": "author"},
            {"type": "percentile", "field": "price"}
        ]
    })));

    let error = client
        .invoke(QueryCollection::new("env-1", "c1"))
        .await
        .expect_err("unknown member");

    let ClientError::Decode(DecodeError::UnrecognizedVariant { field, value }) = error else {
        panic!("expected an unrecognized variant");
    };
    assert_eq!(field, "aggregations[1].type");
    assert_eq!(value, "percentile");
}

#[tokio::test]
async fn untyped_call_returns_raw_json() {
    let client = DiscoveryClient::with_transport(FixedTransport::new(json!({
        "collection_id": "c1",
        "status": "deleted"
    })));

    let response = client
        .call_operation(
            "deleteCollection",
            OperationArgs::new()
                .path_param("environment_id", "env-1")
                .path_param("collection_id", "c1"),
        )
        .await
        .expect("call succeeds");
    assert_eq!(response.result["status"], "deleted");

    let seen = client.transport().seen.lock().expect("lock");
    assert_eq!(seen[0].method, reqwest::Method::DELETE);
    assert_eq!(seen[0].path, "/v1/environments/env-1/collections/c1");
}
