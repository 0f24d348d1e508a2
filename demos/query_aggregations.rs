//! Run a term aggregation over a collection and print its buckets.
//!
//! Run:
//! `cargo run --example query_aggregations`
//!
//! Required env vars:
//! - `DISCOVERY_ENVIRONMENT_ID`, `DISCOVERY_COLLECTION_ID`
//!
//! Optional env vars:
//! - `DISCOVERY_URL` (defaults to the public service root)
//! - `DISCOVERY_ACCESS_TOKEN`
//! - `DISCOVERY_AGGREGATION` (defaults to `term(enriched_text.entities.type,count:5)`)

use discovery_client::catalog::{API_VERSION, DEFAULT_SERVICE_URL};
use discovery_client::models::QueryAggregation;
use discovery_client::operations::QueryCollection;
use discovery_client::{ClientConfig, DiscoveryClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("DISCOVERY_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_owned());
    let environment_id = std::env::var("DISCOVERY_ENVIRONMENT_ID")?;
    let collection_id = std::env::var("DISCOVERY_COLLECTION_ID")?;
    let aggregation = std::env::var("DISCOVERY_AGGREGATION")
        .unwrap_or_else(|_| "term(enriched_text.entities.type,count:5)".to_owned());

    let mut config = ClientConfig::new(base_url)?.with_default_query("version", API_VERSION);
    if let Ok(token) = std::env::var("DISCOVERY_ACCESS_TOKEN") {
        config = config.with_authorization_token(token);
    }

    let client = DiscoveryClient::new(config)?;
    let response = client
        .invoke(
            QueryCollection::new(environment_id, collection_id)
                .with_aggregation(aggregation)
                .with_count(0),
        )
        .await?;

    println!(
        "{} matching documents",
        response.result.matching_results.unwrap_or_default()
    );
    for aggregation in response.result.aggregations.iter().flatten() {
        print_aggregation(aggregation, 0);
    }
    Ok(())
}

fn print_aggregation(aggregation: &QueryAggregation, depth: usize) {
    let indent = "  ".repeat(depth);
    let common = aggregation.common();
    println!(
        "{indent}{} ({} matches)",
        aggregation.kind(),
        common.matching_results.unwrap_or_default()
    );

    for bucket in common.results.iter().flatten() {
        println!(
            "{indent}  {}: {}",
            bucket.key.as_deref().unwrap_or("<no key>"),
            bucket.matching_results.unwrap_or_default()
        );
        for nested in bucket.aggregations.iter().flatten() {
            print_aggregation(nested, depth + 2);
        }
    }
    for nested in common.aggregations.iter().flatten() {
        print_aggregation(nested, depth + 1);
    }
}
