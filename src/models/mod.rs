//! Typed results of the document-search service.
//!
//! Each type implements [`crate::codec::Model`]; its `decode`/`encode` pair is
//! the wire schema. [`QueryResult`] and [`NoticeResult`] are open models and
//! keep undeclared keys in a [`crate::codec::PropertyBag`]. [`QueryAggregation`]
//! is a variant family selected by its `type` field.

mod aggregation;
mod collection;
mod document;
mod environment;
mod query;
mod training;

pub use aggregation::{
    AGGREGATIONS, AggregationCommon, AggregationResult, Calculation, Filter, Histogram, Nested,
    QueryAggregation, Term, Timeslice, TopHits, TopHitsResults,
};
pub use collection::{
    Collection, DeleteCollectionResponse, DocumentCounts, Field, ListCollectionFieldsResponse,
    ListCollectionsResponse,
};
pub use document::{DeleteDocumentResponse, DocumentAccepted, Notice};
pub use environment::{
    DeleteEnvironmentResponse, DiskUsage, Environment, EnvironmentDocuments, IndexCapacity,
    ListEnvironmentsResponse,
};
pub use query::{
    NoticeResult, QueryNoticesResponse, QueryPassage, QueryResponse, QueryResult,
    QueryResultMetadata,
};
pub use training::{TrainingDataSet, TrainingExample, TrainingQuery};
