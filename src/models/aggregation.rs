use crate::DecodeError;
use crate::codec::{FieldReader, Model, ObjectWriter, VariantMember, VariantTable};

use super::query::QueryResult;

/// Member table of the aggregation family, keyed by the `type` field.
///
/// The single-value calculations share one shape and one decoder.
pub static AGGREGATIONS: VariantTable<QueryAggregation> = VariantTable::new(
    "type",
    &[
        VariantMember {
            tag: "histogram",
            decode: histogram,
        },
        VariantMember {
            tag: "max",
            decode: calculation,
        },
        VariantMember {
            tag: "min",
            decode: calculation,
        },
        VariantMember {
            tag: "average",
            decode: calculation,
        },
        VariantMember {
            tag: "sum",
            decode: calculation,
        },
        VariantMember {
            tag: "unique_count",
            decode: calculation,
        },
        VariantMember {
            tag: "term",
            decode: term,
        },
        VariantMember {
            tag: "filter",
            decode: filter,
        },
        VariantMember {
            tag: "nested",
            decode: nested,
        },
        VariantMember {
            tag: "timeslice",
            decode: timeslice,
        },
        VariantMember {
            tag: "top_hits",
            decode: top_hits,
        },
    ],
);

/// One aggregation of a query response.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryAggregation {
    Histogram(Histogram),
    Calculation(Calculation),
    Term(Term),
    Filter(Filter),
    Nested(Nested),
    Timeslice(Timeslice),
    TopHits(TopHits),
}

impl QueryAggregation {
    /// The discriminator value this aggregation is written with.
    pub fn kind(&self) -> &str {
        match self {
            Self::Histogram(_) => "histogram",
            Self::Calculation(calculation) => &calculation.kind,
            Self::Term(_) => "term",
            Self::Filter(_) => "filter",
            Self::Nested(_) => "nested",
            Self::Timeslice(_) => "timeslice",
            Self::TopHits(_) => "top_hits",
        }
    }

    /// Buckets, counts and sub-aggregations every member carries.
    pub fn common(&self) -> &AggregationCommon {
        match self {
            Self::Histogram(member) => &member.common,
            Self::Calculation(member) => &member.common,
            Self::Term(member) => &member.common,
            Self::Filter(member) => &member.common,
            Self::Nested(member) => &member.common,
            Self::Timeslice(member) => &member.common,
            Self::TopHits(member) => &member.common,
        }
    }
}

impl Model for QueryAggregation {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        AGGREGATIONS.decode(fields)
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.text("type", self.kind());
        match self {
            Self::Histogram(member) => {
                out.optional("field", member.field.as_ref())
                    .optional("interval", member.interval.as_ref());
            }
            Self::Calculation(member) => {
                out.optional("field", member.field.as_ref())
                    .optional("value", member.value.as_ref());
            }
            Self::Term(member) => {
                out.optional("field", member.field.as_ref())
                    .optional("count", member.count.as_ref());
            }
            Self::Filter(member) => {
                out.optional("match", member.filter_match.as_ref());
            }
            Self::Nested(member) => {
                out.optional("path", member.path.as_ref());
            }
            Self::Timeslice(member) => {
                out.optional("field", member.field.as_ref())
                    .optional("interval", member.interval.as_ref())
                    .optional("anomaly", member.anomaly.as_ref());
            }
            Self::TopHits(member) => {
                out.optional("size", member.size.as_ref())
                    .optional_model("hits", member.hits.as_ref());
            }
        }
        self.common().encode(out);
    }
}

/// Fields repeated by every member of the family.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregationCommon {
    pub results: Option<Vec<AggregationResult>>,
    pub matching_results: Option<i64>,
    pub aggregations: Option<Vec<QueryAggregation>>,
}

impl AggregationCommon {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            results: fields.optional_models("results")?,
            matching_results: fields.optional("matching_results")?,
            aggregations: fields.optional_models("aggregations")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional_models("results", self.results.as_deref())
            .optional("matching_results", self.matching_results.as_ref())
            .optional_models("aggregations", self.aggregations.as_deref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Histogram {
    pub field: Option<String>,
    pub interval: Option<i64>,
    pub common: AggregationCommon,
}

/// `max`, `min`, `average`, `sum` or `unique_count`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Calculation {
    /// The discriminator value, one of the calculation tags.
    pub kind: String,
    pub field: Option<String>,
    pub value: Option<f64>,
    pub common: AggregationCommon,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Term {
    pub field: Option<String>,
    pub count: Option<i64>,
    pub common: AggregationCommon,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    /// Wire name `match`.
    pub filter_match: Option<String>,
    pub common: AggregationCommon,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Nested {
    pub path: Option<String>,
    pub common: AggregationCommon,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeslice {
    pub field: Option<String>,
    pub interval: Option<String>,
    pub anomaly: Option<bool>,
    pub common: AggregationCommon,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopHits {
    pub size: Option<i64>,
    pub hits: Option<TopHitsResults>,
    pub common: AggregationCommon,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopHitsResults {
    pub matching_results: Option<i64>,
    pub hits: Option<Vec<QueryResult>>,
}

impl Model for TopHitsResults {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            matching_results: fields.optional("matching_results")?,
            hits: fields.optional_models("hits")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("matching_results", self.matching_results.as_ref())
            .optional_models("hits", self.hits.as_deref());
    }
}

/// One bucket of an aggregation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregationResult {
    /// Published as `key`, or as `key_as_string` when `key` is absent.
    pub key: Option<String>,
    pub matching_results: Option<i64>,
    pub aggregations: Option<Vec<QueryAggregation>>,
}

impl Model for AggregationResult {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            key: fields.optional_aliased(&["key", "key_as_string"])?,
            matching_results: fields.optional("matching_results")?,
            aggregations: fields.optional_models("aggregations")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("key", self.key.as_ref())
            .optional("matching_results", self.matching_results.as_ref())
            .optional_models("aggregations", self.aggregations.as_deref());
    }
}

fn histogram(fields: &mut FieldReader<'_>) -> Result<QueryAggregation, DecodeError> {
    Ok(QueryAggregation::Histogram(Histogram {
        field: fields.optional("field")?,
        interval: fields.optional("interval")?,
        common: AggregationCommon::decode(fields)?,
    }))
}

fn calculation(fields: &mut FieldReader<'_>) -> Result<QueryAggregation, DecodeError> {
    Ok(QueryAggregation::Calculation(Calculation {
        kind: fields.required("type")?,
        field: fields.optional("field")?,
        value: fields.optional("value")?,
        common: AggregationCommon::decode(fields)?,
    }))
}

fn term(fields: &mut FieldReader<'_>) -> Result<QueryAggregation, DecodeError> {
    Ok(QueryAggregation::Term(Term {
        field: fields.optional("field")?,
        count: fields.optional("count")?,
        common: AggregationCommon::decode(fields)?,
    }))
}

fn filter(fields: &mut FieldReader<'_>) -> Result<QueryAggregation, DecodeError> {
    Ok(QueryAggregation::Filter(Filter {
        filter_match: fields.optional("match")?,
        common: AggregationCommon::decode(fields)?,
    }))
}

fn nested(fields: &mut FieldReader<'_>) -> Result<QueryAggregation, DecodeError> {
    Ok(QueryAggregation::Nested(Nested {
        path: fields.optional("path")?,
        common: AggregationCommon::decode(fields)?,
    }))
}

fn timeslice(fields: &mut FieldReader<'_>) -> Result<QueryAggregation, DecodeError> {
    Ok(QueryAggregation::Timeslice(Timeslice {
        field: fields.optional("field")?,
        interval: fields.optional("interval")?,
        anomaly: fields.optional("anomaly")?,
        common: AggregationCommon::decode(fields)?,
    }))
}

fn top_hits(fields: &mut FieldReader<'_>) -> Result<QueryAggregation, DecodeError> {
    Ok(QueryAggregation::TopHits(TopHits {
        size: fields.optional("size")?,
        hits: fields.optional_model("hits")?,
        common: AggregationCommon::decode(fields)?,
    }))
}
