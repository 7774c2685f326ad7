// Point data returned by the FIAP storage
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PointValue {
    pub time: DateTime<FixedOffset>,
    pub value: String,
}

impl PointValue {
    pub fn new(time: DateTime<FixedOffset>, value: impl Into<String>) -> Self {
        Self {
            time,
            value: value.into(),
        }
    }
}

/// Direct children of a point set. Point sets hold no values themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSetDescriptor {
    pub point_set_ids: Vec<String>,
    pub point_ids: Vec<String>,
}

/// Semantic error reported by the storage inside an otherwise valid response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiapErrorInfo {
    pub kind: String,
    pub detail: String,
}

/// Everything one retrieval call produced, short of a transport failure.
#[derive(Debug, Clone, Default)]
pub struct RetrievalOutcome {
    pub point_sets: HashMap<String, PointSetDescriptor>,
    pub points: HashMap<String, Vec<PointValue>>,
    pub fiap_error: Option<FiapErrorInfo>,
}
