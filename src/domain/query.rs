// Query domain models
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use super::error::QueryError;

/// One query of a batch, as handed over by the dashboard.
#[derive(Debug, Clone)]
pub struct DataQuery {
    pub ref_id: String,
    pub time_range: TimeRange,
    /// Raw query model; parsed per query so one malformed query cannot fail its siblings.
    pub json: serde_json::Value,
}

/// The dashboard's current view window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiapQuery {
    #[serde(default)]
    pub point_ids: Vec<PointId>,
    #[serde(default)]
    pub data_range: String,
    #[serde(default)]
    pub start_time: LinkedTime,
    #[serde(default)]
    pub end_time: LinkedTime,
}

impl FiapQuery {
    /// Requested ids in request order, repeats kept.
    pub fn point_id_values(&self) -> Vec<String> {
        self.point_ids.iter().map(|p| p.value.clone()).collect()
    }

    pub fn fetch_mode(&self) -> Result<FetchMode, QueryError> {
        self.data_range.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PointId {
    #[serde(rename = "point_id")]
    pub value: String,
}

/// One end of the requested range: a fixed wall-clock string or a link to the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkedTime {
    #[serde(rename = "time", default)]
    pub raw_time: String,
    #[serde(default)]
    pub link_dashboard: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Period,
    Latest,
    Oldest,
}

impl FromStr for FetchMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "period" => Ok(FetchMode::Period),
            "latest" => Ok(FetchMode::Latest),
            "oldest" => Ok(FetchMode::Oldest),
            other => Err(QueryError::InvalidFetchMode(other.to_string())),
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchMode::Period => "period",
            FetchMode::Latest => "latest",
            FetchMode::Oldest => "oldest",
        };
        f.write_str(name)
    }
}

/// Which end of the range a time spec belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Start => f.write_str("start"),
            Boundary::End => f.write_str("end"),
        }
    }
}
