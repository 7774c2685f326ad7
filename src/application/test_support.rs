// In-memory doubles for the point-data capabilities
use crate::application::point_data_retriever::{LivenessChecker, PointDataRetriever};
use crate::domain::point::{PointSetDescriptor, PointValue, RetrievalOutcome};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub from: Option<DateTime<FixedOffset>>,
    pub until: Option<DateTime<FixedOffset>>,
    pub point_ids: Vec<String>,
}

/// Returns a canned outcome (or transport error) and records every call.
pub struct MockRetriever {
    outcome: Mutex<Option<RetrievalOutcome>>,
    transport_error: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRetriever {
    pub fn returning(outcome: RetrievalOutcome) -> Self {
        Self {
            outcome: Mutex::new(Some(outcome)),
            transport_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Mutex::new(None),
            transport_error: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(
        &self,
        operation: &'static str,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> anyhow::Result<RetrievalOutcome> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            from,
            until,
            point_ids: point_ids.to_vec(),
        });
        if let Some(message) = &self.transport_error {
            anyhow::bail!("{}", message);
        }
        Ok(self.outcome.lock().unwrap().clone().unwrap_or_default())
    }
}

#[async_trait]
impl PointDataRetriever for MockRetriever {
    async fn fetch_date_range(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> anyhow::Result<RetrievalOutcome> {
        self.respond("date_range", from, until, point_ids)
    }

    async fn fetch_latest(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> anyhow::Result<RetrievalOutcome> {
        self.respond("latest", from, until, point_ids)
    }

    async fn fetch_oldest(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> anyhow::Result<RetrievalOutcome> {
        self.respond("oldest", from, until, point_ids)
    }
}

pub enum MockLiveness {
    Status(u16),
    Unreachable,
}

#[async_trait]
impl LivenessChecker for MockLiveness {
    async fn probe(&self) -> anyhow::Result<u16> {
        match self {
            MockLiveness::Status(code) => Ok(*code),
            MockLiveness::Unreachable => anyhow::bail!("connection refused"),
        }
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap().fixed_offset()
}

/// Values stamped one day apart from 2024-05-01.
pub fn values(raw: &[&str]) -> Vec<PointValue> {
    raw.iter()
        .enumerate()
        .map(|(i, v)| PointValue::new(utc(2024, 5, 1 + i as u32, 0, 0, 0), *v))
        .collect()
}

pub fn outcome_with_points(points: &[(&str, Vec<PointValue>)]) -> RetrievalOutcome {
    RetrievalOutcome {
        points: points
            .iter()
            .map(|(id, v)| (id.to_string(), v.clone()))
            .collect::<HashMap<_, _>>(),
        ..Default::default()
    }
}

pub fn point_set(point_set_ids: &[&str], point_ids: &[&str]) -> PointSetDescriptor {
    PointSetDescriptor {
        point_set_ids: point_set_ids.iter().map(|s| s.to_string()).collect(),
        point_ids: point_ids.iter().map(|s| s.to_string()).collect(),
    }
}
