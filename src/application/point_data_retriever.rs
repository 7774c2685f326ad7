// Capability traits for reaching the point-data source
use crate::domain::point::RetrievalOutcome;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Retrieves point values from a FIAP storage.
///
/// All three operations take the same inputs; `None` leaves that end of the range open.
/// An `Err` is a transport failure. Source-side errors travel inside the outcome.
#[async_trait]
pub trait PointDataRetriever: Send + Sync {
    /// Every value inside the range.
    async fn fetch_date_range(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> anyhow::Result<RetrievalOutcome>;

    /// The most recent value inside the range.
    async fn fetch_latest(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> anyhow::Result<RetrievalOutcome>;

    /// The oldest value inside the range.
    async fn fetch_oldest(
        &self,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
        point_ids: &[String],
    ) -> anyhow::Result<RetrievalOutcome>;
}

#[async_trait]
pub trait LivenessChecker: Send + Sync {
    /// Send a header-only request to the endpoint and return the HTTP status code.
    async fn probe(&self) -> anyhow::Result<u16>;
}
