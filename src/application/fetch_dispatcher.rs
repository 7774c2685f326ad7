// Fetch dispatcher - One retrieval call per query, chosen by fetch mode
use crate::application::point_data_retriever::PointDataRetriever;
use crate::application::time_resolver::ResolvedRange;
use crate::domain::point::RetrievalOutcome;
use crate::domain::query::FetchMode;
use std::sync::Arc;

#[derive(Clone)]
pub struct FetchDispatcher {
    retriever: Arc<dyn PointDataRetriever>,
}

impl FetchDispatcher {
    pub fn new(retriever: Arc<dyn PointDataRetriever>) -> Self {
        Self { retriever }
    }

    /// Perform exactly one retrieval. No retry, paging or merging happens here.
    pub async fn dispatch(
        &self,
        mode: FetchMode,
        range: ResolvedRange,
        point_ids: &[String],
    ) -> anyhow::Result<RetrievalOutcome> {
        tracing::debug!(
            "Dispatching {} fetch for {} point ids (from={:?}, to={:?})",
            mode,
            point_ids.len(),
            range.from,
            range.to
        );

        let outcome = match mode {
            FetchMode::Period => {
                self.retriever
                    .fetch_date_range(range.from, range.to, point_ids)
                    .await
            }
            FetchMode::Latest => {
                self.retriever
                    .fetch_latest(range.from, range.to, point_ids)
                    .await
            }
            FetchMode::Oldest => {
                self.retriever
                    .fetch_oldest(range.from, range.to, point_ids)
                    .await
            }
        };

        match &outcome {
            Ok(result) => tracing::debug!(
                "Fetch returned {} points, {} point sets, fiap error: {}",
                result.points.len(),
                result.point_sets.len(),
                result.fiap_error.is_some()
            ),
            Err(e) => tracing::error!("Fetch failed: {:#}", e),
        }

        outcome
    }
}
