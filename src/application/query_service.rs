// Query service - Use case for answering a batch of dashboard queries
use crate::application::fetch_dispatcher::FetchDispatcher;
use crate::application::frame_builder::build_frames;
use crate::application::point_data_retriever::PointDataRetriever;
use crate::application::time_resolver::{resolve_range, ResolvedRange};
use crate::domain::error::QueryError;
use crate::domain::frame::Frame;
use crate::domain::query::{DataQuery, FetchMode, FiapQuery};
use crate::infrastructure::config::DatasourceSettings;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Frames and/or an error message for one query.
#[derive(Debug, Clone, Default)]
pub struct DataResponse {
    pub frames: Vec<Frame>,
    pub error: Option<String>,
}

impl DataResponse {
    fn error(message: String) -> Self {
        Self {
            frames: Vec::new(),
            error: Some(message),
        }
    }
}

/// A validated query, ready to dispatch.
struct PreparedQuery {
    point_ids: Vec<String>,
    mode: FetchMode,
    range: ResolvedRange,
}

#[derive(Clone)]
pub struct QueryService {
    settings: DatasourceSettings,
    dispatcher: FetchDispatcher,
}

impl QueryService {
    pub fn new(settings: DatasourceSettings, retriever: Arc<dyn PointDataRetriever>) -> Self {
        Self {
            settings,
            dispatcher: FetchDispatcher::new(retriever),
        }
    }

    /// Answer every query in order, one dispatch at a time.
    pub async fn query_data(&self, queries: Vec<DataQuery>) -> BTreeMap<String, DataResponse> {
        tracing::info!("Start handle {} queries", queries.len());

        let mut responses = BTreeMap::new();
        for query in queries {
            let response = self.query(&query).await;
            responses.insert(query.ref_id, response);
        }

        tracing::info!("Finish handle queries");
        responses
    }

    async fn query(&self, query: &DataQuery) -> DataResponse {
        tracing::info!(ref_id = %query.ref_id, "Start handle query");

        let prepared = match self.prepare(query) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(ref_id = %query.ref_id, "Rejected query: {}", e);
                return DataResponse::error(e.to_string());
            }
        };

        tracing::info!(
            ref_id = %query.ref_id,
            "Start fetch point data from {} for {:?}",
            self.settings.url,
            prepared.point_ids
        );
        let fetched = self
            .dispatcher
            .dispatch(prepared.mode, prepared.range, &prepared.point_ids)
            .await;

        let (frames, errors) = build_frames(&query.ref_id, &prepared.point_ids, fetched);
        if errors.is_empty() {
            tracing::info!(ref_id = %query.ref_id, "Finish handle query with {} frames", frames.len());
            return DataResponse {
                frames,
                error: None,
            };
        }

        tracing::warn!(
            ref_id = %query.ref_id,
            "Query finished with {} errors and {} frames: {}",
            errors.len(),
            frames.len(),
            errors
        );
        DataResponse {
            frames,
            error: Some(format!("fiap fetch: {}", errors)),
        }
    }

    fn prepare(&self, query: &DataQuery) -> Result<PreparedQuery, QueryError> {
        let model: FiapQuery = serde_json::from_value(query.json.clone())?;
        let range = resolve_range(&model, &query.time_range, &self.settings)?;
        let mode = model.fetch_mode()?;

        Ok(PreparedQuery {
            point_ids: model.point_id_values(),
            mode,
            range,
        })
    }
}
