// Application layer - Query orchestration and health checking
pub mod fetch_dispatcher;
pub mod frame_builder;
pub mod health_service;
pub mod point_data_retriever;
pub mod query_service;
pub mod time_resolver;

#[cfg(test)]
pub mod test_support;
