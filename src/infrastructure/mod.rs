// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod fiap_client;
pub mod fiap_xml;
pub mod frame_mapper;
