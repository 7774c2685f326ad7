// Domain layer - Query, point data and frame models
pub mod error;
pub mod frame;
pub mod health;
pub mod point;
pub mod query;
