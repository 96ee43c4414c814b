// src/api/mod.rs
// HTTP surface: error mapping, wire types, and the axum router

pub mod error;
pub mod http;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use http::http_router;
pub use types::*;
