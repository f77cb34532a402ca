//! HTTP layer for chatgate.
//!
//! Axum router under `/api` plus a root `/health`, with CORS and request
//! tracing. Errors render through [`error::AppError`].

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
