//! # Asset API
//!
//! axum transport adapter: routes, extractors, DTOs and error mapping.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
