//! # Asset Core
//!
//! Domain entities, repository traits and services for asset storage.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod upload;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, DomainResult};
