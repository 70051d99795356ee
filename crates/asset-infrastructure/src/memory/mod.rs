//! In-memory repository adapters
//!
//! Same contracts as the PostgreSQL adapters, with each table behind one
//! `parking_lot::Mutex`. Every operation holds the lock for its whole body,
//! which gives the atomicity the transactional store provides.

mod assets;
mod sessions;
mod users;

pub use assets::MemoryAssetRepository;
pub use sessions::MemorySessionRepository;
pub use users::MemoryUserRepository;
