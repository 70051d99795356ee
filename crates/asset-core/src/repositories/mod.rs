//! Repository traits (ports)

pub mod user_repository;
pub mod session_repository;
pub mod asset_repository;

pub use user_repository::UserRepository;
pub use session_repository::SessionRepository;
pub use asset_repository::AssetRepository;

#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use asset_repository::MockAssetRepository;
