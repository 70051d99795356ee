//! Domain services (business logic)

pub mod credential_service;
pub mod session_manager;
pub mod session_sweeper;
pub mod asset_service;

pub use credential_service::CredentialService;
pub use session_manager::SessionManager;
pub use session_sweeper::SessionSweeper;
pub use asset_service::AssetService;
