//! Application-wide constants

pub const DEFAULT_LIST_LIMIT: i64 = 10;
pub const DEFAULT_LIST_OFFSET: i64 = 0;
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60 * 60;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;
pub const SESSION_TOKEN_BYTES: usize = 16;
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
