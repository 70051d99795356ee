//! Opaque session tokens

use asset_shared::constants::SESSION_TOKEN_BYTES;

/// 128 random bits, hex-encoded.
pub fn generate_session_token() -> String {
    let bytes: [u8; SESSION_TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}
