pub mod clock;
pub mod config;
pub mod context;
pub mod errors;
pub mod locks;

use rand::{RngCore, rngs::OsRng};

pub const TOKEN_BYTES: usize = 32;

///
/// A url-safe random token with 256 bits of entropy from the OS generator.
///
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    base64::encode_config(bytes, base64::URL_SAFE_NO_PAD)
}
