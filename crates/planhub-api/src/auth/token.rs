//! Opaque session token generation.
//!
//! Tokens are 32 random bytes, hex-encoded. They carry no claims; the
//! session store resolves them to a user.

use rand::RngCore;

const TOKEN_BYTES: usize = 32;

pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
