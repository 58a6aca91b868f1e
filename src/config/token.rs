//! Shared-secret tokens for the `X-Ranch-Token` header

use anyhow::{anyhow, Result};

/// Bytes of OS randomness behind each token
const TOKEN_BYTES: usize = 32;

/// Generate a hex token from the OS RNG.
///
/// Fails rather than producing a weaker token when no entropy source is available.
pub fn generate_api_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| anyhow!("OS random source unavailable: {}", e))?;
    Ok(bytes.iter().map(|b| format!("{:02x}", b)).collect())
}
