//! Short code generation.

use crate::error::AppError;
use serde_json::json;

/// Random bytes drawn per code; hex-encoding doubles this into the final
/// code length.
const CODE_LENGTH_BYTES: usize = 5;

/// Generates a random short code: 10 lowercase hex characters (40 bits of
/// entropy) from the operating system's CSPRNG.
///
/// Generation is pure with respect to the store: uniqueness is not probed
/// here. Callers insert optimistically and treat a store-level uniqueness
/// violation as the collision signal, retrying with a fresh code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] when the randomness source fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        tracing::warn!(error = %e, "random source failure during code generation");
        AppError::internal("Random source failure", json!({}))
    })?;

    Ok(hex::encode(buffer))
}
