//! Session identifier generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind every generated session id.
pub const SID_BYTES: usize = 32;

/// Error returned when no session id could be produced.
#[derive(Debug, thiserror::Error)]
pub enum KeyGenError {
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    #[error("{0}")]
    Other(String),
}

/// Produces unique opaque tokens used as record keys.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> Result<String, KeyGenError>;
}

/// Hex-encoded 32 bytes drawn from the OS random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> Result<String, KeyGenError> {
        let mut buf = [0u8; SID_BYTES];
        OsRng.try_fill_bytes(&mut buf)?;
        Ok(hex::encode(buf))
    }
}
