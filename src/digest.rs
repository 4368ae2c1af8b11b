use std::fmt;

use serde::{Deserialize, Serialize};

/// 256-bit blake3 fingerprint of a file's content.
///
/// Byte equality between two digests is the change-detection predicate:
/// identical input always hashes to an identical digest, and any change to
/// the input yields a different one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Hash a whole buffer.
    pub fn of(buffer: &[u8]) -> Self {
        Self(*blake3::hash(buffer).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", blake3::Hash::from_bytes(self.0).to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_string();
        write!(f, "Digest({})", hex.get(..16).unwrap_or(&hex))
    }
}
