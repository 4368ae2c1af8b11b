use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpStore;
pub use memory::{MemoryStore, StoreOp};

mod http;
mod memory;

/// Remote document store seam.
///
/// Every call is its own independent unit of work against the store; no
/// transaction spans more than one call. A mid-pass crash can therefore
/// leave the store partially updated, which the next pass re-detects and
/// reconciles.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document payload; `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Insert or overwrite the document under `key`.
    async fn put(&self, key: &str, payload: &[u8]) -> Result<()>;

    /// Remove the document under `key`. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;
}
