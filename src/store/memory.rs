use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{Error, Result},
    store::DocumentStore,
};

/// A mutating store call, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Put(String),
    Delete(String),
}

/// In-memory document store for tests.
///
/// A map behind a lock, plus an append-only log of every mutating call so
/// tests can assert the exact store traffic of a pass (what was written,
/// what was deleted, and what never touched the store at all). Individual
/// keys can be marked to fail deletion for exercising best-effort pruning.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Vec<u8>>>,
    ops: RwLock<Vec<StoreOp>>,
    failing_deletes: RwLock<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.docs.read().await.contains_key(key)
    }

    /// Every mutating call so far, oldest first.
    pub async fn ops(&self) -> Vec<StoreOp> {
        self.ops.read().await.clone()
    }

    pub async fn puts(&self) -> usize {
        self.ops
            .read()
            .await
            .iter()
            .filter(|op| matches!(op, StoreOp::Put(_)))
            .count()
    }

    pub async fn deletes(&self) -> usize {
        self.ops
            .read()
            .await
            .iter()
            .filter(|op| matches!(op, StoreOp::Delete(_)))
            .count()
    }

    pub async fn clear_ops(&self) {
        self.ops.write().await.clear();
    }

    /// Make every `delete` for `key` fail with a server error.
    pub async fn fail_delete_for(&self, key: &str) {
        self.failing_deletes.write().await.insert(key.to_owned());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.docs.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        self.docs
            .write()
            .await
            .insert(key.to_owned(), payload.to_vec());
        self.ops.write().await.push(StoreOp::Put(key.to_owned()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.failing_deletes.read().await.contains(key) {
            return Err(Error::StoreStatus {
                key: key.to_owned(),
                status: 500,
            });
        }

        self.docs.write().await.remove(key);
        self.ops.write().await.push(StoreOp::Delete(key.to_owned()));
        Ok(())
    }
}
