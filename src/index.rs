use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{digest::Digest, error::Result, record::FileRecord, store::DocumentStore};

/// Last-synced digest per file path; the reconciliation engine's state.
///
/// Invariant after a successful pass: the key set equals the set of local
/// file paths in the watched folder and every digest matches that file's
/// current on-disk content. The store is the system of record for content,
/// this index is the system of record for "already stored this version".
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct HashIndex {
    digests: HashMap<String, Digest>,
}

impl HashIndex {
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn digest(&self, path: &str) -> Option<&Digest> {
        self.digests.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.digests.keys().map(String::as_str)
    }

    /// Store a record if the index says its content is new or changed.
    ///
    /// Returns whether a store write happened. Unchanged content (digest
    /// byte-equal to the indexed one) produces no store traffic at all. The
    /// index entry is updated only after the write succeeds, so a failure
    /// leaves a stale entry that gets re-uploaded on the next pass rather
    /// than an entry claiming content the store never received.
    #[instrument(skip_all, fields(path = record.path()), err)]
    pub async fn upsert<S: DocumentStore>(
        &mut self,
        record: &FileRecord,
        store: &S,
    ) -> Result<bool> {
        if self.digests.get(record.path()) == Some(record.digest()) {
            debug!(path = record.path(), "content unchanged, skipping upload");
            return Ok(false);
        }

        store.put(record.path(), &record.encode()?).await?;
        self.digests
            .insert(record.path().to_owned(), *record.digest());

        Ok(true)
    }

    /// Drop every entry whose path no longer exists locally, deleting its
    /// remote document.
    ///
    /// Removals are independent and best-effort: a failed delete keeps its
    /// index entry (under-deletion beats data loss), the remaining removals
    /// are still attempted, and the first store error is returned once all
    /// have been tried. Returns the number of entries pruned.
    #[instrument(skip_all, fields(local = local_paths.len(), indexed = self.digests.len()), err)]
    pub async fn prune<S: DocumentStore>(
        &mut self,
        local_paths: &HashSet<String>,
        store: &S,
    ) -> Result<usize> {
        let doomed: Vec<String> = self
            .digests
            .keys()
            .filter(|path| !local_paths.contains(*path))
            .cloned()
            .collect();

        let mut pruned = 0;
        let mut first_error = None;

        for path in doomed {
            match store.delete(&path).await {
                Ok(()) => {
                    self.digests.remove(&path);
                    pruned += 1;
                }
                Err(error) => {
                    warn!(path, %error, "delete failed, keeping index entry");
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(pruned),
        }
    }
}
