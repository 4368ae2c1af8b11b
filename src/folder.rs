use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::{
    error::{Error, Result},
    index::HashIndex,
    record::FileRecord,
    store::DocumentStore,
};

/// Aggregate sync state for one watched folder.
///
/// Exclusive owner of its [`HashIndex`]; persisted as a single document
/// under the folder path key so the next run can pick up where this one
/// left off.
#[derive(Debug, Serialize, Deserialize)]
pub struct FolderState {
    folder_path: String,
    index: HashIndex,
}

/// Counters for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Files enumerated in the folder.
    pub seen: usize,
    /// Files whose content was written to the store.
    pub uploaded: usize,
    /// Files skipped because their digest matched the index.
    pub unchanged: usize,
    /// Files skipped this pass because they could not be read.
    pub read_failures: usize,
    /// Index entries (and remote documents) removed.
    pub pruned: usize,
}

impl FolderState {
    pub fn new(folder_path: impl Into<String>) -> Self {
        Self {
            folder_path: folder_path.into(),
            index: HashIndex::default(),
        }
    }

    /// Fetch the persisted state for a folder, or start empty when the
    /// store has none.
    #[instrument(skip(store), err)]
    pub async fn load_or_default<S: DocumentStore>(store: &S, folder_path: &str) -> Result<Self> {
        match store.get(folder_path).await? {
            Some(payload) => bincode::deserialize(&payload).map_err(|e| Error::Codec {
                key: folder_path.to_owned(),
                source: e,
            }),
            None => Ok(Self::new(folder_path)),
        }
    }

    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    pub fn index(&self) -> &HashIndex {
        &self.index
    }

    /// One full reconciliation pass: enumerate, upsert, prune, persist.
    ///
    /// A file that fails to read is skipped for this pass and its previous
    /// index entry (if any) left untouched; the pass keeps going. Store
    /// failures abort the pass and are reconciled by the next run. Running
    /// a pass twice with no local changes writes nothing to the store
    /// beyond this state document itself.
    #[instrument(skip_all, fields(folder = %self.folder_path), err)]
    pub async fn sync<S: DocumentStore>(&mut self, store: &S) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome::default();

        let local_paths = self.enumerate().await?;
        outcome.seen = local_paths.len();

        for path in &local_paths {
            match FileRecord::load(path).await {
                Ok(record) => {
                    if self.index.upsert(&record, store).await? {
                        outcome.uploaded += 1;
                    } else {
                        outcome.unchanged += 1;
                    }
                }
                Err(error) => {
                    // Unreadable now does not mean gone: the path stays in
                    // the prune keep-set so its entry survives until a
                    // future pass reads it successfully.
                    warn!(path, %error, "skipping unreadable file for this pass");
                    outcome.read_failures += 1;
                }
            }
        }

        outcome.pruned = self.index.prune(&local_paths, store).await?;

        let payload = bincode::serialize(self).map_err(|e| Error::Codec {
            key: self.folder_path.clone(),
            source: e,
        })?;
        store.put(&self.folder_path, &payload).await?;

        info!(
            seen = outcome.seen,
            uploaded = outcome.uploaded,
            unchanged = outcome.unchanged,
            read_failures = outcome.read_failures,
            pruned = outcome.pruned,
            "sync pass complete"
        );

        Ok(outcome)
    }

    /// Paths of the regular files directly inside the folder. No recursion.
    async fn enumerate(&self) -> Result<HashSet<String>> {
        let mut paths = HashSet::new();

        let mut entries = fs::read_dir(&self.folder_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }

            match entry.path().to_str() {
                Some(path) => {
                    paths.insert(path.to_owned());
                }
                None => warn!(
                    path = %entry.path().display(),
                    "skipping file with non-UTF-8 name"
                ),
            }
        }

        Ok(paths)
    }
}
