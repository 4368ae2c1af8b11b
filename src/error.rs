use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything a sync pass can fail with.
///
/// The caller decides per variant: `Io` on a single file is skippable within
/// a pass, store-side failures abort the current operation and are left for
/// the next pass to reconcile.
#[derive(Debug, Error)]
pub enum Error {
    /// A local file or directory could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The store could not be reached or the request failed in transit.
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with an unexpected status code.
    #[error("store returned status {status} for key {key:?}")]
    StoreStatus { key: String, status: u16 },

    /// A stored document could not be encoded or decoded.
    #[error("malformed document for key {key:?}")]
    Codec {
        key: String,
        #[source]
        source: bincode::Error,
    },
}
