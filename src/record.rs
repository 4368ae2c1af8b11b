use std::{fmt::Debug, io, path::Path};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::instrument;

use crate::{
    digest::Digest,
    error::{Error, Result},
};

/// One file as stored remotely: its path key, raw content, and content
/// digest.
///
/// Records are transient. One is built per local file per pass, compared
/// against the index, optionally persisted, then dropped. When a file
/// changes, a fresh record supersedes the stored one under the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    path: String,
    content: Vec<u8>,
    digest: Digest,
}

impl FileRecord {
    /// Read a file into memory and fingerprint its content.
    #[instrument(err)]
    pub async fn load<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let key = path
            .to_str()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "file path is not valid UTF-8")
            })?
            .to_owned();

        let content = fs::read(path).await?;
        let digest = Digest::of(&content);

        Ok(Self {
            path: key,
            content,
            digest,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Bincode payload stored under the path key.
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Codec {
            key: self.path.clone(),
            source: e,
        })
    }

    pub fn decode(key: &str, payload: &[u8]) -> Result<Self> {
        bincode::deserialize(payload).map_err(|e| Error::Codec {
            key: key.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_reads_content_and_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello").unwrap();

        let record = FileRecord::load(&path).await.unwrap();
        assert_eq!(record.path(), path.to_str().unwrap());
        assert_eq!(record.content(), b"hello");
        assert_eq!(*record.digest(), Digest::of(b"hello"));
    }

    #[tokio::test]
    async fn digest_always_matches_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.bin");
        std::fs::write(&path, [0u8, 159, 146, 150]).unwrap();

        let record = FileRecord::load(&path).await.unwrap();
        assert_eq!(Digest::of(record.content()), *record.digest());
    }

    #[tokio::test]
    async fn load_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileRecord::load(dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn payload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.txt");
        std::fs::write(&path, b"world").unwrap();

        let record = FileRecord::load(&path).await.unwrap();
        let decoded = FileRecord::decode(record.path(), &record.encode().unwrap()).unwrap();
        assert_eq!(decoded.path(), record.path());
        assert_eq!(decoded.content(), record.content());
        assert_eq!(decoded.digest(), record.digest());
    }

    #[test]
    fn decode_garbage_is_a_codec_error() {
        let err = FileRecord::decode("k", &[0xff]).unwrap_err();
        assert!(matches!(err, Error::Codec { .. }));
    }
}
