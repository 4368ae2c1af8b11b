use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::instrument;

use crate::{
    error::{Error, Result},
    store::DocumentStore,
};

/// Client for a document database's REST surface.
///
/// Documents live at `{server}/databases/{database}/docs?id={key}` and are
/// read and written as opaque octet-stream payloads. Each trait call issues
/// exactly one request: acquire a connection from the pool, do one thing,
/// release it.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    docs_url: String,
}

impl HttpStore {
    /// `server_url` is the database server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(server_url: &str, database_name: &str) -> Self {
        let base = server_url.trim_end_matches('/');

        Self {
            client: Client::new(),
            docs_url: format!("{base}/databases/{database_name}/docs"),
        }
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    #[instrument(skip(self), err)]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get(&self.docs_url)
            .query(&[("id", key)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.bytes().await?.to_vec())),
            status => Err(Error::StoreStatus {
                key: key.to_owned(),
                status: status.as_u16(),
            }),
        }
    }

    #[instrument(skip(self, payload), fields(len = payload.len()), err)]
    async fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        let response = self
            .client
            .put(&self.docs_url)
            .query(&[("id", key)])
            .body(payload.to_vec())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::StoreStatus {
                key: key.to_owned(),
                status: status.as_u16(),
            })
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(&self.docs_url)
            .query(&[("id", key)])
            .send()
            .await?;

        let status = response.status();
        // A document that is already gone counts as deleted.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(Error::StoreStatus {
                key: key.to_owned(),
                status: status.as_u16(),
            })
        }
    }
}
