//! HTTP implementation of the entry/comment store.
//!
//! Talks to the biograph API server and unwraps its `{ "data": ... }` /
//! `{ "error": ..., "code": ... }` envelopes into typed results.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use biograph_core::comment::Comment;
use biograph_core::entry::Entry;
use biograph_core::types::DbId;

use crate::error::StoreError;
use crate::stores::{AssignmentRequest, EntryStore, NewComment};

/// [`EntryStore`] backed by the biograph API server.
pub struct HttpEntryStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
    code: String,
}

#[derive(Deserialize)]
struct UpdatedCount {
    updated: u64,
}

impl HttpEntryStore {
    /// Create a store client for the given server base URL
    /// (e.g. `http://localhost:8800`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpEntryStore {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Unwrap a response envelope, mapping error envelopes to
    /// [`StoreError::Api`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
        let status = response.status().as_u16();
        if response.status().is_success() {
            let envelope: DataEnvelope<T> = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            Ok(envelope.data)
        } else {
            match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => Err(StoreError::Api {
                    status,
                    code: envelope.code,
                    message: envelope.error,
                }),
                Err(e) => Err(StoreError::Decode(format!(
                    "HTTP {status} with undecodable body: {e}"
                ))),
            }
        }
    }
}

#[async_trait]
impl EntryStore for HttpEntryStore {
    async fn list_entries(&self) -> Result<Vec<Entry>, StoreError> {
        let response = self.client.get(self.url("/api/v1/entries")).send().await?;
        Self::decode(response).await
    }

    async fn assign(&self, request: &AssignmentRequest) -> Result<u64, StoreError> {
        let response = self
            .client
            .put(self.url("/api/v1/entries/assign"))
            .json(request)
            .send()
            .await?;
        let count: UpdatedCount = Self::decode(response).await?;
        Ok(count.updated)
    }

    async fn unassign(&self, entry_ids: &[DbId]) -> Result<u64, StoreError> {
        #[derive(serde::Serialize)]
        struct Body<'a> {
            entry_ids: &'a [DbId],
        }
        let response = self
            .client
            .put(self.url("/api/v1/entries/unassign"))
            .json(&Body { entry_ids })
            .send()
            .await?;
        let count: UpdatedCount = Self::decode(response).await?;
        Ok(count.updated)
    }

    async fn update_status(&self, entry_id: DbId, status: &str) -> Result<Entry, StoreError> {
        #[derive(serde::Serialize)]
        struct Body<'a> {
            status: &'a str,
        }
        let response = self
            .client
            .put(self.url(&format!("/api/v1/entries/{entry_id}/status")))
            .json(&Body { status })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        let response = self.client.get(self.url("/api/v1/comments")).send().await?;
        Self::decode(response).await
    }

    async fn add_comment(&self, request: &NewComment) -> Result<Comment, StoreError> {
        let response = self
            .client
            .post(self.url("/api/v1/comments"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }
}
