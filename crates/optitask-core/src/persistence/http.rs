//! REST client for the time-entry service.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::{NewTimeEntry, TimeEntry, TimeEntryFilter, TimeEntryStore};
use crate::error::PersistenceError;
use crate::storage::ApiConfig;

/// Header the service authenticates requests with.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Talks to `{base_url}/time-entries`.
#[derive(Debug, Clone)]
pub struct HttpTimeEntryStore {
    client: Client,
    base_url: Url,
    user_id: String,
}

impl HttpTimeEntryStore {
    pub fn new(base_url: &str, user_id: &str, timeout: Duration) -> Result<Self, PersistenceError> {
        if user_id.trim().is_empty() {
            return Err(PersistenceError::NotConfigured("user id is empty".into()));
        }
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PersistenceError::NotConfigured(format!(
                "base URL cannot hold paths: {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PersistenceError::NotConfigured(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            user_id: user_id.to_string(),
        })
    }

    /// Build from the `[api]` config section.
    pub fn from_config(api: &ApiConfig) -> Result<Self, PersistenceError> {
        let base_url = api
            .base_url
            .as_deref()
            .ok_or_else(|| PersistenceError::NotConfigured("api.base_url is not set".into()))?;
        let user_id = api
            .user_id
            .as_deref()
            .ok_or_else(|| PersistenceError::NotConfigured("api.user_id is not set".into()))?;
        Self::new(base_url, user_id, Duration::from_secs(api.timeout_secs))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, PersistenceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PersistenceError::NotConfigured("base URL cannot hold paths".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, PersistenceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let endpoint = response.url().path().to_string();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                format!("API request to {endpoint} failed with status {}", status.as_u16())
            });
        Err(PersistenceError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

impl TimeEntryStore for HttpTimeEntryStore {
    async fn save(&self, entry: NewTimeEntry) -> Result<TimeEntry, PersistenceError> {
        entry.validate()?;
        let url = self.endpoint(&["time-entries"])?;
        debug!(%url, task_id = %entry.task_id, "saving time entry");
        let response = self
            .client
            .post(url)
            .header(USER_ID_HEADER, &self.user_id)
            .json(&entry)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<TimeEntry>().await?)
    }

    async fn delete(&self, id: Uuid) -> Result<(), PersistenceError> {
        let id = id.to_string();
        let url = self.endpoint(&["time-entries", &id])?;
        debug!(%url, "deleting time entry");
        let response = self
            .client
            .delete(url)
            .header(USER_ID_HEADER, &self.user_id)
            .send()
            .await?;
        // 200 with a message body or 204 both mean gone.
        Self::check(response).await?;
        Ok(())
    }

    async fn list(&self, filter: TimeEntryFilter) -> Result<Vec<TimeEntry>, PersistenceError> {
        let mut url = self.endpoint(&["time-entries"])?;
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        let response = self
            .client
            .get(url)
            .header(USER_ID_HEADER, &self.user_id)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<Vec<TimeEntry>>().await?)
    }
}
