//! API client for the remote schedule store.
//!
//! Endpoints (relative to the configured base URL):
//!
//! - `GET schedule` -> `{data: [Event]}`
//! - `PUT schedule` with the full collection -> `{data: [Event]}`
//! - `DELETE schedule` with `{name, date}` -> `{data: [Event]}`
//! - `GET members` -> `{data: [Member]}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{ApiError, Envelope};
use crate::backend::ScheduleBackend;
use crate::config::Config;
use crate::models::{Event, EventIdentity, Member};

/// HTTP request timeout in seconds.
/// 30s allows for slow store responses while failing fast enough for good UX.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

const SCHEDULE_PATH: &str = "schedule";
const MEMBERS_PATH: &str = "members";

/// Client for the schedule store.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the store at `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::with_timeout(config.api_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Read an envelope body, checking `error` before trusting `data`.
    async fn read_envelope<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        debug!(url = url, bytes = text.len(), "Store response received");

        let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e))
        })?;
        envelope.into_result()
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self.client.get(&url).send().await?;
        Self::read_envelope(&url, response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await?;
        Self::read_envelope(&url, response).await
    }
}

#[async_trait]
impl ScheduleBackend for ApiClient {
    async fn fetch_schedule(&self) -> Result<Vec<Event>, ApiError> {
        self.get(SCHEDULE_PATH).await
    }

    async fn save_schedule(&self, events: &[Event]) -> Result<Vec<Event>, ApiError> {
        debug!(count = events.len(), "Saving schedule");
        self.send_json(Method::PUT, SCHEDULE_PATH, events).await
    }

    async fn remove_event(&self, identity: &EventIdentity) -> Result<Vec<Event>, ApiError> {
        debug!(event = %identity, "Removing event");
        self.send_json(Method::DELETE, SCHEDULE_PATH, identity).await
    }

    async fn fetch_members(&self) -> Result<Vec<Member>, ApiError> {
        self.get(MEMBERS_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url(SCHEDULE_PATH), "http://localhost:3000/api/schedule");
    }
}
