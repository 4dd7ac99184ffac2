//! Applications API client, the single point of contact with the records server.
//!
//! The web layer only talks to the server through `ApplicationsApi`, carried in
//! `AppState` as `Arc<dyn ApplicationsApi>`. `HttpApplicationsClient` is the
//! production backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::application::{JobApplication, NewJobApplication};

#[cfg(test)]
pub mod fake;

/// Resource path appended to the configured base URL.
pub const APPLICATIONS_PATH: &str = "applications";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait ApplicationsApi: Send + Sync {
    /// Fetches every record, in the order the server returns them.
    async fn list(&self) -> Result<Vec<JobApplication>, ApiError>;

    /// Creates one record. The response body is ignored.
    async fn create(&self, application: &NewJobApplication) -> Result<(), ApiError>;

    /// Replaces the writable fields of record `id`. `None` when the server has no such record.
    async fn update(
        &self,
        id: i64,
        application: &NewJobApplication,
    ) -> Result<Option<JobApplication>, ApiError>;

    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

/// `ApplicationsApi` over HTTP + JSON.
#[derive(Clone)]
pub struct HttpApplicationsClient {
    client: Client,
    endpoint: String,
}

impl HttpApplicationsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/{APPLICATIONS_PATH}", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn record_url(&self, id: i64) -> String {
        format!("{}/{id}", self.endpoint)
    }
}

#[async_trait]
impl ApplicationsApi for HttpApplicationsClient {
    async fn list(&self) -> Result<Vec<JobApplication>, ApiError> {
        debug!("GET {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        let records: Vec<JobApplication> = decode_json(check_status(response).await?).await?;
        debug!("Fetched {} applications", records.len());
        Ok(records)
    }

    async fn create(&self, application: &NewJobApplication) -> Result<(), ApiError> {
        debug!("POST {} company={}", self.endpoint, application.company_name);
        // .json() sets Content-Type: application/json
        let response = self
            .client
            .post(&self.endpoint)
            .json(application)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update(
        &self,
        id: i64,
        application: &NewJobApplication,
    ) -> Result<Option<JobApplication>, ApiError> {
        let url = self.record_url(id);
        debug!("PUT {url}");
        let response = self.client.put(&url).json(application).send().await?;
        let response = check_status(response).await?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str::<Option<JobApplication>>(&body)?)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.record_url(id);
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Applications API returned {}: {}", status, body);
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Reads the body as text first so malformed JSON surfaces as `ApiError::Decode`.
async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
