//! reqwest-backed [`EntityService`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lectern_auth::CredentialStore;
use lectern_config::ApiConfig;
use lectern_core::entities::AttendeeObservation;
use reqwest::Method;
use serde_json::Value;

use crate::http::check_response;
use crate::{BinaryPayload, EntityKind, EntityService, ListFilter, ServiceError, UploadedBinary};

/// HTTP client for the Lectern REST backend.
///
/// Every request carries `Authorization: Bearer <token>` when the shared
/// [`CredentialStore`] holds one. Without a token the request is still sent
/// so the backend's own 401/403 reaches the caller.
#[derive(Debug, Clone)]
pub struct HttpEntityService {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl HttpEntityService {
    /// Build a client from the `[api]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Network`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &ApiConfig, credentials: Arc<CredentialStore>) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            base_url: config.normalized_base_url().to_string(),
            credentials,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url, kind.as_str())
    }

    fn record_url(&self, kind: EntityKind, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            kind.as_str(),
            urlencoding::encode(id)
        )
    }

    fn list_url(&self, kind: EntityKind, filter: Option<&ListFilter>) -> String {
        let mut url = self.collection_url(kind);
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            let query: Vec<String> = filter
                .params()
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match self.credentials.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Fetch the current attendee roster of a lecture.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the request fails or the body is not a
    /// list of attendee observations.
    pub async fn fetch_attendees(
        &self,
        session_id: &str,
    ) -> Result<Vec<AttendeeObservation>, ServiceError> {
        let url = format!(
            "{}/attendees",
            self.record_url(EntityKind::Lectures, session_id)
        );
        tracing::debug!(%url, "fetching attendees");
        let resp = check_response(self.request(Method::GET, &url).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EntityService for HttpEntityService {
    async fn create(&self, kind: EntityKind, payload: Value) -> Result<Value, ServiceError> {
        let url = self.collection_url(kind);
        tracing::debug!(%url, "create");
        let resp =
            check_response(self.request(Method::POST, &url).json(&payload).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        patch: Value,
    ) -> Result<Value, ServiceError> {
        let url = self.record_url(kind, id);
        tracing::debug!(%url, "update");
        let resp =
            check_response(self.request(Method::PATCH, &url).json(&patch).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn list(
        &self,
        kind: EntityKind,
        filter: Option<&ListFilter>,
    ) -> Result<Vec<Value>, ServiceError> {
        let url = self.list_url(kind, filter);
        tracing::debug!(%url, "list");
        let resp = check_response(self.request(Method::GET, &url).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), ServiceError> {
        let url = self.record_url(kind, id);
        tracing::debug!(%url, "delete");
        check_response(self.request(Method::DELETE, &url).send().await?).await?;
        Ok(())
    }

    async fn upload_binary(
        &self,
        session_id: &str,
        file: BinaryPayload,
    ) -> Result<UploadedBinary, ServiceError> {
        let url = format!(
            "{}/recording?fileName={}",
            self.record_url(EntityKind::Lectures, session_id),
            urlencoding::encode(&file.file_name)
        );
        tracing::debug!(%url, bytes = file.bytes.len(), "uploading recording");
        let resp = check_response(
            self.request(Method::PUT, &url)
                .header(reqwest::header::CONTENT_TYPE, file.content_type)
                .body(file.bytes)
                .send()
                .await?,
        )
        .await?;
        resp.json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}
