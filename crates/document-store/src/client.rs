//! REST client for the hosted document store.
//!
//! Documents are addressed as `/v1/documents/{collection}/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use cms_core::store::{Document, DocumentPath, DocumentStore};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::error::{DocumentStoreError, Result};
use crate::types::{ApiErrorResponse, DocumentBody};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the document store REST API.
#[derive(Debug, Clone)]
pub struct RestDocumentStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RestDocumentStore {
    /// Create a new client with the default request timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the store API (e.g., "https://docs.example.com")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(DocumentStoreError::invalid_request("Empty base URL"));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Create headers for an API request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| DocumentStoreError::auth("Invalid access token format"))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    fn document_url(&self, path: &DocumentPath) -> String {
        format!(
            "{}/v1/documents/{}/{}",
            self.base_url,
            urlencoding::encode(path.collection()),
            urlencoding::encode(path.id())
        )
    }

    /// Read the body of a response, turning non-success statuses into errors.
    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Document store response ({}): {}", status, body);

        if status.is_success() {
            return Ok(body);
        }

        // Try to parse error response
        if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
            return Err(DocumentStoreError::api(
                status.as_u16(),
                format!("{}: {}", error.code, error.message),
            ));
        }
        Err(DocumentStoreError::api(
            status.as_u16(),
            format!("Request failed: {}", body),
        ))
    }

    /// Fetch a document.
    ///
    /// GET /v1/documents/{collection}/{id}
    pub async fn fetch(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let response = self
            .client
            .get(self.document_url(path))
            .headers(self.headers()?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Document {} does not exist", path);
            return Ok(None);
        }

        let body = Self::read_body(response).await?;
        let document: DocumentBody = serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to deserialize document {}. Body: {}, Error: {}", path, body, e);
            e
        })?;
        Ok(Some(document.fields))
    }

    /// Merge fields into an existing document.
    ///
    /// PATCH /v1/documents/{collection}/{id}?mustExist=true
    pub async fn patch(&self, path: &DocumentPath, fields: Document) -> Result<()> {
        let response = self
            .client
            .patch(format!("{}?mustExist=true", self.document_url(path)))
            .headers(self.headers()?)
            .json(&DocumentBody::new(fields))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DocumentStoreError::NotFound(path.to_string()));
        }

        Self::read_body(response).await?;
        Ok(())
    }

    /// Create or replace a document.
    ///
    /// PUT /v1/documents/{collection}/{id}
    pub async fn put(&self, path: &DocumentPath, document: Document) -> Result<()> {
        let response = self
            .client
            .put(self.document_url(path))
            .headers(self.headers()?)
            .json(&DocumentBody::new(document))
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn get_document(&self, path: &DocumentPath) -> cms_core::Result<Option<Document>> {
        Ok(self.fetch(path).await?)
    }

    async fn update_document(&self, path: &DocumentPath, fields: Document) -> cms_core::Result<()> {
        Ok(self.patch(path, fields).await?)
    }

    async fn set_document(&self, path: &DocumentPath, document: Document) -> cms_core::Result<()> {
        Ok(self.put(path, document).await?)
    }
}
