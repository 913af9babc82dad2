//! Thin REST client over the back-office API.
//!
//! Every call is a single request with no retries. Non-2xx answers become
//! [`AdminError::HttpStatus`] carrying the backend's error message.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, Instrument};
use url::Url;
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::errors::{AdminError, AdminResult, ErrorResponse};
use crate::resource::{Resource, ResourceKind};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
const UPLOAD_PATH: &str = "/api/upload";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    config: Arc<AdminConfig>,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: AdminConfig) -> AdminResult<Self> {
        Self::from_shared(Arc::new(config))
    }

    pub fn from_shared(config: Arc<AdminConfig>) -> AdminResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .gzip(true)
            .build()?;
        Ok(Self {
            http,
            config,
            token: None,
        })
    }

    /// Sends `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Absolute URL for `path` below the API base, with extra path segments
    /// percent-encoded.
    pub fn endpoint(&self, path: &str, segments: &[&str]) -> AdminResult<Url> {
        let raw = self.config.url_for(path);
        let mut url = Url::parse(&raw)
            .map_err(|e| AdminError::InvalidInput(format!("invalid URL {}: {}", raw, e)))?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| AdminError::InvalidInput(format!("URL {} cannot take a path", raw)))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }

    fn collection_path<R: Resource>(&self) -> &str {
        self.config.resources.path(R::KIND)
    }

    pub async fn list<R: Resource>(&self) -> AdminResult<Vec<R>> {
        let url = self.endpoint(self.collection_path::<R>(), &[])?;
        self.fetch_json(Method::GET, url, None::<&()>).await
    }

    /// Creates a record. Returns the stored record when the backend echoes it.
    pub async fn create<R: Resource>(&self, form: &R::Form) -> AdminResult<Option<R>> {
        let url = self.endpoint(self.collection_path::<R>(), &[])?;
        let body = self.send(Method::POST, url, Some(form)).await?;
        Ok(decode_record(&body))
    }

    pub async fn update<R: Resource>(&self, id: &str, form: &R::Form) -> AdminResult<Option<R>> {
        let url = self.endpoint(self.collection_path::<R>(), &[id])?;
        let body = self.send(Method::PUT, url, Some(form)).await?;
        Ok(decode_record(&body))
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> AdminResult<()> {
        let url = self.endpoint(self.collection_path::<R>(), &[id])?;
        self.send(Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    /// Uploads an image file and returns its public URL.
    pub async fn upload_image(&self, path: &Path) -> AdminResult<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(path))?;
        let form = Form::new().part("image", part);

        let url = self.endpoint(UPLOAD_PATH, &[])?;
        let request = self.http.post(url.clone()).multipart(form);
        let body = self.execute(Method::POST, &url, request).await?;
        let uploaded: UploadResponse = serde_json::from_slice(&body)?;
        Ok(uploaded.secure_url)
    }

    /// Posts credentials to the login endpoint and returns the raw response.
    pub async fn login(&self, email: &str, password: &str) -> AdminResult<serde_json::Value> {
        let url = self.endpoint(self.config.resources.path(ResourceKind::Users), &["login"])?;
        self.fetch_json(Method::POST, url, Some(&LoginRequest { email, password }))
            .await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, segments: &[&str]) -> AdminResult<T> {
        let url = self.endpoint(path, segments)?;
        self.fetch_json(Method::GET, url, None::<&()>).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        segments: &[&str],
        body: &B,
    ) -> AdminResult<()> {
        let url = self.endpoint(path, segments)?;
        self.send(Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    pub async fn delete_path(&self, path: &str, segments: &[&str]) -> AdminResult<()> {
        let url = self.endpoint(path, segments)?;
        self.send(Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    async fn fetch_json<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> AdminResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.send(method, url, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> AdminResult<Bytes> {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(method, &url, request).await
    }

    async fn execute(&self, method: Method, url: &Url, request: RequestBuilder) -> AdminResult<Bytes> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "api_request",
            method = %method,
            path = %url.path(),
            request_id = %request_id
        );

        async move {
            let mut request = request.header(REQUEST_ID_HEADER, request_id.to_string());
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            debug!("Sending request");
            let response = request.send().await.map_err(|e| {
                error!(error = %e, "Request could not be sent");
                AdminError::TransportError(e)
            })?;

            let status = response.status();
            let body = response.bytes().await?;
            if !status.is_success() {
                let message = ErrorResponse::message_from_body(&String::from_utf8_lossy(&body));
                error!(status = %status, message = %message, "Backend rejected request");
                return Err(AdminError::HttpStatus {
                    method: method.to_string(),
                    path: url.path().to_string(),
                    status,
                    message,
                });
            }

            debug!(status = %status, bytes = body.len(), "Request completed");
            Ok(body)
        }
        .instrument(span)
        .await
    }
}

/// Reads a record out of a write response. Acknowledgement bodies such as
/// `{"message": "ok"}` or an empty body yield `None`.
fn decode_record<R: Resource>(body: &[u8]) -> Option<R> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<R>(body) {
        Ok(record) => Some(record),
        Err(err) => {
            debug!(error = %err, "Write response is not a record");
            None
        }
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Employee;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(AdminConfig::new(base.into(), "test".into())).unwrap()
    }

    #[test]
    fn endpoint_encodes_ids() {
        let api = client("http://localhost:5000");
        let url = api.endpoint("/api/Employee", &["a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/Employee/a%20b%2Fc");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let api = client("http://backend.local/tea/");
        let url = api.endpoint("/api/Sale", &["42"]).unwrap();
        assert_eq!(url.as_str(), "http://backend.local/tea/api/Sale/42");
    }

    #[test]
    fn ack_bodies_are_not_records() {
        assert!(decode_record::<Employee>(b"").is_none());
        assert!(decode_record::<Employee>(br#"{"message":"deleted"}"#).is_none());
        let record = decode_record::<Employee>(
            br#"{"_id":"1","name":"A","employeeId":"E1","role":"R","contact":"C"}"#,
        );
        assert_eq!(record.map(|e| e.id), Some("1".to_string()));
    }

    #[test]
    fn image_mime_follows_extension() {
        assert_eq!(image_mime(Path::new("tea.PNG")), "image/png");
        assert_eq!(image_mime(Path::new("tea.jpeg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("tea")), "application/octet-stream");
    }
}
