//! HTTP client for the lesson video generation service.

use crate::error::{error_message_from_body, Result, TtvError};
use crate::service::provider::VideoService;
use crate::service::types::{
    duration_ms, GenerateVideoRequest, GenerateVideoResponse, GeneratedArtifact,
};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Address the generation service listens on by default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Environment variable that overrides the service address.
pub const SERVICE_URL_ENV: &str = "TTV_SERVICE_URL";

/// Builder for HttpVideoService.
#[derive(Debug, Clone, Default)]
pub struct HttpVideoServiceBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpVideoServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service base URL. Falls back to `TTV_SERVICE_URL`, then
    /// [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a transport timeout. Without one, requests wait until the
    /// service answers or the connection drops.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the service, resolving and validating the base URL.
    pub fn build(self) -> Result<HttpVideoService> {
        let base_url = resolve_base_url(self.base_url, std::env::var(SERVICE_URL_ENV).ok())?;

        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        Ok(HttpVideoService {
            client: client.build()?,
            base_url,
        })
    }
}

/// Picks the explicit URL, then the environment, then the default, and
/// normalizes it without a trailing `/`.
fn resolve_base_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    let raw = explicit
        .or_else(|| from_env.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let raw = raw.trim();

    let url = reqwest::Url::parse(raw)
        .map_err(|e| TtvError::InvalidConfig(format!("invalid service URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TtvError::InvalidConfig(format!(
            "service URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// Client for `POST /generate-video` and `GET /video/{filename}`.
#[derive(Debug, Clone)]
pub struct HttpVideoService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVideoService {
    /// Creates a new `HttpVideoServiceBuilder`.
    pub fn builder() -> HttpVideoServiceBuilder {
        HttpVideoServiceBuilder::new()
    }

    fn parse_error(status: u16, text: &str) -> TtvError {
        TtvError::Api {
            status,
            message: error_message_from_body(text),
        }
    }
}

#[async_trait]
impl VideoService for HttpVideoService {
    async fn generate_video(&self, request: &GenerateVideoRequest) -> Result<GeneratedArtifact> {
        let start = Instant::now();
        let url = format!("{}/generate-video", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Self::parse_error(status.as_u16(), &text));
        }

        let body: GenerateVideoResponse = serde_json::from_str(&text)
            .map_err(|e| TtvError::MalformedResponse(format!("expected video_path: {e}")))?;

        let duration_ms = duration_ms(start.elapsed());
        tracing::debug!(
            video_path = %body.video_path,
            duration_ms,
            "generation service returned video"
        );

        Ok(GeneratedArtifact::new(body.video_path).with_duration_ms(duration_ms))
    }

    async fn fetch_video(&self, filename: &str) -> Result<Vec<u8>> {
        if filename.is_empty() || filename.contains('/') || filename == ".." {
            return Err(TtvError::InvalidRequest(format!(
                "invalid video filename '{filename}'"
            )));
        }

        let url = self.playback_url(filename);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &text));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
