use crate::{
    Error, Result, StyleTag, http_client,
    request::StylizationRequest,
    response::{ErrorResponse, StylizationResponse},
};
use async_trait::async_trait;
use cutil::artifact::{ImageArtifact, extension_for_mime};
use derivative::Derivative;
use derive_setters::Setters;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turns an image and a style into a stylized image.
#[async_trait]
pub trait Stylizer: Send + Sync {
    async fn stylize(&self, image: &ImageArtifact, style: StyleTag) -> Result<ImageArtifact>;
}

#[derive(Debug, Clone, Derivative, Setters, Serialize, Deserialize)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct DispatchConfig {
    #[derivative(Default(value = "\"http://127.0.0.1:8787/cartoonize\".to_string()"))]
    #[setters(into)]
    pub endpoint: String,

    #[derivative(Default(value = "120"))]
    pub timeout_secs: u64,

    /// Sent as bearer token and `apikey` header when set.
    #[derivative(Default(value = "None"))]
    #[setters(strip_option, into)]
    pub api_key: Option<String>,
}

/// Issues the single stylization call to the remote endpoint.
#[derive(Debug, Clone)]
pub struct DispatchClient {
    config: DispatchConfig,
}

impl DispatchClient {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let invalid = |e| Error::Configuration(format!("invalid endpoint key: {e}"));
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?,
            );
            headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
        }

        Ok(headers)
    }
}

#[async_trait]
impl Stylizer for DispatchClient {
    async fn stylize(&self, image: &ImageArtifact, style: StyleTag) -> Result<ImageArtifact> {
        let body = StylizationRequest {
            image: image.to_data_uri(),
            style: Some(style.to_string()),
        };

        log::info!(
            "dispatch {} ({} bytes) style={style} to {}",
            image.name(),
            image.len(),
            self.config.endpoint
        );

        let resp = http_client(&self.config.endpoint)?
            .post(&self.config.endpoint)
            .headers(self.headers()?)
            .json(&body)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(err) => err.error,
                Err(_) => status
                    .canonical_reason()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| status.to_string()),
            };
            log::warn!("dispatch failed with {status}: {message}");
            return Err(Error::from_status(status, message));
        }

        let resp = serde_json::from_str::<StylizationResponse>(&text)?;
        let artifact = ImageArtifact::from_data_uri(&resp.cartoon_image, "cartoon")?;
        let name = format!("cartoon.{}", extension_for_mime(artifact.mime()));

        Ok(artifact.renamed(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatchConfig::default();
        assert_eq!(config.timeout_secs, 120);
        assert!(config.api_key.is_none());
        assert!(config.endpoint.ends_with("/cartoonize"));
    }

    #[test]
    fn test_key_headers() {
        let client = DispatchClient::new(DispatchConfig::default().with_api_key("anon"));
        let headers = client.headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer anon");
        assert_eq!(headers["apikey"], "anon");

        let client = DispatchClient::new(DispatchConfig::default());
        assert!(client.headers().unwrap().get(AUTHORIZATION).is_none());
    }
}
