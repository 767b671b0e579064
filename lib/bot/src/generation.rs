use crate::{
    Error, Result, StyleTag, http_client,
    request::{APIConfig, ContentPart, ImageCompletion, ImageUrl, Message},
    response::{ImageCompletionResponse, UpstreamError},
};
use async_trait::async_trait;
use reqwest::{
    StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Produces a stylized image for a data URI and a style.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns the generated image as a data URI.
    async fn generate(&self, image: &str, style: StyleTag) -> Result<String>;
}

/// Client for an OpenAI-compatible multimodal `chat/completions` API that can
/// answer with images.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    pub config: APIConfig,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(config: APIConfig) -> Self {
        Self {
            config,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key.trim()))
            .map_err(|e| Error::Configuration(format!("invalid API key: {e}")))?;
        headers.insert(AUTHORIZATION, auth);

        Ok(headers)
    }

    fn request_body(&self, image: &str, style: StyleTag) -> ImageCompletion {
        ImageCompletion {
            model: self.config.api_model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: style.instruction().to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_string(),
                        },
                    },
                ],
            }],
            modalities: vec!["image".to_string(), "text".to_string()],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl ImageGenerator for GenerationClient {
    async fn generate(&self, image: &str, style: StyleTag) -> Result<String> {
        if self.config.api_key.trim().is_empty() {
            return Err(Error::Configuration("API key is not configured".to_string()));
        }

        let headers = self.headers()?;
        let url = format!(
            "{}/chat/completions",
            self.config.api_base_url.trim_end_matches('/')
        );
        let client = http_client(&url)?;

        log::info!("generating {style} image with {}", self.config.api_model);

        let resp = client
            .post(url)
            .headers(headers)
            .json(&self.request_body(image, style))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<UpstreamError>(&body)
                .ok()
                .and_then(|e| e.message());
            log::warn!("generation upstream returned {status}: {detail:?}");

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    Error::RateLimited("Rate limit exceeded. Please try again later.".to_string())
                }
                StatusCode::PAYMENT_REQUIRED => Error::QuotaExceeded(
                    "Payment required. Please add credits to continue.".to_string(),
                ),
                _ => Error::Upstream {
                    status: status.as_u16(),
                    message: format!("AI gateway error: {}", status.as_u16()),
                },
            });
        }

        serde_json::from_str::<ImageCompletionResponse>(&body)?
            .first_image()
            .ok_or(Error::NoImage)
    }
}
