use crate::request::ImageUrl;
use serde::{Deserialize, Serialize};

/// Success body of a stylization call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StylizationResponse {
    pub cartoon_image: String,
}

/// Failure body of a stylization call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ImageCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GeneratedImage {
    pub image_url: ImageUrl,
}

impl ImageCompletionResponse {
    pub fn first_image(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message
            .images
            .into_iter()
            .map(|img| img.image_url.url)
            .find(|url| !url.is_empty())
    }
}

/// Upstream error body, `{"error": {"message": ..}}` or `{"error": ".."}`.
#[derive(Deserialize, Debug)]
pub(crate) struct UpstreamError {
    pub error: serde_json::Value,
}

impl UpstreamError {
    pub fn message(&self) -> Option<String> {
        match &self.error {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(obj) => obj
                .get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_image() {
        let body = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "here you go",
                    "images": [{"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}]
                }
            }]
        }"#;
        let resp: ImageCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.first_image().as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_no_image() {
        let resp: ImageCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"sorry"}}]}"#).unwrap();
        assert!(resp.first_image().is_none());

        let resp: ImageCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.first_image().is_none());
    }

    #[test]
    fn test_upstream_error_message() {
        let err: UpstreamError =
            serde_json::from_str(r#"{"error":{"message":"bad key","code":401}}"#).unwrap();
        assert_eq!(err.message().as_deref(), Some("bad key"));

        let err: UpstreamError = serde_json::from_str(r#"{"error":"flat"}"#).unwrap();
        assert_eq!(err.message().as_deref(), Some("flat"));
    }
}
