use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct APIConfig {
    pub api_base_url: String,
    pub api_model: String,
    pub api_key: String,
    pub temperature: Option<f32>,
}

/// Body of a stylization call: `{image, style?}`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct StylizationRequest {
    #[serde(default)]
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct ImageCompletion {
    pub model: String,
    pub messages: Vec<Message>,
    pub modalities: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct Message {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylization_request_wire_shape() {
        let req = StylizationRequest {
            image: "data:image/png;base64,AAAA".to_string(),
            style: None,
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"image":"data:image/png;base64,AAAA"}"#
        );

        let req: StylizationRequest = serde_json::from_str(r#"{"style":"anime"}"#).unwrap();
        assert!(req.image.is_empty());
        assert_eq!(req.style.as_deref(), Some("anime"));
    }

    #[test]
    fn test_image_completion_shape() {
        let body = ImageCompletion {
            model: "m".to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: "draw".to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: "data:image/png;base64,AAAA".to_string(),
                        },
                    },
                ],
            }],
            modalities: vec!["image".to_string(), "text".to_string()],
            temperature: None,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["modalities"], serde_json::json!(["image", "text"]));
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
        assert_eq!(value["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            value["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
        assert!(value.get("temperature").is_none());
    }
}
