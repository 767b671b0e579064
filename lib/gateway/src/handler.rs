use bot::{Error, ImageGenerator, StyleTag, StylizationRequest, StylizationResponse};

/// Validates a `{image, style?}` body and runs exactly one generation.
pub async fn cartoonize(
    generator: &dyn ImageGenerator,
    body: &str,
) -> Result<StylizationResponse, Error> {
    let request = serde_json::from_str::<StylizationRequest>(body)
        .map_err(|e| Error::InvalidInput(format!("Invalid request body: {e}")))?;

    if request.image.trim().is_empty() {
        return Err(Error::InvalidInput("No image provided".to_string()));
    }

    let style = StyleTag::resolve(request.style.as_deref());
    log::info!("cartoonize style={style} ({} bytes)", request.image.len());

    let cartoon_image = generator.generate(&request.image, style).await?;
    Ok(StylizationResponse { cartoon_image })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<StyleTag>>,
    }

    #[async_trait]
    impl ImageGenerator for Recorder {
        async fn generate(&self, _image: &str, style: StyleTag) -> bot::Result<String> {
            self.calls.lock().unwrap().push(style);
            Ok("data:image/png;base64,AAAA".to_string())
        }
    }

    #[tokio::test]
    async fn test_missing_image() {
        let recorder = Recorder::default();
        for body in [r#"{"style":"anime"}"#, r#"{"image":"  "}"#, "not json"] {
            let err = cartoonize(&recorder, body).await.unwrap_err();
            assert_eq!(err.status_code(), 400, "{body}");
        }
        assert!(recorder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_style_falls_back() {
        let recorder = Recorder::default();
        let resp = cartoonize(&recorder, r#"{"image":"data:image/png;base64,AQID","style":"cubism"}"#)
            .await
            .unwrap();

        assert_eq!(resp.cartoon_image, "data:image/png;base64,AAAA");
        assert_eq!(*recorder.calls.lock().unwrap(), vec![StyleTag::Vibrant]);
    }

    #[tokio::test]
    async fn test_single_generation_per_request() {
        let recorder = Recorder::default();
        cartoonize(&recorder, r#"{"image":"data:x","style":"sketch"}"#)
            .await
            .unwrap();
        assert_eq!(*recorder.calls.lock().unwrap(), vec![StyleTag::Sketch]);
    }
}
