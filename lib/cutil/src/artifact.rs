//! Immutable encoded image payloads and `data:` URI conversion.
//!
//! An [`ImageArtifact`] carries the encoded bytes together with the MIME type
//! and a logical file name, so it can travel as a self-describing
//! `data:<mime>;base64,<payload>` string without any side channel.

use base64::{Engine as _, engine::general_purpose};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, ArtifactError>;

#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("Not a data uri")]
    NotDataUri,

    #[error("Data uri is not base64 encoded")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Empty image payload")]
    Empty,
}

const DEFAULT_MIME: &str = "application/octet-stream";

/// Encoded image bytes with type metadata. Cloning shares the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    bytes: Arc<[u8]>,
    mime: String,
    name: String,
}

impl ImageArtifact {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
            name: name.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a copy of this artifact under another logical name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            bytes: self.bytes.clone(),
            mime: self.mime.clone(),
            name: name.into(),
        }
    }

    /// Encodes the artifact as `data:<mime>;base64,<payload>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cutil::artifact::ImageArtifact;
    ///
    /// let artifact = ImageArtifact::new(vec![0, 0, 0], "image/png", "a.png");
    /// assert_eq!(artifact.to_data_uri(), "data:image/png;base64,AAAA");
    /// ```
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Decodes a base64 `data:` URI into an artifact named `name`.
    pub fn from_data_uri(uri: &str, name: impl Into<String>) -> Result<Self> {
        let rest = uri.trim().strip_prefix("data:").ok_or(ArtifactError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(ArtifactError::NotDataUri)?;

        let mut params = header.split(';');
        let mime = match params.next() {
            Some(mime) if !mime.is_empty() => mime.to_string(),
            _ => DEFAULT_MIME.to_string(),
        };

        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(ArtifactError::NotBase64);
        }

        let bytes = general_purpose::STANDARD.decode(payload.trim())?;
        if bytes.is_empty() {
            return Err(ArtifactError::Empty);
        }

        Ok(Self::new(bytes, mime, name))
    }
}

/// Maps an image file extension to its MIME type.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Maps an image MIME type to the file extension used when saving it.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_uri() {
        let artifact = ImageArtifact::from_data_uri("data:image/png;base64,AAAA", "cartoon.png")
            .unwrap();
        assert_eq!(artifact.bytes(), &[0, 0, 0]);
        assert_eq!(artifact.mime(), "image/png");
        assert_eq!(artifact.name(), "cartoon.png");
    }

    #[test]
    fn test_from_data_uri_with_params() {
        let artifact =
            ImageArtifact::from_data_uri("data:image/jpeg;charset=binary;base64,/9j/", "x")
                .unwrap();
        assert_eq!(artifact.mime(), "image/jpeg");
        assert_eq!(artifact.bytes(), &[0xff, 0xd8, 0xff]);
    }

    #[test]
    fn test_from_data_uri_rejects_garbage() {
        assert!(matches!(
            ImageArtifact::from_data_uri("http://example.com/a.png", "x"),
            Err(ArtifactError::NotDataUri)
        ));
        assert!(matches!(
            ImageArtifact::from_data_uri("data:image/png,AAAA", "x"),
            Err(ArtifactError::NotBase64)
        ));
        assert!(matches!(
            ImageArtifact::from_data_uri("data:image/png;base64,@@@", "x"),
            Err(ArtifactError::Base64(_))
        ));
        assert!(matches!(
            ImageArtifact::from_data_uri("data:image/png;base64,", "x"),
            Err(ArtifactError::Empty)
        ));
    }

    #[test]
    fn test_mime_mapping() {
        assert_eq!(mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("bmp"), None);
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("application/octet-stream"), "png");
    }

    #[test]
    fn test_renamed_shares_bytes() {
        let a = ImageArtifact::new(vec![1, 2, 3], "image/png", "a.png");
        let b = a.renamed("b.png");
        assert_eq!(a.bytes(), b.bytes());
        assert_eq!(b.name(), "b.png");
        assert_ne!(a, b);
    }
}
