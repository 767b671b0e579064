mod client;
mod generation;
mod request;
mod response;
mod style;

pub use client::{DispatchClient, DispatchConfig, Stylizer};
pub use generation::{GenerationClient, ImageGenerator};
pub use request::{APIConfig, StylizationRequest};
pub use response::{ErrorResponse, StylizationResponse};
pub use style::StyleTag;

pub use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Request Error {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("no image produced")]
    NoImage,

    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Artifact Error: {0}")]
    Artifact(#[from] cutil::artifact::ArtifactError),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Status an HTTP endpoint relays for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Error::QuotaExceeded(_) => StatusCode::PAYMENT_REQUIRED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classifies a non-success reply by status, keeping `message` verbatim.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::BAD_REQUEST => Error::InvalidInput(message),
            StatusCode::PAYMENT_REQUIRED => Error::QuotaExceeded(message),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited(message),
            _ => Error::Upstream {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Loopback targets bypass any system proxy.
pub(crate) fn http_client(url: &str) -> Result<reqwest::Client> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| Error::Configuration(format!("invalid url `{url}`: {e}")))?;

    let loopback = parsed.host_str().is_some_and(|host| {
        host.eq_ignore_ascii_case("localhost")
            || host
                .trim_matches(['[', ']'])
                .parse::<std::net::IpAddr>()
                .is_ok_and(|ip| ip.is_loopback())
    });

    let mut builder = reqwest::Client::builder();
    if loopback {
        builder = builder.no_proxy();
    }
    Ok(builder.build()?)
}
