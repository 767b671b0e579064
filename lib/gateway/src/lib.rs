pub mod handler;
pub mod http;
pub mod server;
pub mod session;

pub use handler::cartoonize;
pub use server::{GatewayConfig, GatewayServer};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Addr parse error: {0}")]
    AddrParseError(#[from] std::net::AddrParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Connection closed before the request was complete")]
    ConnectionClosed,

    #[error("Request not received within {0:?}")]
    Timeout(std::time::Duration),
}
