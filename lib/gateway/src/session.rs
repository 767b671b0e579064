use crate::{
    GatewayConfig, SessionError,
    handler::cartoonize,
    http::{
        HttpRequest, HttpResponse, Marshal, Unmarshal, header_end, http_method_name,
        parse_content_length,
    },
};
use bot::ImageGenerator;
use http::StatusCode;
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const READ_CHUNK: usize = 64 * 1024;

/// Serves a single request on one connection.
pub struct GatewaySession {
    stream: TcpStream,
    socket_addr: SocketAddr,
    config: Arc<GatewayConfig>,
    generator: Arc<dyn ImageGenerator>,
}

impl GatewaySession {
    pub fn new(
        stream: TcpStream,
        socket_addr: SocketAddr,
        config: Arc<GatewayConfig>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            stream,
            socket_addr,
            config,
            generator,
        }
    }

    pub async fn run(&mut self) -> Result<(), SessionError> {
        let read_timeout = self.config.read_timeout;
        let request = tokio::time::timeout(read_timeout, self.read_request())
            .await
            .unwrap_or(Err(SessionError::Timeout(read_timeout)));

        let response = match request {
            Ok(request) => self.dispatch(request).await,
            Err(SessionError::PayloadTooLarge(len)) => {
                log::warn!(
                    "{} sent {len} bytes, limit is {}",
                    self.socket_addr,
                    self.config.max_body_bytes
                );
                Self::gen_error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            }
            Err(SessionError::BadRequest(msg)) => {
                Self::gen_error_response(StatusCode::BAD_REQUEST, &msg)
            }
            Err(e @ SessionError::Timeout(_)) => {
                log::warn!("{} {e}", self.socket_addr);
                Self::gen_error_response(StatusCode::REQUEST_TIMEOUT, "Request timeout")
            }
            Err(e) => return Err(e),
        };

        self.send_response(&response).await
    }

    async fn read_request(&mut self) -> Result<HttpRequest, SessionError> {
        let mut data = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK];

        let head_len = loop {
            if let Some(end) = header_end(&data) {
                break end;
            }
            if data.len() > READ_CHUNK {
                return Err(SessionError::BadRequest("Header too large".to_string()));
            }
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(SessionError::ConnectionClosed);
            }
            data.extend_from_slice(&chunk[..n]);
        };

        let head = std::str::from_utf8(&data[..head_len])
            .map_err(|_| SessionError::BadRequest("Header is not valid UTF-8".to_string()))?
            .to_string();
        let mut request = HttpRequest::unmarshal(&head)
            .ok_or_else(|| SessionError::BadRequest("Malformed request line".to_string()))?;

        let content_length = parse_content_length(&head).unwrap_or(0);
        if content_length > self.config.max_body_bytes {
            return Err(SessionError::PayloadTooLarge(content_length));
        }

        while data.len() < head_len + content_length {
            log::trace!("content_length: {content_length} {}", data.len() - head_len);
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(SessionError::ConnectionClosed);
            }
            data.extend_from_slice(&chunk[..n]);
        }

        let body = &data[head_len..head_len + content_length];
        if !body.is_empty() {
            let body = String::from_utf8(body.to_vec())
                .map_err(|_| SessionError::BadRequest("Body is not valid UTF-8".to_string()))?;
            request.body = Some(body);
        }

        Ok(request)
    }

    async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        log::debug!(
            "{} {} {}",
            self.socket_addr,
            request.method,
            request.uri.path
        );

        if request.method == http_method_name::OPTIONS {
            return Self::gen_response(StatusCode::OK);
        }

        if request.uri.path != self.config.path {
            log::warn!("the http path: {} is not supported.", request.uri.path);
            return Self::gen_error_response(StatusCode::NOT_FOUND, "Not found");
        }

        if request.method != http_method_name::POST {
            return Self::gen_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }

        let body = request.body.as_deref().unwrap_or_default();
        match cartoonize(self.generator.as_ref(), body).await {
            Ok(resp) => Self::gen_json_response(StatusCode::OK, &resp),
            Err(e) => {
                let status = e.status_code();
                log::warn!("cartoonize failed ({status}): {e}");
                Self::gen_error_response(status, &e.to_string())
            }
        }
    }

    fn gen_response(status_code: StatusCode) -> HttpResponse {
        let mut response = HttpResponse::new(status_code);
        let headers = &mut response.headers;

        headers.insert("Access-Control-Allow-Origin".to_owned(), "*".to_owned());
        headers.insert("Access-Control-Allow-Headers".to_owned(), ALLOW_HEADERS.to_owned());
        headers.insert("Access-Control-Allow-Methods".to_owned(), "POST, OPTIONS".to_owned());
        headers.insert("Content-Type".to_owned(), "application/json".to_owned());
        headers.insert("Connection".to_owned(), "close".to_owned());
        response
    }

    fn gen_json_response<T: serde::Serialize>(status_code: StatusCode, body: &T) -> HttpResponse {
        let mut response = Self::gen_response(status_code);
        match serde_json::to_string(body) {
            Ok(json) => response.body = Some(json),
            Err(e) => {
                log::warn!("serialize response failed: {e}");
                return Self::gen_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
            }
        }
        response
    }

    fn gen_error_response(status_code: StatusCode, message: &str) -> HttpResponse {
        let mut response = Self::gen_response(status_code);
        response.body = Some(serde_json::json!({ "error": message }).to_string());
        response
    }

    async fn send_response(&mut self, response: &HttpResponse) -> Result<(), SessionError> {
        self.stream.write_all(&response.marshal()).await?;
        self.stream.flush().await?;
        self.stream.shutdown().await.ok();
        Ok(())
    }
}
