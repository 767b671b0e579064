//! Minimal HTTP/1.1 request parsing and response marshalling.

use http::StatusCode;
use indexmap::IndexMap;

pub mod http_method_name {
    pub const OPTIONS: &str = "OPTIONS";
    pub const POST: &str = "POST";
}

pub trait Marshal {
    fn marshal(&self) -> Vec<u8>;
}

pub trait Unmarshal: Sized {
    fn unmarshal(head: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uri {
    pub path: String,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: String,
    pub uri: Uri,
    pub version: String,

    /// Keys are lowercase.
    pub headers: IndexMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_ascii_lowercase())
    }
}

impl Unmarshal for HttpRequest {
    /// Parses the request line and headers. The body is attached separately.
    fn unmarshal(head: &str) -> Option<Self> {
        let mut lines = head.split("\r\n");

        let mut request_line = lines.next()?.split_whitespace();
        let method = request_line.next()?.to_string();
        let target = request_line.next()?;
        let version = request_line.next().unwrap_or("HTTP/1.1").to_string();

        let uri = match target.split_once('?') {
            Some((path, query)) => Uri {
                path: path.to_string(),
                query: Some(query.to_string()),
            },
            None => Uri {
                path: target.to_string(),
                query: None,
            },
        };

        let mut headers = IndexMap::new();
        for line in lines.take_while(|l| !l.is_empty()) {
            if let Some((k, v)) = line.split_once(':') {
                headers.insert(k.trim().to_ascii_lowercase(), v.trim().to_string());
            }
        }

        Some(Self {
            method,
            uri,
            version,
            headers,
            body: None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub version: String,
    pub status_code: u16,
    pub reason_phrase: String,
    pub headers: IndexMap<String, String>,
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            version: "HTTP/1.1".to_string(),
            status_code: status_code.as_u16(),
            reason_phrase: status_code.canonical_reason().unwrap_or_default().to_string(),
            ..Default::default()
        }
    }
}

impl Marshal for HttpResponse {
    fn marshal(&self) -> Vec<u8> {
        let body = self.body.as_deref().unwrap_or_default();

        let mut out = format!(
            "{} {} {}\r\n",
            self.version, self.status_code, self.reason_phrase
        );
        for (k, v) in &self.headers {
            out.push_str(&format!("{k}: {v}\r\n"));
        }
        out.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
        out.push_str(body);

        out.into_bytes()
    }
}

/// Byte offset just past the `\r\n\r\n` that ends the header block.
pub fn header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

pub fn parse_content_length(head: &str) -> Option<usize> {
    head.split("\r\n").find_map(|line| {
        let (k, v) = line.split_once(':')?;
        if k.trim().eq_ignore_ascii_case("content-length") {
            v.trim().parse().ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD: &str = "POST /cartoonize?x=1 HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 17\r\n\r\n";

    #[test]
    fn test_unmarshal_request() {
        let req = HttpRequest::unmarshal(HEAD).unwrap();
        assert_eq!(req.method, http_method_name::POST);
        assert_eq!(req.uri.path, "/cartoonize");
        assert_eq!(req.uri.query.as_deref(), Some("x=1"));
        assert_eq!(req.get_header("content-type").unwrap(), "application/json");
        assert_eq!(req.get_header("CONTENT-LENGTH").unwrap(), "17");
    }

    #[test]
    fn test_unmarshal_garbage() {
        assert!(HttpRequest::unmarshal("").is_none());
        assert!(HttpRequest::unmarshal("GET").is_none());
    }

    #[test]
    fn test_content_length() {
        assert_eq!(parse_content_length(HEAD), Some(17));
        assert_eq!(parse_content_length("GET / HTTP/1.1\r\n\r\n"), None);
    }

    #[test]
    fn test_header_end() {
        let data = format!("{HEAD}{{\"image\":\"x\"}}");
        assert_eq!(header_end(data.as_bytes()), Some(HEAD.len()));
        assert_eq!(header_end(b"GET / HTTP/1.1\r\n"), None);
    }

    #[test]
    fn test_marshal_response() {
        let mut resp = HttpResponse::new(StatusCode::TOO_MANY_REQUESTS);
        resp.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        resp.body = Some("{}".to_string());

        let text = String::from_utf8(resp.marshal()).unwrap();
        assert!(text.starts_with("HTTP/1.1 429 Too Many Requests\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.ends_with("Content-Length: 2\r\n\r\n{}"));
    }
}
