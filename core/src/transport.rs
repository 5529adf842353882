//! Executing `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only place I/O happens. Implementations return every
//! received response as data, whatever its status, and reserve
//! `ApiError::Transport` for requests that never produced one. Once a status
//! line has arrived the exchange is a response, even if its body cannot be
//! read in full. Status interpretation stays in `PetClient`.

use std::sync::Arc;

use tracing::{trace, warn};
use ureq::http::Response;
use ureq::typestate::WithBody;
use ureq::{Agent, Body, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations must not keep per-call state: a transport is shared by
/// every operation of a client and possibly by several threads.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses are
/// returned as data rather than `Err`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;
        trace!(%method, %path, "executing request");

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&path), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&path), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&path), &headers), body),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .unwrap_or_else(|e| {
                warn!(status, error = %e, "response body unreadable, continuing without it");
                Vec::new()
            });

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(builder: RequestBuilder<WithBody>, body: Option<String>) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Answer exactly one request with `raw` bytes, then close.
    fn serve_once(raw: Vec<u8>) -> ClientConfig {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut seen = Vec::new();
            let mut buf = [0u8; 1024];
            while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
            }
            stream.write_all(&raw).unwrap();
        });
        ClientConfig::new(&format!("http://{addr}")).unwrap()
    }

    fn raw_response(status_line: &str, content_length: usize, body: &[u8]) -> Vec<u8> {
        let mut raw = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {content_length}\r\nconnection: close\r\n\r\n"
        )
        .into_bytes();
        raw.extend_from_slice(body);
        raw
    }

    fn get(config: &ClientConfig) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/1", config.collection_url()),
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn non_utf8_body_is_returned_as_bytes() {
        let body = [0xff, 0xfe, 0xfd];
        let config = serve_once(raw_response("404 Not Found", body.len(), &body));
        let response = UreqTransport::new(&config).execute(get(&config)).unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, body.to_vec());
        assert_eq!(response.header("content-type"), Some("application/json"));
    }

    #[test]
    fn body_cut_short_keeps_the_status() {
        let config = serve_once(raw_response("200 OK", 100, br#"{"id":"#));
        let response = UreqTransport::new(&config).execute(get(&config)).unwrap();

        assert_eq!(response.status, 200);
        assert!(response.body.len() < 100);
    }

    #[test]
    fn connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = ClientConfig::new(&format!("http://127.0.0.1:{port}")).unwrap();
        let transport = UreqTransport::new(&config);
        let request = HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/1", config.collection_url()),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.execute(request).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }
}
