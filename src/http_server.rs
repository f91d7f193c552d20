//! HTTP surface for the paginated-read service
//!
//! Exposes the read endpoint at `/api` via both a query-parameter GET and a
//! JSON-body POST (functionally equivalent apart from the per-surface
//! validation defaults), plus `/health` and `/metrics`.

use crate::error::PagerError;
use crate::models::PageResponse;
use crate::service::PagerService;
use crate::validator::{RawPageRequest, Surface};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// HTTP server wrapping a [`PagerService`]
pub struct HttpServer {
    service: Arc<PagerService>,
    addr: SocketAddr,
}

impl HttpServer {
    /// Create a new server for the given service and bind address
    pub fn new(service: Arc<PagerService>, addr: SocketAddr) -> Self {
        Self { service, addr }
    }

    /// Start serving requests
    ///
    /// Runs until the process is terminated; each accepted connection is
    /// served on its own task.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("csv-pager listening on http://{}", self.addr);
        info!("Read endpoint at http://{}/api", self.addr);

        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let service = Arc::clone(&self.service);

            tokio::task::spawn(async move {
                let handler = service_fn(move |req| {
                    let service = Arc::clone(&service);
                    async move { handle_request(req, service).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, handler).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Route one incoming request
async fn handle_request(
    req: Request<hyper::body::Incoming>,
    service: Arc<PagerService>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/api") => {
            let raw = raw_from_query(req.uri().query().unwrap_or(""));
            Ok(page_response(service.handle(raw, Surface::Query).await))
        }
        (&Method::POST, "/api") => {
            let body = req.into_body().collect().await?.to_bytes();
            match raw_from_body(&body) {
                Ok(raw) => Ok(page_response(service.handle(raw, Surface::Body).await)),
                Err(message) => Ok(error_response(StatusCode::BAD_REQUEST, &message)),
            }
        }
        (&Method::GET, "/health") => Ok(health_response()),
        (&Method::GET, "/metrics") => Ok(metrics_response(&service)),
        _ => Ok(not_found_response()),
    }
}

/// Assemble raw request fields from a query string
///
/// The first occurrence of each recognized parameter wins; values stay
/// strings so the validator owns all interpretation.
fn raw_from_query(query: &str) -> RawPageRequest {
    let mut raw = RawPageRequest::default();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "url" if raw.url.is_none() => raw.url = Some(value.into_owned()),
            "limit" if raw.limit.is_none() => raw.limit = Some(value.into_owned()),
            "page" if raw.page.is_none() => raw.page = Some(value.into_owned()),
            "filter" if raw.filter.is_none() => raw.filter = Some(value.into_owned()),
            _ => {}
        }
    }
    raw
}

/// Request body shape for the POST surface
///
/// `limit` and `page` accept JSON numbers or strings; either way they reach
/// the validator as strings. JSON null counts as absent.
#[derive(Deserialize)]
struct BodyFields {
    url: Option<String>,
    limit: Option<serde_json::Value>,
    page: Option<serde_json::Value>,
    filter: Option<String>,
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        // Anything else stringifies and fails numeric validation downstream
        other => Some(other.to_string()),
    }
}

/// Assemble raw request fields from a JSON request body
fn raw_from_body(body: &[u8]) -> Result<RawPageRequest, String> {
    let fields: BodyFields = serde_json::from_slice(body)
        .map_err(|_| "request body should be valid JSON".to_string())?;

    Ok(RawPageRequest {
        url: fields.url,
        limit: fields.limit.and_then(value_to_string),
        page: fields.page.and_then(value_to_string),
        filter: fields.filter,
    })
}

/// Render a service result as an HTTP response
///
/// Success is the page as JSON; failures carry the error's display message in
/// `{"error": ...}` with the status the error maps to.
fn page_response(result: Result<PageResponse, PagerError>) -> Response<Full<Bytes>> {
    match result {
        Ok(page) => match serde_json::to_vec(&page) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(e) => {
                error!("Failed to encode response: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        },
        Err(e) => {
            let status = StatusCode::from_u16(e.to_http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            error_response(status, &e.to_string())
        }
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    json_response(status, body.to_string().into_bytes())
}

fn health_response() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        br#"{"status":"healthy"}"#.to_vec(),
    )
}

fn metrics_response(service: &PagerService) -> Response<Full<Bytes>> {
    match service.metrics().export() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/plain; version=0.0.4; charset=utf-8")
            .body(Full::new(Bytes::from(body)))
            .unwrap(),
        Err(e) => {
            error!("Failed to export metrics: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn not_found_response() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not found")
}
