//! Request dispatch module
//!
//! Entry point for HTTP request processing: dispatches on method, then finalizes the
//! response with the fixed header set before it is handed back to hyper.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body as _;
use hyper::header::{
    HeaderName, HeaderValue, CONTENT_LENGTH, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, SERVER,
    USER_AGENT,
};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
///
/// Every response produced here, whatever the status, passes through
/// [`finalize_response`] on the way out. Request bodies are never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let response = dispatch(&parts, &state).await;
    let response = finalize_response(response, &state);

    if state.config.logging.access_log {
        log_access(&parts, &response, peer_addr, started, &state);
    }

    Ok(response)
}

/// Route by method: OPTIONS short-circuits, GET/HEAD hit the filesystem, the rest is 501
async fn dispatch(parts: &Parts, state: &AppState) -> Response<ResponseBody> {
    match &parts.method {
        &Method::OPTIONS => http::build_options_response(),
        &Method::GET | &Method::HEAD => {
            let ctx = RequestContext {
                path: parts.uri.path(),
                query: parts.uri.query(),
                is_head: parts.method == Method::HEAD,
                if_modified_since: parts
                    .headers
                    .get(IF_MODIFIED_SINCE)
                    .and_then(|v| v.to_str().ok()),
                has_if_none_match: parts.headers.contains_key(IF_NONE_MATCH),
            };
            static_files::serve_path(&ctx, state.root()).await
        }
        method => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            http::build_501_response(method)
        }
    }
}

/// Response-finalization hook applied to every response
///
/// Adds the `Server` header, then appends the fixed cache and cross-origin headers.
pub fn finalize_response(
    mut response: Response<ResponseBody>,
    state: &AppState,
) -> Response<ResponseBody> {
    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }
    http::apply_fixed_headers(response)
}

fn log_access(
    parts: &Parts,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.status = response.status().as_u16();
    // Streamed file bodies have no exact size hint; their length is in the header
    entry.body_bytes = if parts.method == Method::HEAD {
        0
    } else {
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .or_else(|| response.body().size_hint().exact())
            .unwrap_or(0)
    };
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
