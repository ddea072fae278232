//! HTTP response building module
//!
//! Provides builders for each status the server produces, decoupled from file lookup.
//! File bodies are streamed from the open handle; everything else is a small in-memory body.

use futures::TryStreamExt;
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::{Method, Response};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Body type shared by every response the server produces
pub type ResponseBody = BoxBody<Bytes, std::io::Error>;

/// In-memory body
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into()).map_err(|never| match never {}).boxed()
}

pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

/// Body streamed chunk by chunk from an open file
pub fn file_body(file: File) -> ResponseBody {
    StreamBody::new(ReaderStream::new(file).map_ok(Frame::data)).boxed()
}

/// Build 200 response carrying a file
///
/// `content_length` comes from the file's metadata; for HEAD the file is dropped unread.
pub fn build_file_response(
    file: File,
    content_length: u64,
    content_type: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<ResponseBody> {
    let body = if is_head { empty_body() } else { file_body(file) };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);
    if let Some(last_modified) = last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(empty_body())
    })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        empty_body()
    } else {
        full_body(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty_body())
        })
}

/// Build 200 response to a preflight request
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(200)
        .header("Content-Length", 0)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(empty_body())
        })
}

/// Build 301 redirect response, used to add a trailing slash to directory paths
pub fn build_301_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(empty_body())
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(304)
        .header("Last-Modified", last_modified)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(empty_body())
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .header("Content-Length", 13)
        .body(full_body("404 Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(full_body("404 Not Found"))
        })
}

/// Build 501 Not Implemented response for methods the server does not handle
pub fn build_501_response(method: &Method) -> Response<ResponseBody> {
    let message = format!("501 Not Implemented: unsupported method ('{method}')");
    Response::builder()
        .status(501)
        .header("Content-Type", "text/plain")
        .header("Content-Length", message.len())
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(full_body(message))
        .unwrap_or_else(|e| {
            log_build_error("501", &e);
            Response::new(empty_body())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
