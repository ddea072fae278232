//! Fixed response headers
//!
//! Every response leaving the server is finalized here: caching is disabled and
//! cross-origin access is allowed from anywhere. The values never vary per request.

use hyper::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, EXPIRES, PRAGMA,
};
use hyper::Response;

/// Headers appended to every response, in wire order
pub static FIXED_HEADERS: [(HeaderName, &str); 6] = [
    (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (PRAGMA, "no-cache"),
    (EXPIRES, "0"),
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Append the fixed header set to a response
///
/// Headers are appended after whatever the response already carries; nothing is
/// removed or replaced.
pub fn apply_fixed_headers<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();
    for (name, value) in &FIXED_HEADERS {
        headers.append(name.clone(), HeaderValue::from_static(value));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::body::Bytes;

    fn assert_fixed_headers<B>(response: &Response<B>) {
        for (name, value) in &FIXED_HEADERS {
            let values: Vec<_> = response.headers().get_all(name).iter().collect();
            assert_eq!(values.len(), 1, "expected exactly one {name}");
            assert_eq!(values[0], *value, "wrong value for {name}");
        }
    }

    #[test]
    fn test_applies_to_success() {
        let resp = apply_fixed_headers(Response::new(Full::new(Bytes::from("ok"))));
        assert_fixed_headers(&resp);
    }

    #[test]
    fn test_applies_to_errors() {
        let resp = Response::builder()
            .status(404)
            .header("Content-Type", "text/plain")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = apply_fixed_headers(resp);
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["content-type"], "text/plain");
        assert_fixed_headers(&resp);
    }

    #[test]
    fn test_appended_after_existing_headers() {
        let resp = Response::builder()
            .header("Content-Type", "text/html")
            .header("Content-Length", "5")
            .body(())
            .unwrap();
        let resp = apply_fixed_headers(resp);
        let names: Vec<&str> = resp.headers().keys().map(HeaderName::as_str).collect();
        assert_eq!(
            names,
            [
                "content-type",
                "content-length",
                "cache-control",
                "pragma",
                "expires",
                "access-control-allow-origin",
                "access-control-allow-methods",
                "access-control-allow-headers",
            ]
        );
    }
}
