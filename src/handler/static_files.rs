//! Static file serving module
//!
//! Maps request paths onto the served root and builds file, index, and listing responses.

use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, ResponseBody};
use crate::logger;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Files tried, in order, when a directory is requested
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Serve whatever the request path names under `root`
pub async fn serve_path(ctx: &RequestContext<'_>, root: &Path) -> Response<ResponseBody> {
    let Some(relative) = resolve_request_path(ctx.path) else {
        return http::build_404_response();
    };

    let root = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_error(&format!(
                "Served root inaccessible '{}': {e}",
                root.display()
            ));
            return http::build_404_response();
        }
    };

    // Not found is common (404), no need to log
    let Some(target) = confine_to_root(&root, &root.join(&relative), ctx.path).await else {
        return http::build_404_response();
    };
    let Ok(metadata) = fs::metadata(&target).await else {
        return http::build_404_response();
    };

    if metadata.is_dir() {
        serve_directory(ctx, &root, &target).await
    } else if metadata.is_file() && !ctx.path.ends_with('/') {
        serve_file(ctx, &target).await
    } else {
        http::build_404_response()
    }
}

/// Turn a raw request path into a path relative to the served root
///
/// The path is percent-decoded and split on `/`. Empty, `.` and `..` segments are
/// dropped, as is anything that would not stay a single plain path component (a
/// Windows drive prefix, for example), so the result never climbs above the root.
/// Returns `None` when the path does not decode to UTF-8.
pub fn resolve_request_path(request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;

    let relative = decoded
        .split('/')
        .filter(|segment| is_plain_component(segment))
        .collect::<PathBuf>();

    Some(relative)
}

fn is_plain_component(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Canonicalize `path` and make sure it is still under `root`
///
/// Symlinks are followed, so a link pointing outside the root is rejected here.
async fn confine_to_root(root: &Path, path: &Path, request_path: &str) -> Option<PathBuf> {
    let canonical = fs::canonicalize(path).await.ok()?;
    if canonical.starts_with(root) {
        Some(canonical)
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        None
    }
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    root: &Path,
    dir: &Path,
) -> Response<ResponseBody> {
    if !ctx.path.ends_with('/') {
        return http::build_301_response(&redirect_location(ctx.path, ctx.query));
    }

    for index_file in INDEX_FILES {
        let Some(index_path) = confine_to_root(root, &dir.join(index_file), ctx.path).await
        else {
            continue;
        };
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, &index_path).await;
        }
    }

    let entries = match listing::read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_warning(&format!(
                "Cannot list directory '{}': {e}",
                dir.display()
            ));
            return http::build_404_response();
        }
    };

    let display_path = urlencoding::decode(ctx.path)
        .map_or_else(|_| ctx.path.to_string(), std::borrow::Cow::into_owned);
    http::build_html_response(listing::render_listing(&display_path, entries), ctx.is_head)
}

/// Location for the trailing-slash redirect of a directory request
///
/// A leading run of slashes is collapsed to one so the target can never read as a
/// scheme-relative URL (`//host/`) pointing at another site.
pub fn redirect_location(request_path: &str, query: Option<&str>) -> String {
    let path = format!("/{}/", request_path.trim_start_matches('/'));
    match query {
        Some(query) => format!("{path}?{query}"),
        None => path,
    }
}

/// Serve a regular file with `Last-Modified` and `If-Modified-Since` support
///
/// The file is opened once and its body is streamed from that handle.
async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<ResponseBody> {
    let file = match fs::File::open(file_path).await {
        Ok(f) => f,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to open file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response();
        }
    };
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response();
        }
    };

    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let (Some(modified), Some(last_modified)) = (modified, last_modified.as_deref()) {
        if cache::is_not_modified(ctx.if_modified_since, ctx.has_if_none_match, modified) {
            return http::build_304_response(last_modified);
        }
    }

    http::build_file_response(
        file,
        metadata.len(),
        mime::content_type_for(file_path),
        last_modified.as_deref(),
        ctx.is_head,
    )
}
