//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from file lookup.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use headers::{apply_fixed_headers, FIXED_HEADERS};
pub use response::{
    build_301_response, build_304_response, build_404_response, build_501_response,
    build_file_response, build_html_response, build_options_response, empty_body, file_body,
    full_body, ResponseBody,
};
