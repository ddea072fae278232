//! Request handler module
//!
//! Method dispatch, static file serving, and directory listings.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{finalize_response, handle_request};
