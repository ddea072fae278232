//! Static file server with fixed no-cache and permissive CORS response headers.
//!
//! Files are served from the directory the process was started in; every response,
//! including errors and preflight replies, carries the same cache and cross-origin
//! header set.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
