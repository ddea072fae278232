//! Logger module
//!
//! Provides logging utilities for the HTTP server:
//! - Server lifecycle logging on stdout
//! - Access logging with multiple formats on stderr
//! - Error and warning logging on stderr

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;
use std::path::Path;

/// Write to info log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error/access log
fn write_error(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    write_info(&format!("Starting server on {addr}"));
    write_info(&format!("Serving files from: {}", root.display()));
}

pub fn log_server_stopped() {
    write_info("\nServer stopped");
}

pub fn log_signal_received(name: &str) {
    write_error(&format!("[SIGNAL] {name} received, shutting down"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    log_error(&format!("Failed to bind {addr}: {err}"));
}

/// Log formatted access log entry
///
/// Access lines go to stderr so stdout only carries the lifecycle lines.
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_error(&entry.format(format));
}
