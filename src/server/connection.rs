// Connection handling module
// Serves a single accepted TCP connection in its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 connection settings (keep-alive, title-case headers)
/// 3. Limits how long a client may take to send a request head
/// 4. Serves every request on the connection with the request handler
///
/// The header timeout only covers reading request heads, so a long response body
/// is never cut off. Errors stay inside the task; they are logged and end only this
/// connection.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let performance = &state.config.performance;

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive);
        builder.title_case_headers(true);
        if performance.connection_timeout > 0 {
            builder.timer(TokioTimer::new());
            builder.header_read_timeout(Duration::from_secs(performance.connection_timeout));
        }

        let service_state = Arc::clone(&state);
        let result = builder
            .serve_connection(
                io,
                service_fn(move |req| {
                    handler::handle_request(req, Arc::clone(&service_state), peer_addr)
                }),
            )
            .await;

        if let Err(err) = result {
            if err.is_timeout() {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} sent no request head within {} seconds",
                    performance.connection_timeout
                ));
            } else {
                logger::log_connection_error(&err);
            }
        }
    });
}
