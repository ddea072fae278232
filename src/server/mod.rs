// Server module entry point
// Listener setup, accept loop, per-connection serving and shutdown signalling

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::{create_listener, create_reusable_listener, ListenerOptions};
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, ShutdownSignal};
