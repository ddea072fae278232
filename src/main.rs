use std::sync::Arc;
use std::time::Duration;

use static_cors_server::config::{AppState, Config};
use static_cors_server::logger;
use static_cors_server::server::{self, ShutdownSignal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    // Build the Tokio runtime, sized by `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers.get());
    }
    let runtime = runtime_builder.build()?;

    let result = runtime.block_on(async_main(cfg));

    // In-flight connections are abandoned rather than drained
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::from_current_dir(cfg)?);

    let listener = match server::create_reusable_listener(addr) {
        Ok(listener) => listener,
        Err(e) => {
            logger::log_bind_failed(&addr, &e);
            return Err(e.into());
        }
    };

    // Handlers are installed before the startup lines so a signal sent after them is caught
    let shutdown = Arc::new(ShutdownSignal::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    logger::log_server_start(&addr, state.root());
    server::start_server_loop(listener, state, shutdown).await;

    logger::log_server_stopped();
    Ok(())
}
