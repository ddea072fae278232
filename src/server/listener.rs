// Listener module
// Creates TCP listeners from explicit socket options

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Socket options applied when a listener is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// `SO_REUSEADDR`: allow binding while an earlier socket on the port is in `TIME_WAIT`
    pub reuse_address: bool,
    /// Pending connection queue length
    pub backlog: i32,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            reuse_address: true,
            backlog: 128,
        }
    }
}

/// Create a `TcpListener` with `SO_REUSEADDR` enabled.
///
/// A restarted server can bind its port right away instead of failing with
/// "address in use" while connections from the previous run linger in `TIME_WAIT`.
pub fn create_reusable_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    create_listener(addr, ListenerOptions::default())
}

/// Create a `TcpListener` bound to `addr` with the given options.
///
/// Must be called from within a Tokio runtime.
///
/// # Returns
///
/// * `Ok(TcpListener)` - Successfully created and bound listener
/// * `Err(std::io::Error)` - Failed to create or bind socket
pub fn create_listener(addr: SocketAddr, options: ListenerOptions) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(options.reuse_address)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(options.backlog)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_binds_ephemeral_port() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_port_in_use_is_an_error() {
        let first = create_listener(
            "127.0.0.1:0".parse().unwrap(),
            ListenerOptions {
                reuse_address: false,
                ..ListenerOptions::default()
            },
        )
        .unwrap();
        let addr = first.local_addr().unwrap();

        let second = create_reusable_listener(addr);
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_rebind_while_previous_connection_lingers() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let mut client = tokio::net::TcpStream::connect(addr).await.unwrap();
        let (server_side, _) = listener.accept().await.unwrap();

        // Server side closes first, so its end of the connection enters TIME_WAIT
        drop(server_side);
        drop(listener);
        let mut buf = [0u8; 1];
        assert_eq!(client.read(&mut buf).await.unwrap(), 0);
        drop(client);

        let rebound = create_reusable_listener(addr).unwrap();
        assert_eq!(rebound.local_addr().unwrap(), addr);
    }
}
