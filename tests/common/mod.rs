//! Shared utilities for integration testing.

use tokio::net::TcpListener;

/// Start a mock TCP service on an ephemeral port. Connections are accepted
/// and immediately dropped; the probes only need a completed handshake.
/// Returns the bound port.
pub async fn start_mock_service() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((_socket, _)) => {}
                Err(_) => break,
            }
        }
    });

    port
}

/// A port with nothing listening behind it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
