use tokio::net::TcpStream;
use tracing::debug;

/// Open and immediately drop a TCP connection to `host:port`.
pub(super) async fn probe_tcp(host: &str, port: u16) -> bool {
    match TcpStream::connect((host, port)).await {
        Ok(stream) => {
            drop(stream);
            true
        }
        Err(e) => {
            debug!(host, port, error = %e, "wallet daemon not reachable");
            false
        }
    }
}
