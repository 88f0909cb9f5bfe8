use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use warden_foundation::AppError;

const PROBE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Bounded startup wait for the notification endpoint, the host-side
/// analogue of a station-mode WiFi join: probe every `interval` until the
/// budget runs out. Failure is reported, not fatal - the caller decides
/// whether to continue without connectivity.
pub fn wait_for_endpoint(
    host: &str,
    port: u16,
    budget: Duration,
    interval: Duration,
) -> Result<(), AppError> {
    let addr = format!("{host}:{port}");
    let deadline = Instant::now() + budget;

    tracing::info!(endpoint = %addr, "Waiting for notification endpoint");
    loop {
        match probe(&addr) {
            Ok(()) => {
                tracing::info!(endpoint = %addr, "Notification endpoint reachable");
                return Ok(());
            }
            Err(e) => {
                if Instant::now() + interval >= deadline {
                    return Err(AppError::Connectivity(format!("{addr}: {e}")));
                }
                std::thread::sleep(interval);
            }
        }
    }
}

fn probe(addr: &str) -> std::io::Result<()> {
    let target = addr.to_socket_addrs()?.next().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no address resolved")
    })?;
    TcpStream::connect_timeout(&target, PROBE_CONNECT_TIMEOUT).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn reachable_endpoint_succeeds_immediately() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        wait_for_endpoint(
            "127.0.0.1",
            port,
            Duration::from_secs(1),
            Duration::from_millis(50),
        )
        .unwrap();
    }

    #[test]
    fn unreachable_endpoint_reports_connectivity_failure() {
        // Bind-then-drop to find a port with nothing listening.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let result = wait_for_endpoint(
            "127.0.0.1",
            port,
            Duration::from_millis(200),
            Duration::from_millis(50),
        );
        assert!(matches!(result, Err(AppError::Connectivity(_))));
    }
}
