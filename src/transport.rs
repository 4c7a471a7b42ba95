use crate::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_TIMEOUT};
use crate::errors::{LookupError, Result};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::debug;

/// One-datagram UDP exchange with a resolver
#[derive(Debug, Clone)]
pub struct UdpTransport {
    server: SocketAddr,
    timeout: Duration,
    buffer_size: usize,
}

impl UdpTransport {
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            timeout: DEFAULT_TIMEOUT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `query` and wait for a single datagram back.
    ///
    /// Datagrams longer than the receive buffer are cut to its size.
    pub async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>> {
        let bind_addr: SocketAddr = if self.server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(self.server).await?;

        let sent = socket.send(query).await?;
        debug!(server = %self.server, bytes = sent, "query sent");

        let mut buf = vec![0u8; self.buffer_size];
        let len = match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(received) => received?,
            Err(_) => return Err(LookupError::Timeout(self.timeout)),
        };
        buf.truncate(len);

        debug!(server = %self.server, bytes = len, "response received");
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exchange_echo() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            if let Ok((len, peer)) = server.recv_from(&mut buf).await {
                let _ = server.send_to(&buf[..len], peer).await;
            }
        });

        let transport = UdpTransport::new(server_addr);
        let reply = transport.exchange(b"ping").await.unwrap();
        assert_eq!(reply, b"ping");
    }

    #[tokio::test]
    async fn test_exchange_timeout() {
        // Bound but silent
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        let transport =
            UdpTransport::new(server_addr).with_timeout(Duration::from_millis(100));
        match transport.exchange(b"ping").await {
            Err(LookupError::Timeout(waited)) => {
                assert_eq!(waited, Duration::from_millis(100))
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        drop(server);
    }

    #[tokio::test]
    async fn test_buffer_size_limits_datagram() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            if let Ok((_, peer)) = server.recv_from(&mut buf).await {
                let _ = server.send_to(&[7u8; 64], peer).await;
            }
        });

        let transport = UdpTransport::new(server_addr).with_buffer_size(16);
        let reply = transport.exchange(b"ping").await.unwrap();
        assert_eq!(reply.len(), 16);
    }
}
