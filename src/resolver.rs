use crate::config::Config;
use crate::decoder::decode;
use crate::encoder::encode_question_query;
use crate::errors::{LookupError, Result};
use crate::transport::UdpTransport;
use crate::types::{DnsQuestion, DnsRecord, RecordType};
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info};

/// Encode, send, receive and decode a single query
pub struct Resolver {
    transport: UdpTransport,
}

impl Resolver {
    pub fn new(transport: UdpTransport) -> Self {
        Self { transport }
    }

    /// Build a resolver from configuration, resolving the server host if needed
    pub fn from_config(config: &Config) -> Result<Self> {
        let server = resolve_server(&config.server, config.port)?;
        let transport = UdpTransport::new(server)
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_buffer_size(config.buffer_size);
        Ok(Self::new(transport))
    }

    pub fn transport(&self) -> &UdpTransport {
        &self.transport
    }

    pub async fn lookup(&self, domain: &str, record_type: RecordType) -> Result<Vec<DnsRecord>> {
        self.lookup_with_id(domain, record_type, rand::random()).await
    }

    /// Lookup with a caller-chosen transaction ID. The ID in the response is
    /// not checked against it.
    pub async fn lookup_with_id(
        &self,
        domain: &str,
        record_type: RecordType,
        transaction_id: u16,
    ) -> Result<Vec<DnsRecord>> {
        let question = DnsQuestion::new(domain, record_type);
        question.validate()?;

        let query = encode_question_query(&question, transaction_id);
        debug!(
            domain = %question.name,
            record_type = %record_type,
            id = transaction_id,
            bytes = query.len(),
            "query encoded"
        );

        let response = self.transport.exchange(&query).await?;
        let records = decode(&response)?;

        info!(
            domain = %question.name,
            server = %self.transport.server(),
            answers = records.len(),
            "lookup complete"
        );
        Ok(records)
    }
}

/// Turn `host` and `port` into a socket address; `host` may be a literal IP
/// or a name for the system resolver.
pub fn resolve_server(host: &str, port: u16) -> Result<SocketAddr> {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = host.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    (host, port)
        .to_socket_addrs()
        .map_err(|e| LookupError::Config(format!("cannot resolve server '{}': {}", host, e)))?
        .next()
        .ok_or_else(|| LookupError::Config(format!("no address for server '{}'", host)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use tokio::net::UdpSocket;

    /// Answers every query with the question echoed and one A record.
    async fn spawn_mock_server(rcode: u8) -> SocketAddr {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
                let query = &buf[..len];
                let mut response = Vec::with_capacity(len + 16);
                response.extend_from_slice(&query[0..2]);
                response.push(0x81);
                response.push(0x80 | rcode);
                response.extend_from_slice(&query[4..6]);
                response.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
                response.extend_from_slice(&query[HEADER_SIZE..]);
                response.extend_from_slice(&[
                    0xC0, 0x0C, // pointer to the question name
                    0x00, 0x01, // A
                    0x00, 0x01, // IN
                    0x00, 0x00, 0x00, 0x3C, // TTL 60
                    0x00, 0x04, // RDLENGTH
                    93, 184, 216, 34,
                ]);
                let _ = socket.send_to(&response, peer).await;
            }
        });

        addr
    }

    #[tokio::test]
    async fn test_lookup_against_mock_server() {
        let addr = spawn_mock_server(0).await;
        let resolver = Resolver::new(UdpTransport::new(addr));

        let records = resolver.lookup("example.com", RecordType::A).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].to_string(), "A record: 93.184.216.34 (TTL: 60s)");
    }

    #[tokio::test]
    async fn test_lookup_server_error() {
        let addr = spawn_mock_server(3).await;
        let resolver = Resolver::new(UdpTransport::new(addr));

        let err = resolver.lookup("nope.example", RecordType::A).await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::ServerError(crate::types::ResponseCode::NameError)
        ));
    }

    #[tokio::test]
    async fn test_invalid_name_is_not_sent() {
        // Nothing listens here; validation must fail first
        let resolver = Resolver::new(
            UdpTransport::new("127.0.0.1:9".parse().unwrap())
                .with_timeout(Duration::from_millis(50)),
        );
        let name = format!("{}.com", "x".repeat(64));
        let err = resolver.lookup(&name, RecordType::A).await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidName(_)));
    }

    #[test]
    fn test_resolve_server_literals() {
        assert_eq!(
            resolve_server("8.8.8.8", DEFAULT_DNS_PORT).unwrap(),
            "8.8.8.8:53".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            resolve_server("[::1]", 5353).unwrap(),
            "[::1]:5353".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::new();
        config.server = "127.0.0.1".to_string();
        config.port = 5353;
        config.timeout_secs = 2;

        let resolver = Resolver::from_config(&config).unwrap();
        assert_eq!(
            resolver.transport().server(),
            "127.0.0.1:5353".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(resolver.transport().timeout(), Duration::from_secs(2));
    }
}
