use dnslookup::transport::UdpTransport;
use dnslookup::{decode, encode, LookupError, RecordData, RecordType, Resolver};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// Replies to each query with a canned answer section after the echoed question.
struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    async fn start(flags: u16, answers: Vec<(u16, u32, Vec<u8>)>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let response = build_response(&buf[..len], flags, &answers);
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn resolver(&self) -> Resolver {
        Resolver::new(UdpTransport::new(self.addr).with_timeout(Duration::from_secs(2)))
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_response(query: &[u8], flags: u16, answers: &[(u16, u32, Vec<u8>)]) -> Vec<u8> {
    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&query[0..2]);
    response.extend_from_slice(&flags.to_be_bytes());
    response.extend_from_slice(&query[4..6]);
    response.extend_from_slice(&(answers.len() as u16).to_be_bytes());
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    response.extend_from_slice(&query[12..]);

    for (rtype, ttl, rdata) in answers {
        response.extend_from_slice(&[0xC0, 0x0C]);
        response.extend_from_slice(&rtype.to_be_bytes());
        response.extend_from_slice(&1u16.to_be_bytes());
        response.extend_from_slice(&ttl.to_be_bytes());
        response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        response.extend_from_slice(rdata);
    }
    response
}

#[tokio::test]
async fn test_mixed_answers_keep_wire_order() {
    let v6: std::net::Ipv6Addr = "2606:2800:220:1:248:1893:25c8:1946".parse().unwrap();
    let server = MockDnsServer::start(
        0x8180,
        vec![
            (5, 30, vec![3, b'c', b'd', b'n', 0xC0, 0x0C]),
            (15, 30, vec![0x00, 0x0A, 0xC0, 0x0C]),
            (1, 300, vec![93, 184, 216, 34]),
            (28, 600, v6.octets().to_vec()),
        ],
    )
    .await;

    let records = server
        .resolver()
        .lookup("example.com", RecordType::A)
        .await
        .unwrap();

    let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "CNAME record: <CNAME data> (TTL: 30s)",
            "A record: 93.184.216.34 (TTL: 300s)",
            "AAAA record: 2606:2800:220:1:248:1893:25c8:1946 (TTL: 600s)",
        ]
    );
}

#[tokio::test]
async fn test_empty_answer_section() {
    let server = MockDnsServer::start(0x8180, Vec::new()).await;
    let records = server
        .resolver()
        .lookup("example.com", RecordType::Aaaa)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_refused() {
    let server = MockDnsServer::start(0x8185, Vec::new()).await;
    let err = server
        .resolver()
        .lookup("example.com", RecordType::A)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Server error: Refused (REFUSED)");
}

#[tokio::test]
async fn test_echoed_query_is_not_a_response() {
    // Flags with QR cleared, as a reflector would send back
    let server = MockDnsServer::start(0x0100, vec![(1, 1, vec![1, 1, 1, 1])]).await;
    let err = server
        .resolver()
        .lookup("example.com", RecordType::A)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NotAResponse));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let resolver = Resolver::new(
        UdpTransport::new(silent.local_addr().unwrap()).with_timeout(Duration::from_millis(100)),
    );

    let err = resolver
        .lookup("example.com", RecordType::A)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Timeout(_)));
    assert!(!err.is_decode_error());
}

#[test]
fn test_codec_without_transport() {
    let query = encode("example.com", 1, 0x0001);
    let mut response = build_response(&query, 0x8180, &[(1, 120, vec![10, 1, 2, 3])]);
    let records = decode(&response).unwrap();
    assert_eq!(records[0].data, RecordData::A(Ipv4Addr::new(10, 1, 2, 3)));

    response.truncate(response.len() - 1);
    assert!(matches!(decode(&response), Err(LookupError::TruncatedRecord)));
}
