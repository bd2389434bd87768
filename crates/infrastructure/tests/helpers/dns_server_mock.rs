#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::rdata::{A, TXT};
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio_util::sync::CancellationToken;

pub const MOCK_ANSWER_TTL: u32 = 300;

/// Shape of the TXT answer given by [`UpstreamBehavior::LargeTxt`]: well
/// over 4 KiB once encoded.
pub const LARGE_TXT_STRINGS: usize = 30;
pub const LARGE_TXT_STRING_LEN: usize = 200;

#[derive(Debug, Clone, Copy)]
pub enum UpstreamBehavior {
    /// Answers every question with one A record.
    Answer(Ipv4Addr),
    /// Reads queries and never replies.
    Silent,
    /// Replies with a transaction id that does not match the query.
    WrongId,
    /// Sets TC over UDP and only gives the full answer over TCP.
    TruncatedOverUdp(Ipv4Addr),
    /// Sets TC over UDP and closes TCP connections without replying.
    TruncatedWithoutTcp,
    /// Answers over UDP with one TXT record too big for a 4 KiB buffer.
    LargeTxt,
}

/// Upstream resolver stand-in listening on one loopback port for both UDP
/// and TCP.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_hits: Arc<AtomicUsize>,
    tcp_hits: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl MockDnsServer {
    pub async fn start(behavior: UpstreamBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_hits = Arc::new(AtomicUsize::new(0));
        let tcp_hits = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();

        let hits = udp_hits.clone();
        let token = shutdown.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            hits.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::respond(behavior, &buf[..len], false) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        let hits = tcp_hits.clone();
        let token = shutdown.clone();
        tokio::spawn(async move {
            loop {
                let (mut stream, _) = tokio::select! {
                    _ = token.cancelled() => break,
                    accepted = listener.accept() => match accepted {
                        Ok(accepted) => accepted,
                        Err(_) => continue,
                    },
                };
                hits.fetch_add(1, Ordering::SeqCst);
                let mut len = [0u8; 2];
                if stream.read_exact(&mut len).await.is_err() {
                    continue;
                }
                let mut body = vec![0u8; u16::from_be_bytes(len) as usize];
                if stream.read_exact(&mut body).await.is_err() {
                    continue;
                }
                if let Some(response) = Self::respond(behavior, &body, true) {
                    let _ = stream
                        .write_all(&(response.len() as u16).to_be_bytes())
                        .await;
                    let _ = stream.write_all(&response).await;
                }
            }
        });

        Ok(Self {
            addr,
            udp_hits,
            tcp_hits,
            shutdown,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_hits(&self) -> usize {
        self.udp_hits.load(Ordering::SeqCst)
    }

    pub fn tcp_hits(&self) -> usize {
        self.tcp_hits.load(Ordering::SeqCst)
    }

    fn respond(behavior: UpstreamBehavior, query: &[u8], over_tcp: bool) -> Option<Vec<u8>> {
        let query = Message::from_vec(query).ok()?;
        let mut response = Message::new();
        response.set_id(query.id());
        response.set_message_type(MessageType::Response);
        response.set_recursion_desired(query.recursion_desired());
        response.set_recursion_available(true);
        response.add_queries(query.queries().iter().cloned());

        let ip = match behavior {
            UpstreamBehavior::Silent => return None,
            UpstreamBehavior::TruncatedWithoutTcp if over_tcp => return None,
            UpstreamBehavior::TruncatedWithoutTcp => {
                response.set_truncated(true);
                return response.to_vec().ok();
            }
            UpstreamBehavior::WrongId => {
                response.set_id(query.id().wrapping_add(1));
                return response.to_vec().ok();
            }
            UpstreamBehavior::LargeTxt => {
                if let Some(question) = query.queries().first() {
                    let strings = vec!["x".repeat(LARGE_TXT_STRING_LEN); LARGE_TXT_STRINGS];
                    response.add_answer(Record::from_rdata(
                        question.name().clone(),
                        MOCK_ANSWER_TTL,
                        RData::TXT(TXT::new(strings)),
                    ));
                }
                return response.to_vec().ok();
            }
            UpstreamBehavior::TruncatedOverUdp(_) if !over_tcp => {
                response.set_truncated(true);
                return response.to_vec().ok();
            }
            UpstreamBehavior::Answer(ip) | UpstreamBehavior::TruncatedOverUdp(ip) => ip,
        };

        if let Some(question) = query.queries().first() {
            response.add_answer(Record::from_rdata(
                question.name().clone(),
                MOCK_ANSWER_TTL,
                RData::A(A(ip)),
            ));
        }
        response.to_vec().ok()
    }

    pub fn shutdown(self) {
        self.shutdown.cancel();
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
