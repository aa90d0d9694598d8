// UDP transport. Owns the one socket a node ever binds and drains it to
// exhaustion on each dispatcher tick rather than blocking on a single
// `recv`.

use crate::error::DispatchError;
use coinpost_core::codec;
use coinpost_core::Message;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

/// Generous headroom over the largest wire variant (`SharePost`, 2178 hex
/// chars); keeps a single oversized or malformed datagram from truncating
/// a legitimate one.
const RECV_BUF_LEN: usize = 4096;

pub struct Transport {
    socket: UdpSocket,
}

impl Transport {
    pub async fn bind(port: u16) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port)).await?;
        Ok(Transport { socket })
    }

    /// Drain every datagram currently buffered on the socket, stopping at
    /// the first `WouldBlock`. Never awaits past the first empty read, so
    /// a tick always makes forward progress even under sustained traffic.
    pub async fn recv_batch(&self) -> Vec<(SocketAddr, Vec<u8>)> {
        let mut batch = Vec::new();
        let mut buf = [0u8; RECV_BUF_LEN];
        loop {
            match self.socket.try_recv_from(&mut buf) {
                Ok((len, from)) => batch.push((from, buf[..len].to_vec())),
                Err(ref err) if err.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    tracing::warn!(error = %err, "transport recv error");
                    break;
                }
            }
        }
        batch
    }

    pub async fn send(&self, to: SocketAddr, message: &Message) -> Result<(), DispatchError> {
        let hex = codec::encode(message);
        self.socket.send_to(hex.as_bytes(), to).await?;
        Ok(())
    }

    pub async fn broadcast(&self, peers: &[SocketAddr], message: &Message) {
        for peer in peers {
            if let Err(err) = self.send(*peer, message).await {
                tracing::warn!(%peer, error = %err, "broadcast send failed");
            }
        }
    }
}
