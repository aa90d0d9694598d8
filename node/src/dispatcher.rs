// The node's single cooperative event loop: drain inbox, dispatch each
// message against the store, broadcast a keepalive, sleep, repeat.

use crate::error::DispatchError;
use crate::transport::Transport;
use coinpost_core::{codec, DecodeError, Message, Peer};
use coinpost_store::Store;
use std::net::SocketAddr;
use std::time::Duration;

/// Local port plus peer list plus the chain store; the complete mutable
/// state of one node.
pub struct NodeState {
    pub port: u16,
    pub peers: Vec<SocketAddr>,
    pub store: Store,
}

impl NodeState {
    pub fn new(port: u16, peers: Vec<SocketAddr>) -> Self {
        NodeState {
            port,
            peers,
            store: Store::new(),
        }
    }
}

pub struct Dispatcher {
    state: NodeState,
    transport: Transport,
    tick: Duration,
}

impl Dispatcher {
    pub fn new(state: NodeState, transport: Transport, tick: Duration) -> Self {
        Dispatcher {
            state,
            transport,
            tick,
        }
    }

    /// Runs until `shutdown` resolves, which happens once (e.g. on
    /// ctrl-c) and ends the loop on its next tick boundary.
    pub async fn run(mut self, mut shutdown: tokio::sync::oneshot::Receiver<()>) {
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received, stopping dispatcher");
                    break;
                }
                _ = self.tick_once() => {}
            }
        }
    }

    async fn tick_once(&mut self) {
        let inbox = self.transport.recv_batch().await;
        for (from, bytes) in inbox {
            if let Err(err) = self.handle_datagram(from, &bytes).await {
                log_dispatch_error(from, &err);
            }
        }

        let ping = Message::Ping;
        self.transport.broadcast(&self.state.peers, &ping).await;

        tokio::time::sleep(self.tick).await;
    }

    async fn handle_datagram(&mut self, from: SocketAddr, bytes: &[u8]) -> Result<(), DispatchError> {
        let sender = Peer::try_from(from)?;

        let payload = std::str::from_utf8(bytes).map_err(|_| DispatchError::Decode(DecodeError::BadHex))?;
        let message = codec::decode(payload)?;

        tracing::debug!(%sender, message = message.name(), "dispatching");
        self.on_message(sender, message).await
    }

    async fn on_message(&mut self, sender: Peer, message: Message) -> Result<(), DispatchError> {
        match message {
            Message::Ping => {
                self.transport.send(sender.to_socket_addr(), &Message::Pong).await?;
            }
            Message::Pong => {}
            Message::GetTip => {
                let tip = self.state.store.tip();
                if let Some(post) = self.state.store.get(&tip) {
                    let reply = Message::SharePost(*post);
                    self.transport.send(sender.to_socket_addr(), &reply).await?;
                }
            }
            Message::RequestPost(hash) => {
                if let Some(post) = self.state.store.get(&hash) {
                    let reply = Message::SharePost(*post);
                    self.transport.send(sender.to_socket_addr(), &reply).await?;
                }
            }
            Message::SharePost(post) => {
                self.state.store.add_post(sender, post)?;
            }
        }
        Ok(())
    }
}

/// Maps a dispatch failure to the log level its §7 failure-policy class
/// gets: parse/decode failures are routine network noise (`trace`), store
/// invariant breaks are real anomalies (`error`), transport I/O failures
/// sit in between (`warn`).
fn log_dispatch_error(from: SocketAddr, err: &DispatchError) {
    match err {
        DispatchError::Decode(_) | DispatchError::Address(_) => {
            tracing::trace!(%from, error = %err, "dropping datagram");
        }
        DispatchError::Store(_) => {
            tracing::error!(%from, error = %err, "rejected incoming post");
        }
        DispatchError::Io(_) => {
            tracing::warn!(%from, error = %err, "transport send failed");
        }
    }
}
