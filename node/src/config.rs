// Node configuration
// CLI args and runtime configuration

use clap::{Parser, Subcommand};
use std::net::SocketAddr;

/// The fixed seed list used when `--peers` is not given.
pub fn default_peers() -> Vec<SocketAddr> {
    [42000u16, 42001, 42002, 42003]
        .iter()
        .map(|port| SocketAddr::from(([127, 0, 0, 1], *port)))
        .collect()
}

#[derive(Parser, Debug)]
#[command(author, version, about = "coinpost gossip node", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the gossip node.
    Run(RunArgs),
    /// Mine a single post meeting a difficulty target and print it.
    Mine(MineArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Local UDP port to bind.
    #[arg(long)]
    pub port: u16,

    /// Peer seed overrides, repeatable. Defaults to
    /// 127.0.0.1:{42000,42001,42002,42003}.
    #[arg(long = "peers")]
    pub peers: Vec<SocketAddr>,

    /// Dispatcher loop sleep, in milliseconds.
    #[arg(long = "tick-millis", default_value_t = 25)]
    pub tick_millis: u64,
}

impl RunArgs {
    pub fn peers_or_default(&self) -> Vec<SocketAddr> {
        if self.peers.is_empty() {
            default_peers()
        } else {
            self.peers.clone()
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct MineArgs {
    /// Hash of the post to extend, hex-encoded. Defaults to genesis (all
    /// zeros) when omitted.
    #[arg(long)]
    pub prev: Option<String>,

    /// Number of leading zero bits the target score must exceed, expressed
    /// as `local_score >= 2^difficulty_bits`.
    #[arg(long = "difficulty-bits", default_value_t = 8)]
    pub difficulty_bits: u32,

    /// Maximum number of work increments to try before giving up.
    #[arg(long, default_value_t = 1_000_000)]
    pub attempts: u64,
}
