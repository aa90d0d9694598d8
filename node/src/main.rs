// coinpost-node
// Entry point: parses the CLI, then either runs the gossip dispatcher or
// mines a single post and prints it.

mod config;
mod dispatcher;
mod error;
mod logging;
mod transport;

use clap::Parser;
use coinpost_core::{mine, Body, Hash, Post};
use config::{Cli, Command, MineArgs, RunArgs};
use dispatcher::{Dispatcher, NodeState};
use primitive_types::U256;
use std::time::Duration;
use transport::Transport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run_node(args).await,
        Command::Mine(args) => mine_post(args),
    }
}

async fn run_node(args: RunArgs) -> anyhow::Result<()> {
    let peers = args.peers_or_default();
    tracing::info!(port = args.port, peers = peers.len(), "starting node");

    let state = NodeState::new(args.port, peers);
    let transport = Transport::bind(args.port).await?;
    let dispatcher = Dispatcher::new(state, transport, Duration::from_millis(args.tick_millis));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    dispatcher.run(shutdown_rx).await;
    Ok(())
}

fn mine_post(args: MineArgs) -> anyhow::Result<()> {
    let prev = match args.prev {
        Some(hex_str) => parse_hash(&hex_str)?,
        None => Hash::zero(),
    };

    let target = difficulty_target(args.difficulty_bits);
    let post = Post::new(Body::zero(), U256::zero(), prev);
    let result = mine(post, target, args.attempts);

    println!("hash:        {:x}", result.post.hash());
    println!("work:        {}", result.post.work);
    println!("prev:        {:x}", result.post.prev);
    println!("met target:  {}", result.met_target);
    Ok(())
}

fn parse_hash(hex_str: &str) -> anyhow::Result<Hash> {
    let trimmed = hex_str.trim_start_matches("0x");
    let bytes = hex::decode(trimmed)?;
    if bytes.len() > 32 {
        anyhow::bail!("hash hex is longer than 32 bytes");
    }
    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(Hash::from_big_endian(&padded))
}

/// `2^difficulty_bits`, saturating at `Hash::MAX` rather than panicking
/// for `difficulty_bits >= 256`.
fn difficulty_target(difficulty_bits: u32) -> Hash {
    if difficulty_bits >= 256 {
        Hash::MAX
    } else {
        Hash::from(1u8) << difficulty_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hash_with_0x_prefix() {
        let h = parse_hash("0x01").unwrap();
        assert_eq!(h, Hash::from(1u8));
    }

    #[test]
    fn parses_hash_without_prefix() {
        let h = parse_hash("ff").unwrap();
        assert_eq!(h, Hash::from(0xffu8));
    }

    #[test]
    fn rejects_oversized_hash() {
        let too_long = "00".repeat(33);
        assert!(parse_hash(&too_long).is_err());
    }

    #[test]
    fn difficulty_target_saturates_at_max() {
        assert_eq!(difficulty_target(256), Hash::MAX);
        assert_eq!(difficulty_target(1), Hash::from(2u8));
    }
}
