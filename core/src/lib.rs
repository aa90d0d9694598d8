// coinpost-core
// Hash primitive, post model, wire address, message enum, and codec shared
// by every coinpost crate.

pub mod address;
pub mod codec;
pub mod error;
pub mod hash;
pub mod message;
pub mod mine;
pub mod post;

pub use address::{Address, Peer};
pub use error::{AddressError, DecodeError};
pub use hash::{local_score, Hash};
pub use message::Message;
pub use mine::{mine, MineResult};
pub use post::{Body, Post};

/// Number of 256-bit words in a post body (32 words * 32 bytes = 1024 bytes).
pub const BODY_WORDS: usize = 32;
/// Size in bytes of a serialized post body.
pub const BODY_BYTES: usize = BODY_WORDS * 32;
