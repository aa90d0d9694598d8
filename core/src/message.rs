// The gossip message set. Five variants: two keepalives, a tip query, and
// the pull/push pair that actually moves posts between nodes.

use crate::hash::Hash;
use crate::post::Post;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Message {
    Ping,
    Pong,
    GetTip,
    RequestPost(Hash),
    SharePost(Post),
}

impl Message {
    /// Short name for logging; avoids formatting a whole `SharePost`
    /// payload into the log line on every receipt.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Ping => "Ping",
            Message::Pong => "Pong",
            Message::GetTip => "GetTip",
            Message::RequestPost(_) => "RequestPost",
            Message::SharePost(_) => "SharePost",
        }
    }
}
