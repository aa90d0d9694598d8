// Error taxonomy for the wire boundary. Nothing here is process-fatal;
// every call site logs and drops per the node's failure semantics.

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed hex payload")]
    BadHex,
    #[error("unknown message tag {0}")]
    UnknownTag(u8),
    #[error("payload truncated for this message variant")]
    Truncated,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("peer endpoint is not IPv4")]
    NotIpv4,
}
