// The one error type the dispatcher's per-datagram handling can fail
// with, composed via `#[from]` so `?` carries each underlying error
// (address parsing, decode, store, transport I/O) up to a single catch
// site that logs and drops per the failure policy in SPEC_FULL.md §7.

use coinpost_core::{AddressError, DecodeError};
use coinpost_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("address error: {0}")]
    Address(#[from] AddressError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}
