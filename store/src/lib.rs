// coinpost-store
// The in-memory chain database: post table, child index, pending (orphan)
// buffer, cumulative-score table, and current tip.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::Store;
