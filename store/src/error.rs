use coinpost_core::Hash;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// `post.prev` is in `posts` but has no recorded cumulative score.
    /// Reachable only if an earlier insertion broke the store's own
    /// invariants; treated as a fatal break for the offending post.
    #[error("parent {parent:x} is known but has no recorded score")]
    MissingParentScore { parent: Hash },

    /// `score[prev] + local_score(hash)` does not fit in a `U256`. Not
    /// expected under realistic work values; guarded against anyway since
    /// `add_post` must never panic on untrusted network input.
    #[error("cumulative score overflow while inserting {hash:x}")]
    ScoreOverflow { hash: Hash },
}
