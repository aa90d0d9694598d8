// External mining routine. Not called by the store or dispatcher: the
// store accepts whatever `work` value arrives on a post, verified or not.
// This exists for the `coinpost mine` CLI subcommand and for building test
// fixtures that need a post meeting a given score target.

use crate::hash::{local_score, Hash};
use crate::post::Post;
use primitive_types::U256;

/// Outcome of a mining attempt: the post (mutated in place as `work` was
/// incremented) and whether it actually met `target` before the budget
/// ran out.
pub struct MineResult {
    pub post: Post,
    pub met_target: bool,
}

/// Increment `post.work` until `local_score(hash_of_post(post)) >= target`
/// or `attempts_budget` increments have been tried, whichever comes first.
pub fn mine(mut post: Post, target: Hash, attempts_budget: u64) -> MineResult {
    for _ in 0..attempts_budget {
        if local_score(post.hash()) >= target {
            return MineResult {
                post,
                met_target: true,
            };
        }
        post.work = post.work.checked_add(U256::from(1u8)).unwrap_or(U256::zero());
    }
    let met_target = local_score(post.hash()) >= target;
    MineResult { post, met_target }
}
