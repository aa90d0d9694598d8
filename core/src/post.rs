// The post record: an opaque payload plus the linkage fields that make it
// part of a chain.

use crate::hash::{hash_words, Hash};
use crate::BODY_WORDS;
use primitive_types::U256;

/// Opaque 1024-byte payload, represented as 32 256-bit words in index order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Body(pub [U256; BODY_WORDS]);

impl Body {
    pub const fn zero() -> Self {
        Body([U256::zero(); BODY_WORDS])
    }

    pub fn words(&self) -> &[U256; BODY_WORDS] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; BODY_WORDS * 32] {
        let mut out = [0u8; BODY_WORDS * 32];
        for (i, word) in self.0.iter().enumerate() {
            word.to_big_endian(&mut out[i * 32..(i + 1) * 32]);
        }
        out
    }

    /// Inverse of `to_bytes`. `bytes` must be exactly `BODY_WORDS * 32`
    /// long; callers at the wire boundary check this before calling.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), BODY_WORDS * 32);
        let mut words = [U256::zero(); BODY_WORDS];
        for (i, word) in words.iter_mut().enumerate() {
            *word = U256::from_big_endian(&bytes[i * 32..(i + 1) * 32]);
        }
        Body(words)
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::zero()
    }
}

/// An immutable post: a payload, the mined work value, and the hash of the
/// post it extends.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Post {
    pub body: Body,
    pub work: U256,
    pub prev: Hash,
}

impl Post {
    pub fn new(body: Body, work: U256, prev: Hash) -> Self {
        Post { body, work, prev }
    }

    /// The synthetic genesis post: zero body, zero work, zero prev.
    pub fn genesis() -> Self {
        Post {
            body: Body::zero(),
            work: U256::zero(),
            prev: Hash::zero(),
        }
    }

    /// `hash_words(body_words ++ [work, prev])`, except for the all-zero
    /// genesis shape, whose hash is fixed at `0` by definition rather than
    /// computed -- genesis is the one post that is not content-addressed.
    /// Any network post with this exact shape is therefore indistinguishable
    /// from genesis and is dropped as a duplicate on arrival.
    pub fn hash(&self) -> Hash {
        if self.body == Body::zero() && self.work.is_zero() && self.prev.is_zero() {
            return Hash::zero();
        }
        let mut words = Vec::with_capacity(BODY_WORDS + 2);
        words.extend_from_slice(self.body.words());
        words.push(self.work);
        words.push(self.prev);
        hash_words(&words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_round_trips_through_bytes() {
        let mut words = [U256::zero(); BODY_WORDS];
        for (i, w) in words.iter_mut().enumerate() {
            *w = U256::from(i as u64 + 1);
        }
        let body = Body(words);
        let bytes = body.to_bytes();
        assert_eq!(Body::from_bytes(&bytes), body);
    }

    #[test]
    fn hash_changes_with_work() {
        let mut post = Post::new(Body::zero(), U256::zero(), Hash::zero());
        let h1 = post.hash();
        post.work = U256::from(1u8);
        let h2 = post.hash();
        assert_ne!(h1, h2);
    }

    #[test]
    fn hash_is_deterministic() {
        let post = Post::new(Body::zero(), U256::from(7u8), Hash::from(9u8));
        assert_eq!(post.hash(), post.hash());
    }

    #[test]
    fn genesis_hash_is_fixed_at_zero() {
        assert_eq!(Post::genesis().hash(), Hash::zero());
    }
}
