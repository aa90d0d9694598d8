// Keccak-256 hash primitive and the local-score estimator derived from it.

use primitive_types::U256;
use tiny_keccak::{Hasher, Keccak};

/// A 256-bit content address. Also the domain over which `local_score`
/// operates, since a post's score is derived from its own hash.
pub type Hash = U256;

/// Keccak-256 of the concatenated big-endian encoding of each input word.
pub fn hash_words(words: &[U256]) -> Hash {
    let mut bytes = Vec::with_capacity(words.len() * 32);
    for word in words {
        let mut buf = [0u8; 32];
        word.to_big_endian(&mut buf);
        bytes.extend_from_slice(&buf);
    }
    let mut hasher = Keccak::v256();
    hasher.update(&bytes);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    Hash::from_big_endian(&out)
}

/// `floor(2^256 / h)`, the expected-attempt estimator: a smaller hash
/// implies more work went into producing it. `h = 0` saturates at the
/// maximum representable score, since `2^256` itself overflows `U256`.
pub fn local_score(h: Hash) -> Hash {
    if h.is_zero() {
        return Hash::MAX;
    }
    let quotient = Hash::MAX / h;
    let remainder = Hash::MAX % h;
    // U256::MAX + 1 == 2^256. Correct the floor(U256::MAX / h) quotient
    // for the extra `+ 1` in the dividend: it only changes the result
    // when the remainder is one short of a full divisor.
    if remainder == h - Hash::from(1u8) {
        quotient.checked_add(Hash::from(1u8)).unwrap_or(Hash::MAX)
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hash_saturates() {
        assert_eq!(local_score(Hash::zero()), Hash::MAX);
    }

    #[test]
    fn one_is_never_exceeded() {
        // local_score is the attempt estimator; it must never exceed the
        // representable ceiling for any non-zero hash.
        assert!(local_score(Hash::from(1u8)) <= Hash::MAX);
        assert!(local_score(Hash::MAX) >= Hash::from(1u8));
    }

    #[test]
    fn smaller_hash_scores_higher() {
        let small = Hash::from(2u8);
        let large = Hash::from(1_000_000u32);
        assert!(local_score(small) > local_score(large));
    }

    #[test]
    fn hash_words_is_deterministic() {
        let words = vec![Hash::from(1u8), Hash::from(2u8), Hash::from(3u8)];
        assert_eq!(hash_words(&words), hash_words(&words));
        let other = vec![Hash::from(1u8), Hash::from(2u8), Hash::from(4u8)];
        assert_ne!(hash_words(&words), hash_words(&other));
    }
}
