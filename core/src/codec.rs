// Symmetric binary encoder/decoder for `Message`. Field-order concatenation
// of fixed-width values, hex-encoded for the wire. Odd-length hex is
// padded with a trailing `0` nibble on encode so decoders always operate
// on whole bytes; in practice `hex::encode` of a byte buffer is always
// even-length, so the pad is defensive rather than load-bearing.

use crate::error::DecodeError;
use crate::hash::Hash;
use crate::message::Message;
use crate::post::{Body, Post};
use crate::BODY_BYTES;
use primitive_types::U256;

const TAG_PING: u8 = 0;
const TAG_PONG: u8 = 1;
const TAG_GET_TIP: u8 = 2;
const TAG_REQUEST_POST: u8 = 3;
const TAG_SHARE_POST: u8 = 4;

const HASH_BYTES: usize = 32;
const SHARE_POST_BODY_LEN: usize = BODY_BYTES + HASH_BYTES + HASH_BYTES;

/// Encode a message to its hex-encoded wire form.
pub fn encode(message: &Message) -> String {
    let bytes = encode_bytes(message);
    let mut hex = hex::encode(bytes);
    if hex.len() % 2 != 0 {
        hex.push('0');
    }
    hex
}

fn encode_bytes(message: &Message) -> Vec<u8> {
    let mut buf = Vec::new();
    match message {
        Message::Ping => buf.push(TAG_PING),
        Message::Pong => buf.push(TAG_PONG),
        Message::GetTip => buf.push(TAG_GET_TIP),
        Message::RequestPost(hash) => {
            buf.push(TAG_REQUEST_POST);
            push_u256(&mut buf, *hash);
        }
        Message::SharePost(post) => {
            buf.push(TAG_SHARE_POST);
            buf.extend_from_slice(&post.body.to_bytes());
            push_u256(&mut buf, post.work);
            push_u256(&mut buf, post.prev);
        }
    }
    buf
}

fn push_u256(buf: &mut Vec<u8>, value: U256) {
    let mut word = [0u8; HASH_BYTES];
    value.to_big_endian(&mut word);
    buf.extend_from_slice(&word);
}

/// Decode a hex-encoded wire payload. Drops (returns `Err`) on malformed
/// hex, an unknown tag byte, or a payload shorter than the variant needs.
pub fn decode(hex_str: &str) -> Result<Message, DecodeError> {
    let bytes = hex::decode(hex_str).map_err(|_| DecodeError::BadHex)?;
    let (tag, rest) = bytes.split_first().ok_or(DecodeError::Truncated)?;
    match *tag {
        TAG_PING => Ok(Message::Ping),
        TAG_PONG => Ok(Message::Pong),
        TAG_GET_TIP => Ok(Message::GetTip),
        TAG_REQUEST_POST => {
            if rest.len() < HASH_BYTES {
                return Err(DecodeError::Truncated);
            }
            Ok(Message::RequestPost(Hash::from_big_endian(&rest[..HASH_BYTES])))
        }
        TAG_SHARE_POST => {
            if rest.len() < SHARE_POST_BODY_LEN {
                return Err(DecodeError::Truncated);
            }
            let body = Body::from_bytes(&rest[..BODY_BYTES]);
            let work = U256::from_big_endian(&rest[BODY_BYTES..BODY_BYTES + HASH_BYTES]);
            let prev = U256::from_big_endian(
                &rest[BODY_BYTES + HASH_BYTES..BODY_BYTES + HASH_BYTES + HASH_BYTES],
            );
            Ok(Message::SharePost(Post::new(body, work, prev)))
        }
        other => Err(DecodeError::UnknownTag(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post::new(Body::zero(), U256::from(42u8), Hash::from(7u8))
    }

    #[test]
    fn round_trips_every_variant() {
        let messages = vec![
            Message::Ping,
            Message::Pong,
            Message::GetTip,
            Message::RequestPost(Hash::from(1234u32)),
            Message::SharePost(sample_post()),
        ];
        for message in messages {
            let encoded = encode(&message);
            assert_eq!(encoded.len() % 2, 0, "encoded hex must be even length");
            let decoded = decode(&encoded).expect("decode should succeed");
            assert_eq!(decoded, message);
        }
    }

    #[test]
    fn rejects_bad_hex() {
        assert_eq!(decode("zz"), Err(DecodeError::BadHex));
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(decode("ff"), Err(DecodeError::UnknownTag(0xff)));
    }

    #[test]
    fn rejects_truncated_request_post() {
        // tag 3 (RequestPost) with only one byte of the expected 32-byte hash
        assert_eq!(decode("0300"), Err(DecodeError::Truncated));
    }

    #[test]
    fn rejects_empty_payload() {
        assert_eq!(decode(""), Err(DecodeError::Truncated));
    }
}
