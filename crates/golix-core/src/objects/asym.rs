//! Asymmetric request payloads
//!
//! The plaintext sealed inside a [`Request`](super::Request):
//!
//! ```text
//! author | sub_magic[2] | payload_len: u16 | payload
//!
//! "HS"     handshake: target | secret_len: u8 | secret
//! "AK"     ack:       target | status: u32
//! "NK"     nak:       target | status: u32
//! "\0\0"   else:      opaque bytes
//! ```

use crate::address::Address;
use crate::codec::Reader;
use crate::error::{GolixError, GolixResult};
use crate::secret::Secret;
use zeroize::Zeroizing;

const HANDSHAKE: &[u8; 2] = b"HS";
const ACK: &[u8; 2] = b"AK";
const NAK: &[u8; 2] = b"NK";
const ELSE: &[u8; 2] = b"\0\0";

/// Content carried inside a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsymPayload {
    /// Shares the secret of the container at `target`.
    Handshake {
        author: Address,
        target: Address,
        secret: Secret,
    },
    /// Acknowledges the handshake at `target`.
    Ack {
        author: Address,
        target: Address,
        status: u32,
    },
    /// Rejects the handshake at `target`.
    Nak {
        author: Address,
        target: Address,
        status: u32,
    },
    /// Application-defined bytes.
    Else { author: Address, payload: Vec<u8> },
}

impl AsymPayload {
    /// Identity that built the payload.
    pub fn author(&self) -> &Address {
        match self {
            Self::Handshake { author, .. }
            | Self::Ack { author, .. }
            | Self::Nak { author, .. }
            | Self::Else { author, .. } => author,
        }
    }

    fn sub_magic(&self) -> &'static [u8; 2] {
        match self {
            Self::Handshake { .. } => HANDSHAKE,
            Self::Ack { .. } => ACK,
            Self::Nak { .. } => NAK,
            Self::Else { .. } => ELSE,
        }
    }

    /// Serialize; the buffer may hold a secret and is wiped when dropped.
    pub fn to_bytes(&self) -> GolixResult<Zeroizing<Vec<u8>>> {
        let mut body = Zeroizing::new(Vec::new());
        match self {
            Self::Handshake { target, secret, .. } => {
                let secret_bytes = secret.to_bytes();
                let secret_len = u8::try_from(secret_bytes.len()).map_err(|_| {
                    GolixError::Validation(format!(
                        "Secret of {} bytes does not fit a handshake",
                        secret_bytes.len()
                    ))
                })?;
                body.extend_from_slice(&target.to_bytes());
                body.push(secret_len);
                body.extend_from_slice(&secret_bytes);
            }
            Self::Ack { target, status, .. } | Self::Nak { target, status, .. } => {
                body.extend_from_slice(&target.to_bytes());
                body.extend_from_slice(&status.to_be_bytes());
            }
            Self::Else { payload, .. } => body.extend_from_slice(payload),
        }
        let body_len = u16::try_from(body.len()).map_err(|_| {
            GolixError::Validation(format!(
                "Asymmetric payload body of {} bytes exceeds the wire limit",
                body.len()
            ))
        })?;

        let author = self.author().to_bytes();
        let mut out = Zeroizing::new(Vec::with_capacity(author.len() + 4 + body.len()));
        out.extend_from_slice(&author);
        out.extend_from_slice(self.sub_magic());
        out.extend_from_slice(&body_len.to_be_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Parse a payload occupying the whole of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> GolixResult<Self> {
        let mut reader = Reader::new(bytes);
        let author = reader.address("author")?;
        let magic = reader.take(2, "payload magic")?;
        let body_len = reader.u16("payload length")?;
        let body = reader.take(body_len as usize, "payload")?;
        reader.finish()?;

        let mut body = Reader::new(body);
        let payload = match magic {
            m if m == HANDSHAKE => {
                let target = body.address("target")?;
                let secret_len = body.u8("secret length")?;
                let secret = Secret::from_bytes(body.take(secret_len as usize, "secret")?)?;
                Self::Handshake {
                    author,
                    target,
                    secret,
                }
            }
            m if m == ACK => Self::Ack {
                author,
                target: body.address("target")?,
                status: body.u32("status")?,
            },
            m if m == NAK => Self::Nak {
                author,
                target: body.address("target")?,
                status: body.u32("status")?,
            },
            m if m == ELSE => Self::Else {
                author,
                payload: body.take(body.remaining(), "payload")?.to_vec(),
            },
            other => {
                return Err(GolixError::Format(format!(
                    "Unknown asymmetric payload magic {}",
                    hex::encode(other)
                )))
            }
        };
        body.finish()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ClassicSuite;

    fn author() -> Address {
        Address::pseudorandom(1).unwrap()
    }

    #[test]
    fn test_handshake_roundtrip() {
        let payload = AsymPayload::Handshake {
            author: author(),
            target: Address::pseudorandom(1).unwrap(),
            secret: Secret::generate(&ClassicSuite),
        };
        let bytes = payload.to_bytes().unwrap();
        assert_eq!(&bytes[65..67], b"HS");
        assert_eq!(AsymPayload::from_bytes(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_ack_and_nak_are_distinct() {
        let target = Address::pseudorandom(1).unwrap();
        let ack = AsymPayload::Ack {
            author: author(),
            target: target.clone(),
            status: 7,
        };
        let nak = AsymPayload::Nak {
            author: ack.author().clone(),
            target,
            status: 7,
        };
        let ack_bytes = ack.to_bytes().unwrap();
        let nak_bytes = nak.to_bytes().unwrap();
        assert_ne!(*ack_bytes, *nak_bytes);
        assert_eq!(AsymPayload::from_bytes(&ack_bytes).unwrap(), ack);
        assert_eq!(AsymPayload::from_bytes(&nak_bytes).unwrap(), nak);
    }

    #[test]
    fn test_else_roundtrip_empty_and_full() {
        for payload in [Vec::new(), vec![0x55; 300]] {
            let message = AsymPayload::Else {
                author: author(),
                payload,
            };
            let bytes = message.to_bytes().unwrap();
            assert_eq!(AsymPayload::from_bytes(&bytes).unwrap(), message);
        }
    }

    #[test]
    fn test_unknown_magic_rejected() {
        let mut bytes = AsymPayload::Else {
            author: author(),
            payload: vec![1, 2, 3],
        }
        .to_bytes()
        .unwrap()
        .to_vec();
        bytes[65] = b'Z';
        assert!(AsymPayload::from_bytes(&bytes).unwrap_err().is_format());
    }

    #[test]
    fn test_body_length_mismatch_rejected() {
        let mut bytes = AsymPayload::Ack {
            author: author(),
            target: author(),
            status: 0,
        }
        .to_bytes()
        .unwrap()
        .to_vec();
        // Claim one byte less than the body holds
        let len = u16::from_be_bytes([bytes[67], bytes[68]]) - 1;
        bytes[67..69].copy_from_slice(&len.to_be_bytes());
        bytes.pop();
        assert!(AsymPayload::from_bytes(&bytes).unwrap_err().is_format());
    }
}
