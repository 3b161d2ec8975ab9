//! Asymmetric request (`GARQ`)
//!
//! `recipient | payload[asymmetric] | address | mac`
//!
//! The payload is an [`AsymPayload`](super::AsymPayload) sealed to the
//! recipient's encryption key; its length is fixed by the suite. The trailer
//! is a MAC, not a signature, so only the recipient can check it.

use super::GolixObject;
use crate::address::Address;
use crate::codec::{ObjectKind, Packed, Reader, RecordBuilder, Slot};
use crate::crypto::{AddressAlgorithm, CipherSuite, Registry};
use crate::error::{GolixError, GolixResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    recipient: Address,
    payload: Vec<u8>,
    packed: Packed,
}

impl Request {
    pub(crate) fn pack<F>(
        suite: &dyn CipherSuite,
        algo: &dyn AddressAlgorithm,
        recipient: Address,
        payload: Vec<u8>,
        mac: F,
    ) -> GolixResult<Self>
    where
        F: FnOnce(&[u8]) -> GolixResult<Vec<u8>>,
    {
        let lengths = suite.lengths();
        if payload.len() != lengths.asymmetric {
            return Err(GolixError::Validation(format!(
                "Request payload must be {} bytes, got {}",
                lengths.asymmetric,
                payload.len()
            )));
        }

        let mut builder = RecordBuilder::new(Self::KIND, suite.id());
        builder.put_address(&recipient);
        builder.put_bytes(&payload);
        builder.reserve_address(Slot::Address, algo);
        builder.reserve_trailer(lengths.mac);

        let mut draft = builder.into_draft();
        draft.patch_address(Slot::Address, algo)?;
        let packed = draft.seal(mac)?;
        Ok(Self {
            recipient,
            payload,
            packed,
        })
    }

    /// Parse and verify the request's address. The MAC is not checked.
    pub fn unpack(bytes: &[u8], registry: &Registry) -> GolixResult<Self> {
        let mut reader = Reader::new(bytes);
        let header = reader.header(Self::KIND, registry)?;
        let recipient = reader.address("recipient")?;
        let payload = reader
            .take(header.lengths.asymmetric, "asymmetric payload")?
            .to_vec();
        let packed = reader.finish_record(&header, registry)?;
        Ok(Self {
            recipient,
            payload,
            packed,
        })
    }

    /// Intended recipient.
    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    /// Sealed payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl GolixObject for Request {
    const KIND: ObjectKind = ObjectKind::Request;

    fn packed(&self) -> &Packed {
        &self.packed
    }
}
