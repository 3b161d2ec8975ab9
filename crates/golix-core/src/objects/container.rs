//! Encrypted container (`GEOC`)
//!
//! `author | payload_len: u64 | payload | address | signature`

use super::GolixObject;
use crate::address::Address;
use crate::codec::{ObjectKind, Packed, Reader, RecordBuilder, Slot};
use crate::crypto::{AddressAlgorithm, CipherSuite, Registry};
use crate::error::{GolixError, GolixResult};

/// Opaque symmetric ciphertext attributed to an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    author: Address,
    payload: Vec<u8>,
    packed: Packed,
}

impl Container {
    pub(crate) fn pack<F>(
        suite: &dyn CipherSuite,
        algo: &dyn AddressAlgorithm,
        author: Address,
        payload: Vec<u8>,
        signer: F,
    ) -> GolixResult<Self>
    where
        F: FnOnce(&[u8]) -> GolixResult<Vec<u8>>,
    {
        let mut builder = RecordBuilder::new(Self::KIND, suite.id());
        builder.put_address(&author);
        builder.put_u64(payload.len() as u64);
        builder.put_bytes(&payload);
        builder.reserve_address(Slot::Address, algo);
        builder.reserve_trailer(suite.lengths().signature);

        let mut draft = builder.into_draft();
        draft.patch_address(Slot::Address, algo)?;
        let packed = draft.seal(signer)?;
        Ok(Self {
            author,
            payload,
            packed,
        })
    }

    /// Parse and verify the container's address. The signature is not
    /// checked.
    pub fn unpack(bytes: &[u8], registry: &Registry) -> GolixResult<Self> {
        let mut reader = Reader::new(bytes);
        let header = reader.header(Self::KIND, registry)?;
        let author = reader.address("author")?;
        let payload_len = reader.u64("payload length")?;
        let payload_len = usize::try_from(payload_len).map_err(|_| {
            GolixError::Format(format!("Payload length {} exceeds address space", payload_len))
        })?;
        let payload = reader.take(payload_len, "payload")?.to_vec();
        let packed = reader.finish_record(&header, registry)?;
        Ok(Self {
            author,
            payload,
            packed,
        })
    }

    /// Declared author.
    pub fn author(&self) -> &Address {
        &self.author
    }

    /// Encrypted payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl GolixObject for Container {
    const KIND: ObjectKind = ObjectKind::Container;

    fn packed(&self) -> &Packed {
        &self.packed
    }
}
