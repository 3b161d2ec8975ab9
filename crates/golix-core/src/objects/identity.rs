//! Identity container (`GIDC`)
//!
//! Publishes an identity's three public keys. Unsigned: the address is the
//! digest of the keys, so the container certifies itself and its address is
//! the identity's address.

use super::GolixObject;
use crate::codec::{ObjectKind, Packed, Reader, RecordBuilder, Slot};
use crate::crypto::{AddressAlgorithm, CipherSuite, PublicKeys, Registry};
use crate::error::GolixResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContainer {
    keys: PublicKeys,
    packed: Packed,
}

impl IdentityContainer {
    pub(crate) fn pack(
        suite: &dyn CipherSuite,
        algo: &dyn AddressAlgorithm,
        keys: PublicKeys,
    ) -> GolixResult<Self> {
        keys.validate(&suite.lengths())?;

        let mut builder = RecordBuilder::new(ObjectKind::IdentityContainer, suite.id());
        builder.put_bytes(&keys.signature);
        builder.put_bytes(&keys.encryption);
        builder.put_bytes(&keys.exchange);
        builder.reserve_address(Slot::Address, algo);
        builder.reserve_trailer(0);

        let mut draft = builder.into_draft();
        draft.patch_address(Slot::Address, algo)?;
        let packed = draft.seal(|_| Ok(Vec::new()))?;
        Ok(Self { keys, packed })
    }

    /// Parse and verify the container's address.
    pub fn unpack(bytes: &[u8], registry: &Registry) -> GolixResult<Self> {
        let mut reader = Reader::new(bytes);
        let header = reader.header(Self::KIND, registry)?;
        let lengths = header.lengths;
        let keys = PublicKeys {
            signature: reader
                .take(lengths.signature_public_key, "signature key")?
                .to_vec(),
            encryption: reader
                .take(lengths.encryption_public_key, "encryption key")?
                .to_vec(),
            exchange: reader
                .take(lengths.exchange_public_key, "exchange key")?
                .to_vec(),
        };
        let packed = reader.finish_record(&header, registry)?;
        Ok(Self { keys, packed })
    }

    /// Published public keys.
    pub fn keys(&self) -> &PublicKeys {
        &self.keys
    }
}

impl GolixObject for IdentityContainer {
    const KIND: ObjectKind = ObjectKind::IdentityContainer;

    fn packed(&self) -> &Packed {
        &self.packed
    }
}
