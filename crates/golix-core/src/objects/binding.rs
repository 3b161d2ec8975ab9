//! Static bindings (`GOBS`) and debindings (`GDXX`)
//!
//! Both are `party | target | address | signature`: a binding asserts that
//! the binder vouches for the target, a debinding revokes a binding (or
//! identity) by its address.

use super::GolixObject;
use crate::address::Address;
use crate::codec::{ObjectKind, Packed, Reader, RecordBuilder, Slot};
use crate::crypto::{AddressAlgorithm, CipherSuite, Registry};
use crate::error::GolixResult;

fn pack_pair<F>(
    kind: ObjectKind,
    suite: &dyn CipherSuite,
    algo: &dyn AddressAlgorithm,
    party: &Address,
    target: &Address,
    signer: F,
) -> GolixResult<Packed>
where
    F: FnOnce(&[u8]) -> GolixResult<Vec<u8>>,
{
    let mut builder = RecordBuilder::new(kind, suite.id());
    builder.put_address(party);
    builder.put_address(target);
    builder.reserve_address(Slot::Address, algo);
    builder.reserve_trailer(suite.lengths().signature);

    let mut draft = builder.into_draft();
    draft.patch_address(Slot::Address, algo)?;
    draft.seal(signer)
}

fn unpack_pair(
    kind: ObjectKind,
    bytes: &[u8],
    registry: &Registry,
) -> GolixResult<(Address, Address, Packed)> {
    let mut reader = Reader::new(bytes);
    let header = reader.header(kind, registry)?;
    let party = reader.address("binder")?;
    let target = reader.address("target")?;
    let packed = reader.finish_record(&header, registry)?;
    Ok((party, target, packed))
}

/// Immutable assertion that `binder` vouches for `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticBinding {
    binder: Address,
    target: Address,
    packed: Packed,
}

impl StaticBinding {
    pub(crate) fn pack<F>(
        suite: &dyn CipherSuite,
        algo: &dyn AddressAlgorithm,
        binder: Address,
        target: Address,
        signer: F,
    ) -> GolixResult<Self>
    where
        F: FnOnce(&[u8]) -> GolixResult<Vec<u8>>,
    {
        let packed = pack_pair(Self::KIND, suite, algo, &binder, &target, signer)?;
        Ok(Self {
            binder,
            target,
            packed,
        })
    }

    /// Parse and verify the binding's address.
    pub fn unpack(bytes: &[u8], registry: &Registry) -> GolixResult<Self> {
        let (binder, target, packed) = unpack_pair(Self::KIND, bytes, registry)?;
        Ok(Self {
            binder,
            target,
            packed,
        })
    }

    pub fn binder(&self) -> &Address {
        &self.binder
    }

    pub fn target(&self) -> &Address {
        &self.target
    }
}

impl GolixObject for StaticBinding {
    const KIND: ObjectKind = ObjectKind::StaticBinding;

    fn packed(&self) -> &Packed {
        &self.packed
    }
}

/// Revocation of the record at `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debinding {
    debinder: Address,
    target: Address,
    packed: Packed,
}

impl Debinding {
    pub(crate) fn pack<F>(
        suite: &dyn CipherSuite,
        algo: &dyn AddressAlgorithm,
        debinder: Address,
        target: Address,
        signer: F,
    ) -> GolixResult<Self>
    where
        F: FnOnce(&[u8]) -> GolixResult<Vec<u8>>,
    {
        let packed = pack_pair(Self::KIND, suite, algo, &debinder, &target, signer)?;
        Ok(Self {
            debinder,
            target,
            packed,
        })
    }

    /// Parse and verify the debinding's address.
    pub fn unpack(bytes: &[u8], registry: &Registry) -> GolixResult<Self> {
        let (debinder, target, packed) = unpack_pair(Self::KIND, bytes, registry)?;
        Ok(Self {
            debinder,
            target,
            packed,
        })
    }

    pub fn debinder(&self) -> &Address {
        &self.debinder
    }

    pub fn target(&self) -> &Address {
        &self.target
    }
}

impl GolixObject for Debinding {
    const KIND: ObjectKind = ObjectKind::Debinding;

    fn packed(&self) -> &Packed {
        &self.packed
    }
}
