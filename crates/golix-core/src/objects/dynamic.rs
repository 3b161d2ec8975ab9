//! Dynamic bindings (`GOBD`)
//!
//! A dynamic binding is a mutable pointer. `(binder, dynamic_address)`
//! names the slot, `counter` orders its versions, and each version points at
//! one `target` while listing the addresses of the versions it supersedes in
//! `history` (most recent first).
//!
//! ```text
//! binder | counter: u32 | history_len: u16 | history... | target
//!        | dynamic_address | address | signature
//! ```
//!
//! The first version of a chain has no history and no caller-supplied
//! dynamic address: the dynamic address is derived from the bytes before it,
//! exactly once. Later versions carry it forward unchanged, so on the way in
//! it is only re-derived when the history is empty.

use super::GolixObject;
use crate::address::Address;
use crate::codec::{ObjectKind, Packed, Reader, RecordBuilder, Slot};
use crate::crypto::{AddressAlgorithm, CipherSuite, Registry};
use crate::error::{GolixError, GolixResult};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicBinding {
    binder: Address,
    counter: u32,
    history: Vec<Address>,
    target: Address,
    dynamic_address: Address,
    packed: Packed,
}

/// Enforce that history and dynamic address are both present (a
/// continuation) or both absent (a fresh chain), and that the counter
/// agrees.
fn check_chain_shape(
    counter: u32,
    dynamic_address: Option<&Address>,
    history: &[Address],
) -> GolixResult<()> {
    match (dynamic_address.is_some(), history.is_empty()) {
        (true, true) => Err(GolixError::Validation(
            "Dynamic address supplied without history".to_string(),
        )),
        (false, false) => Err(GolixError::Validation(
            "History supplied without a dynamic address".to_string(),
        )),
        (false, true) if counter != 0 => Err(GolixError::Validation(format!(
            "A fresh dynamic binding must start at counter 0, got {}",
            counter
        ))),
        (true, false) if counter == 0 => Err(GolixError::Validation(
            "A continued dynamic binding needs a counter above 0".to_string(),
        )),
        _ if history.len() > u16::MAX as usize => Err(GolixError::Validation(format!(
            "History of {} addresses exceeds the wire limit",
            history.len()
        ))),
        _ => Ok(()),
    }
}

impl DynamicBinding {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn pack<F>(
        suite: &dyn CipherSuite,
        algo: &dyn AddressAlgorithm,
        binder: Address,
        counter: u32,
        target: Address,
        dynamic_address: Option<Address>,
        history: Vec<Address>,
        signer: F,
    ) -> GolixResult<Self>
    where
        F: FnOnce(&[u8]) -> GolixResult<Vec<u8>>,
    {
        check_chain_shape(counter, dynamic_address.as_ref(), &history)?;

        let mut builder = RecordBuilder::new(Self::KIND, suite.id());
        builder.put_address(&binder);
        builder.put_u32(counter);
        builder.put_u16(history.len() as u16);
        for address in &history {
            builder.put_address(address);
        }
        builder.put_address(&target);
        match &dynamic_address {
            Some(address) => builder.put_address(address),
            None => builder.reserve_address(Slot::DynamicAddress, algo),
        }
        builder.reserve_address(Slot::Address, algo);
        builder.reserve_trailer(suite.lengths().signature);

        let mut draft = builder.into_draft();
        let dynamic_address = match dynamic_address {
            Some(address) => address,
            None => {
                let derived = draft.patch_address(Slot::DynamicAddress, algo)?;
                debug!(dynamic_address = %derived, "Started dynamic binding chain");
                derived
            }
        };
        draft.patch_address(Slot::Address, algo)?;
        let packed = draft.seal(signer)?;

        Ok(Self {
            binder,
            counter,
            history,
            target,
            dynamic_address,
            packed,
        })
    }

    /// Parse and verify the binding's address, and its dynamic address when
    /// this is the first version of a chain. A counter of 0 must come with
    /// an empty history and any other counter with a non-empty one.
    pub fn unpack(bytes: &[u8], registry: &Registry) -> GolixResult<Self> {
        let mut reader = Reader::new(bytes);
        let header = reader.header(Self::KIND, registry)?;
        let binder = reader.address("binder")?;
        let counter = reader.u32("counter")?;
        let history_len = reader.u16("history length")?;
        let history = (0..history_len)
            .map(|_| reader.address("history"))
            .collect::<GolixResult<Vec<_>>>()?;
        if (counter == 0) != history.is_empty() {
            return Err(GolixError::Format(format!(
                "Dynamic binding counter {} disagrees with {} history entries",
                counter,
                history.len()
            )));
        }
        let target = reader.address("target")?;
        let (dynamic_address, dynamic_prefix) = reader.address_field("dynamic address")?;
        if history.is_empty() {
            reader.verify_address(registry, &dynamic_address, dynamic_prefix, Self::KIND)?;
        }
        let packed = reader.finish_record(&header, registry)?;

        Ok(Self {
            binder,
            counter,
            history,
            target,
            dynamic_address,
            packed,
        })
    }

    pub fn binder(&self) -> &Address {
        &self.binder
    }

    /// Version number within the chain.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Current target.
    pub fn target(&self) -> &Address {
        &self.target
    }

    /// Addresses of superseded versions, most recent first.
    pub fn history(&self) -> &[Address] {
        &self.history
    }

    /// Persistent address of the chain.
    pub fn dynamic_address(&self) -> &Address {
        &self.dynamic_address
    }

    /// The current target followed by the history.
    pub fn target_vector(&self) -> Vec<Address> {
        std::iter::once(self.target.clone())
            .chain(self.history.iter().cloned())
            .collect()
    }

    /// Check that `next` directly supersedes `prev`: same binder and dynamic
    /// address, a higher counter, and a history that starts with `prev`.
    pub fn verify_succession(prev: &Self, next: &Self) -> GolixResult<()> {
        if prev.binder != next.binder {
            return Err(GolixError::Validation(
                "Successor has a different binder".to_string(),
            ));
        }
        if prev.dynamic_address != next.dynamic_address {
            return Err(GolixError::Validation(
                "Successor has a different dynamic address".to_string(),
            ));
        }
        if next.counter <= prev.counter {
            return Err(GolixError::Validation(format!(
                "Successor counter {} does not exceed {}",
                next.counter, prev.counter
            )));
        }
        if next.history.first() != Some(prev.address()) {
            return Err(GolixError::Validation(
                "Successor history does not start with its predecessor".to_string(),
            ));
        }
        Ok(())
    }
}

impl GolixObject for DynamicBinding {
    const KIND: ObjectKind = ObjectKind::DynamicBinding;

    fn packed(&self) -> &Packed {
        &self.packed
    }
}
