//! Placeholder-then-patch record construction

use super::{Layout, ObjectKind, Packed, HEADER_LEN};
use crate::address::Address;
use crate::crypto::AddressAlgorithm;
use crate::error::{GolixError, GolixResult};
use std::ops::Range;
use tracing::debug;

/// Self-referential regions of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Persistent address of a dynamic binding chain.
    DynamicAddress,
    /// Per-record content address.
    Address,
    /// Signature or MAC.
    Trailer,
}

#[derive(Debug)]
struct Reservation {
    slot: Slot,
    range: Range<usize>,
}

/// Serializes a record with zero-filled placeholders for its
/// self-referential fields, so the final length is fixed before any hashing.
pub struct RecordBuilder {
    layout: &'static Layout,
    cipher: u8,
    buf: Vec<u8>,
    reservations: Vec<Reservation>,
}

impl RecordBuilder {
    /// Start a record of `kind` at its current version, writing the header.
    pub fn new(kind: ObjectKind, cipher: u8) -> Self {
        let layout = kind.layout();
        let mut buf = Vec::with_capacity(HEADER_LEN + 256);
        buf.extend_from_slice(layout.magic);
        buf.extend_from_slice(&layout.version.to_be_bytes());
        buf.push(cipher);
        Self {
            layout,
            cipher,
            buf,
            reservations: Vec::new(),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_address(&mut self, address: &Address) {
        self.buf.push(address.algo());
        self.buf.extend_from_slice(address.digest());
    }

    /// Write the algo tag and a zero-filled digest of the algorithm's length.
    pub fn reserve_address(&mut self, slot: Slot, algo: &dyn AddressAlgorithm) {
        self.buf.push(algo.id());
        self.reserve(slot, algo.digest_len());
    }

    /// Zero-filled signature or MAC of `len` bytes; must be the last field.
    pub fn reserve_trailer(&mut self, len: usize) {
        self.reserve(Slot::Trailer, len);
    }

    fn reserve(&mut self, slot: Slot, len: usize) {
        let start = self.buf.len();
        self.buf.resize(start + len, 0);
        self.reservations.push(Reservation {
            slot,
            range: start..start + len,
        });
    }

    /// Freeze the layout; no more fields can be written.
    pub fn into_draft(self) -> Draft {
        Draft {
            layout: self.layout,
            cipher: self.cipher,
            buf: self.buf,
            reservations: self.reservations,
            address: None,
        }
    }
}

/// Fully sized record whose reserved regions are being patched.
///
/// [`Draft::seal`] consumes the draft, so a sealed record cannot be patched
/// or sealed again.
pub struct Draft {
    layout: &'static Layout,
    cipher: u8,
    buf: Vec<u8>,
    reservations: Vec<Reservation>,
    address: Option<Address>,
}

impl Draft {
    fn range(&self, slot: Slot) -> GolixResult<Range<usize>> {
        self.reservations
            .iter()
            .find(|reservation| reservation.slot == slot)
            .map(|reservation| reservation.range.clone())
            .ok_or_else(|| {
                GolixError::Validation(format!(
                    "{} record has no {:?} reservation",
                    self.layout.kind, slot
                ))
            })
    }

    /// Hash every byte before the slot's digest and patch the digest in.
    ///
    /// The hashed prefix includes the slot's own algo tag byte.
    pub fn patch_address(
        &mut self,
        slot: Slot,
        algo: &dyn AddressAlgorithm,
    ) -> GolixResult<Address> {
        if slot == Slot::Trailer {
            return Err(GolixError::Validation(
                "Trailer is not an address slot".to_string(),
            ));
        }
        let range = self.range(slot)?;
        let digest = algo.create(&self.buf[..range.start]);
        if digest.len() != range.len() {
            return Err(GolixError::Validation(format!(
                "Address algorithm {} produced {} bytes for a {}-byte slot",
                algo.id(),
                digest.len(),
                range.len()
            )));
        }
        self.buf[range].copy_from_slice(&digest);
        let address = Address::new(algo.id(), digest)?;
        if slot == Slot::Address {
            self.address = Some(address.clone());
        }
        Ok(address)
    }

    /// Sign (or MAC) every byte before the trailer, patch it in and hand
    /// back the immutable record.
    pub fn seal<F>(mut self, signer: F) -> GolixResult<Packed>
    where
        F: FnOnce(&[u8]) -> GolixResult<Vec<u8>>,
    {
        let address = self.address.take().ok_or_else(|| {
            GolixError::Validation(format!(
                "{} record sealed before its address was computed",
                self.layout.kind
            ))
        })?;
        let range = self.range(Slot::Trailer)?;
        let trailer = signer(&self.buf[..range.start])?;
        if trailer.len() != range.len() {
            return Err(GolixError::Validation(format!(
                "Trailer is {} bytes, {} record reserved {}",
                trailer.len(),
                self.layout.kind,
                range.len()
            )));
        }
        let trailer_len = range.len();
        self.buf[range].copy_from_slice(&trailer);

        debug!(
            kind = %self.layout.kind,
            cipher = self.cipher,
            algo = address.algo(),
            len = self.buf.len(),
            %address,
            "Packed record"
        );

        Ok(Packed {
            kind: self.layout.kind,
            version: self.layout.version,
            cipher: self.cipher,
            address,
            trailer_len,
            bytes: self.buf,
        })
    }
}
