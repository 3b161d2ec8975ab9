//! Wire codec
//!
//! Every record is `magic(4) | version(u32 BE) | cipher(u8) | body |
//! address field(s) | signature or MAC`. The body layout is selected by
//! `(magic, version)` through [`layout_for`]; trailer lengths come from the
//! cipher suite's [`ComponentLengths`].
//!
//! Records embed a hash of their own bytes, so they are built in two passes:
//! [`RecordBuilder`] writes every field with zero-filled placeholders of the
//! final size, then [`Draft`] hashes the prefix of each address field,
//! patches the digest in place and finally signs everything before the
//! trailer. [`Reader`] parses positionally and remembers where each address
//! digest starts so the same prefix can be re-hashed on the way in.
//!
//! | Magic | Version | Kind | Trailer |
//! |-------|---------|------|---------|
//! | `GIDC` | 2 | identity container | none |
//! | `GEOC` | 14 | container | signature |
//! | `GOBS` | 6 | static binding | signature |
//! | `GOBD` | 15 | dynamic binding | signature |
//! | `GDXX` | 9 | debinding | signature |
//! | `GARQ` | 12 | request | MAC |

mod builder;
mod reader;

pub use builder::{Draft, RecordBuilder, Slot};
pub use reader::Reader;

use crate::address::Address;
use crate::crypto::ComponentLengths;
use crate::error::{GolixError, GolixResult};

/// Length of `magic | version | cipher`.
pub const HEADER_LEN: usize = 4 + 4 + 1;

/// Record kinds, one per magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    IdentityContainer,
    Container,
    StaticBinding,
    DynamicBinding,
    Debinding,
    Request,
}

impl ObjectKind {
    /// Layout of the version this crate writes.
    pub fn layout(self) -> &'static Layout {
        &LAYOUTS[self as usize]
    }

    /// Four-byte magic.
    pub fn magic(self) -> &'static [u8; 4] {
        self.layout().magic
    }

    /// Short name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::IdentityContainer => "identity",
            Self::Container => "container",
            Self::StaticBinding => "static binding",
            Self::DynamicBinding => "dynamic binding",
            Self::Debinding => "debinding",
            Self::Request => "request",
        }
    }

    /// Kind announced by the first four bytes of a record.
    pub fn sniff(bytes: &[u8]) -> GolixResult<Self> {
        let magic = bytes
            .get(..4)
            .ok_or_else(|| GolixError::Format("Record shorter than its magic".to_string()))?;
        LAYOUTS
            .iter()
            .find(|layout| &layout.magic[..] == magic)
            .map(|layout| layout.kind)
            .ok_or_else(|| {
                GolixError::Format(format!("Unknown record magic {}", hex::encode(magic)))
            })
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What follows the final address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailer {
    /// Zero-length; the record's digest is its only integrity check.
    None,
    /// Signature by the author's private signature key.
    Signature,
    /// MAC under the sender/recipient exchange key.
    Mac,
}

impl Trailer {
    /// Trailer length for a suite.
    pub fn len(self, lengths: &ComponentLengths) -> usize {
        match self {
            Self::None => 0,
            Self::Signature => lengths.signature,
            Self::Mac => lengths.mac,
        }
    }
}

/// Static description of one `(magic, version)` layout.
#[derive(Debug)]
pub struct Layout {
    pub kind: ObjectKind,
    pub magic: &'static [u8; 4],
    pub version: u32,
    pub trailer: Trailer,
}

// Indexed by `ObjectKind as usize`.
static LAYOUTS: [Layout; 6] = [
    Layout {
        kind: ObjectKind::IdentityContainer,
        magic: b"GIDC",
        version: 2,
        trailer: Trailer::None,
    },
    Layout {
        kind: ObjectKind::Container,
        magic: b"GEOC",
        version: 14,
        trailer: Trailer::Signature,
    },
    Layout {
        kind: ObjectKind::StaticBinding,
        magic: b"GOBS",
        version: 6,
        trailer: Trailer::Signature,
    },
    Layout {
        kind: ObjectKind::DynamicBinding,
        magic: b"GOBD",
        version: 15,
        trailer: Trailer::Signature,
    },
    Layout {
        kind: ObjectKind::Debinding,
        magic: b"GDXX",
        version: 9,
        trailer: Trailer::Signature,
    },
    Layout {
        kind: ObjectKind::Request,
        magic: b"GARQ",
        version: 12,
        trailer: Trailer::Mac,
    },
];

/// Look up the layout for a `(magic, version)` pair.
///
/// # Errors
///
/// [`GolixError::Format`] for an unknown magic or an unsupported version.
pub fn layout_for(magic: &[u8], version: u32) -> GolixResult<&'static Layout> {
    let kind = ObjectKind::sniff(magic)?;
    LAYOUTS
        .iter()
        .find(|layout| layout.kind == kind && layout.version == version)
        .ok_or_else(|| GolixError::Format(format!("Unsupported {} version {}", kind, version)))
}

/// Header fields common to every record, plus the component lengths of the
/// suite the cipher tag resolved to.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub layout: &'static Layout,
    pub cipher: u8,
    pub lengths: ComponentLengths,
}

/// The sealed bytes of a record plus the framing fields every kind shares.
///
/// Only produced by [`Draft::seal`] or by a successful parse, so the
/// embedded address always matches the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Packed {
    kind: ObjectKind,
    version: u32,
    cipher: u8,
    address: Address,
    trailer_len: usize,
    bytes: Vec<u8>,
}

impl Packed {
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn cipher(&self) -> u8 {
        self.cipher
    }

    /// Self-referential content address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Signature or MAC (empty for identity containers).
    pub fn trailer(&self) -> &[u8] {
        &self.bytes[self.signed_len()..]
    }

    /// Bytes covered by the signature or MAC.
    pub fn signed_data(&self) -> &[u8] {
        &self.bytes[..self.signed_len()]
    }

    fn signed_len(&self) -> usize {
        self.bytes.len() - self.trailer_len
    }

    /// Full wire form.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl std::fmt::Debug for Packed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packed")
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("cipher", &self.cipher)
            .field("address", &self.address)
            .field("len", &self.bytes.len())
            .finish()
    }
}
