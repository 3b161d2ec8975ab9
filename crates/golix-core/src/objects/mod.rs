//! Golix record kinds
//!
//! Each record type is immutable: it is produced either by a
//! [`FirstParty`](crate::FirstParty) operation (packed and signed in one
//! step) or by `unpack`, which parses the bytes and verifies the embedded
//! address. Signatures and MACs are checked separately, by
//! [`FirstParty`](crate::FirstParty) `receive_*` calls or
//! [`ThirdParty::verify_object`](crate::ThirdParty::verify_object), once the
//! claimed author is known.

mod asym;
mod binding;
mod container;
mod dynamic;
mod identity;
mod request;

pub use asym::AsymPayload;
pub use binding::{Debinding, StaticBinding};
pub use container::Container;
pub use dynamic::DynamicBinding;
pub use identity::IdentityContainer;
pub use request::Request;

use crate::address::Address;
use crate::codec::{ObjectKind, Packed};
use crate::crypto::Registry;
use crate::error::GolixResult;

/// Accessors shared by every record kind.
pub trait GolixObject {
    /// Record kind, fixed per type.
    const KIND: ObjectKind;

    /// Sealed bytes and framing fields.
    fn packed(&self) -> &Packed;

    /// Self-referential content address.
    fn address(&self) -> &Address {
        self.packed().address()
    }

    /// Cipher suite tag from the header.
    fn cipher(&self) -> u8 {
        self.packed().cipher()
    }

    /// Wire version from the header.
    fn version(&self) -> u32 {
        self.packed().version()
    }

    /// Signature or MAC trailer.
    fn signature(&self) -> &[u8] {
        self.packed().trailer()
    }

    /// Full wire form.
    fn as_bytes(&self) -> &[u8] {
        self.packed().as_bytes()
    }
}

/// Any record, as returned by [`WireObject::unpack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireObject {
    Identity(IdentityContainer),
    Container(Container),
    StaticBinding(StaticBinding),
    DynamicBinding(DynamicBinding),
    Debinding(Debinding),
    Request(Request),
}

impl WireObject {
    /// Parse a record of any kind, dispatching on its magic, and verify its
    /// address.
    pub fn unpack(bytes: &[u8], registry: &Registry) -> GolixResult<Self> {
        Ok(match ObjectKind::sniff(bytes)? {
            ObjectKind::IdentityContainer => {
                Self::Identity(IdentityContainer::unpack(bytes, registry)?)
            }
            ObjectKind::Container => Self::Container(Container::unpack(bytes, registry)?),
            ObjectKind::StaticBinding => {
                Self::StaticBinding(StaticBinding::unpack(bytes, registry)?)
            }
            ObjectKind::DynamicBinding => {
                Self::DynamicBinding(DynamicBinding::unpack(bytes, registry)?)
            }
            ObjectKind::Debinding => Self::Debinding(Debinding::unpack(bytes, registry)?),
            ObjectKind::Request => Self::Request(Request::unpack(bytes, registry)?),
        })
    }

    /// Sealed bytes and framing fields of the wrapped record.
    pub fn packed(&self) -> &Packed {
        match self {
            Self::Identity(object) => object.packed(),
            Self::Container(object) => object.packed(),
            Self::StaticBinding(object) => object.packed(),
            Self::DynamicBinding(object) => object.packed(),
            Self::Debinding(object) => object.packed(),
            Self::Request(object) => object.packed(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.packed().kind()
    }

    pub fn address(&self) -> &Address {
        self.packed().address()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.packed().as_bytes()
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for WireObject {
                fn from(object: $ty) -> Self {
                    Self::$variant(object)
                }
            }
        )*
    };
}

impl_from_variant!(
    Identity(IdentityContainer),
    Container(Container),
    StaticBinding(StaticBinding),
    DynamicBinding(DynamicBinding),
    Debinding(Debinding),
    Request(Request),
);
