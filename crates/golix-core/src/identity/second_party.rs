//! Public identities
//!
//! A [`SecondParty`] is the distributable half of an identity: its identity
//! container, and with it the three public keys and the identity's address.
//! A [`ThirdParty`] is a public identity acting as an observer (a relay or
//! server) that checks signatures on records it cannot read.

use crate::address::Address;
use crate::codec::Packed;
use crate::crypto::{PublicKeys, Registry};
use crate::error::{GolixError, GolixResult};
use crate::objects::{GolixObject, IdentityContainer, WireObject};
use tracing::{trace, warn};

/// Public identity of another agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondParty {
    identity: IdentityContainer,
}

impl SecondParty {
    pub(crate) fn new(identity: IdentityContainer) -> Self {
        Self { identity }
    }

    /// Rebuild a public identity from its packed identity container,
    /// verifying the container's address.
    pub fn from_packed(bytes: &[u8], registry: &Registry) -> GolixResult<Self> {
        IdentityContainer::unpack(bytes, registry).map(Self::new)
    }

    /// The identity's address (its identity container's address).
    pub fn address(&self) -> &Address {
        self.identity.address()
    }

    /// Cipher suite the identity's keys belong to.
    pub fn cipher(&self) -> u8 {
        self.identity.cipher()
    }

    pub fn keys(&self) -> &PublicKeys {
        self.identity.keys()
    }

    /// The identity container, for distribution.
    pub fn identity(&self) -> &IdentityContainer {
        &self.identity
    }

    /// Packed identity container.
    pub fn as_bytes(&self) -> &[u8] {
        self.identity.as_bytes()
    }

    /// Check that `claimed` names this identity and that the record's
    /// signature verifies under its public signature key.
    pub(crate) fn verify_signed(
        &self,
        registry: &Registry,
        claimed: &Address,
        packed: &Packed,
    ) -> GolixResult<()> {
        if claimed != self.address() {
            warn!(
                kind = %packed.kind(),
                claimed = %claimed,
                expected = %self.address(),
                "Record author does not match verifying identity"
            );
            return Err(GolixError::Security(format!(
                "{} was not authored by {}",
                packed.kind(),
                self.address()
            )));
        }
        if packed.cipher() != self.cipher() {
            return Err(GolixError::Security(format!(
                "{} uses cipher {}, author's keys are cipher {}",
                packed.kind(),
                packed.cipher(),
                self.cipher()
            )));
        }
        let suite = registry.cipher_suite(packed.cipher())?;
        suite
            .verify(self.keys(), packed.trailer(), packed.signed_data())
            .inspect_err(|_| {
                warn!(
                    kind = %packed.kind(),
                    address = %packed.address(),
                    author = %self.address(),
                    "Signature rejected"
                );
            })?;
        trace!(kind = %packed.kind(), address = %packed.address(), "Signature verified");
        Ok(())
    }
}

/// Public identity that validates records on behalf of others.
///
/// Holds no private key, so it can reject tampered records without being
/// able to read encrypted payloads.
#[derive(Debug, Clone)]
pub struct ThirdParty {
    identity: SecondParty,
    registry: Registry,
}

impl ThirdParty {
    pub fn new(identity: SecondParty, registry: Registry) -> Self {
        Self { identity, registry }
    }

    /// This observer's own public identity.
    pub fn identity(&self) -> &SecondParty {
        &self.identity
    }

    pub fn address(&self) -> &Address {
        self.identity.address()
    }

    /// Verify that `object` was produced by `author`.
    ///
    /// Identity containers are checked by address. Requests cannot be
    /// checked by an observer: their MAC is only verifiable by the recipient.
    ///
    /// # Errors
    ///
    /// [`GolixError::Security`] when the record was not produced by `author`
    /// or its signature does not verify; [`GolixError::Validation`] for
    /// requests.
    pub fn verify_object(&self, author: &SecondParty, object: &WireObject) -> GolixResult<()> {
        match object {
            WireObject::Identity(identity) => {
                if identity.address() != author.address() {
                    return Err(GolixError::Security(format!(
                        "Identity container {} is not {}",
                        identity.address(),
                        author.address()
                    )));
                }
                Ok(())
            }
            WireObject::Container(container) => {
                author.verify_signed(&self.registry, container.author(), container.packed())
            }
            WireObject::StaticBinding(binding) => {
                author.verify_signed(&self.registry, binding.binder(), binding.packed())
            }
            WireObject::DynamicBinding(binding) => {
                author.verify_signed(&self.registry, binding.binder(), binding.packed())
            }
            WireObject::Debinding(debinding) => {
                author.verify_signed(&self.registry, debinding.debinder(), debinding.packed())
            }
            WireObject::Request(_) => Err(GolixError::Validation(
                "Request MACs can only be verified by their recipient".to_string(),
            )),
        }
    }
}
