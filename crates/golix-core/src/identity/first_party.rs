//! Private identities
//!
//! A [`FirstParty`] holds an agent's private keys alongside its packed
//! identity container. Every `make_*` operation builds, packs and signs a
//! record in one step; `unpack_*` parses bytes and verifies the embedded
//! address only; `receive_*` checks the signature (or MAC) against the
//! claimed author's public identity before handing anything back.

use super::second_party::{SecondParty, ThirdParty};
use crate::address::Address;
use crate::codec::Reader;
use crate::config::GolixConfig;
use crate::crypto::{AddressAlgorithm, CipherSuite, PrivateKeys, PublicKeys, Registry};
use crate::error::{GolixError, GolixResult};
use crate::objects::{
    AsymPayload, Container, Debinding, DynamicBinding, GolixObject, IdentityContainer, Request,
    StaticBinding,
};
use crate::secret::Secret;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Magic prefix of a serialized private identity.
const FIRST_PARTY_MAGIC: &[u8; 4] = b"GFPI";

/// Serialized private identity version.
const FIRST_PARTY_VERSION: u16 = 1;

/// Signed by newly assembled identities to check the private keys match
/// the public ones.
const KEY_CHECK_MESSAGE: &[u8] = b"golix key consistency check";

/// Private identity.
#[derive(Clone)]
pub struct FirstParty {
    registry: Registry,
    suite: &'static dyn CipherSuite,
    algo: &'static dyn AddressAlgorithm,
    private: PrivateKeys,
    public: SecondParty,
}

impl FirstParty {
    /// Generate an identity with the configured default cipher and address
    /// algorithm.
    pub fn generate(config: &GolixConfig) -> GolixResult<Self> {
        Self::generate_with(
            config.registry(),
            config.default_cipher,
            config.default_address_algo,
        )
    }

    /// Generate an identity with an explicit cipher and address algorithm.
    pub fn generate_with(registry: Registry, cipher: u8, algo: u8) -> GolixResult<Self> {
        let suite = registry.cipher_suite(cipher)?;
        let (private, public) = suite.generate_keys()?;
        let identity = Self::from_keys(registry, cipher, algo, private, public)?;
        debug!(
            cipher,
            algo,
            address = %identity.address(),
            "Generated identity"
        );
        Ok(identity)
    }

    /// Assemble an identity from key material supplied by a key manager.
    ///
    /// # Errors
    ///
    /// [`GolixError::Validation`] when the cipher or algorithm is not
    /// selectable, a key has the wrong length, or the private signature key
    /// does not match the public one.
    pub fn from_keys(
        registry: Registry,
        cipher: u8,
        algo: u8,
        private: PrivateKeys,
        public: PublicKeys,
    ) -> GolixResult<Self> {
        let suite = registry.cipher_suite(cipher)?;
        let algo = registry.address_algo(algo)?;
        private.validate(&suite.lengths())?;

        let check = suite.sign(&private, KEY_CHECK_MESSAGE)?;
        suite
            .verify(&public, &check, KEY_CHECK_MESSAGE)
            .map_err(|_| {
                GolixError::Validation("Private and public signature keys differ".to_string())
            })?;

        let identity = IdentityContainer::pack(suite, algo, public)?;
        Ok(Self {
            registry,
            suite,
            algo,
            private,
            public: SecondParty::new(identity),
        })
    }

    /// Serialize private keys and identity container. The buffer is wiped
    /// when dropped.
    ///
    /// ```text
    /// "GFPI" | version: u16 | algo: u8
    ///        | (len: u32 | key) x 3 (signature, decryption, exchange)
    ///        | identity container
    /// ```
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(Vec::new());
        out.extend_from_slice(FIRST_PARTY_MAGIC);
        out.extend_from_slice(&FIRST_PARTY_VERSION.to_be_bytes());
        out.push(self.algo.id());
        for key in [
            &self.private.signature,
            &self.private.decryption,
            &self.private.exchange,
        ] {
            out.extend_from_slice(&(key.len() as u32).to_be_bytes());
            out.extend_from_slice(key);
        }
        out.extend_from_slice(self.public.as_bytes());
        out
    }

    /// Inverse of [`FirstParty::to_bytes`].
    pub fn from_bytes(bytes: &[u8], registry: Registry) -> GolixResult<Self> {
        let mut reader = Reader::new(bytes);
        if reader.take(4, "magic")? != FIRST_PARTY_MAGIC {
            return Err(GolixError::Format("Invalid private identity magic".to_string()));
        }
        let version = reader.u16("version")?;
        if version != FIRST_PARTY_VERSION {
            return Err(GolixError::Format(format!(
                "Unsupported private identity version {}",
                version
            )));
        }
        let algo = reader.u8("address algorithm")?;
        let mut keys = Vec::with_capacity(3);
        for what in ["signature key", "decryption key", "exchange key"] {
            let len = reader.u32(what)? as usize;
            keys.push(reader.take(len, what)?.to_vec());
        }
        let identity =
            IdentityContainer::unpack(reader.take(reader.remaining(), "identity")?, &registry)?;

        let exchange = keys.pop().unwrap_or_default();
        let decryption = keys.pop().unwrap_or_default();
        let signature = keys.pop().unwrap_or_default();
        let private = PrivateKeys::new(signature, decryption, exchange);

        let restored = Self::from_keys(
            registry,
            identity.cipher(),
            algo,
            private,
            identity.keys().clone(),
        )?;
        if restored.address() != identity.address() {
            return Err(GolixError::Integrity(
                "Restored identity address does not match its container".to_string(),
            ));
        }
        Ok(restored)
    }

    /// The identity's address.
    pub fn address(&self) -> &Address {
        self.public.address()
    }

    /// Cipher suite tag.
    pub fn cipher(&self) -> u8 {
        self.suite.id()
    }

    /// Address algorithm tag used for every record this identity creates.
    pub fn address_algo(&self) -> u8 {
        self.algo.id()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Public half, for distribution to peers.
    pub fn second_party(&self) -> SecondParty {
        self.public.clone()
    }

    /// Public half acting as an observer that can verify others' records.
    pub fn third_party(&self) -> ThirdParty {
        ThirdParty::new(self.public.clone(), self.registry)
    }

    /// Fresh random secret for this identity's suite.
    pub fn new_secret(&self) -> Secret {
        Secret::generate(self.suite)
    }

    fn sign(&self, data: &[u8]) -> GolixResult<Vec<u8>> {
        self.suite.sign(&self.private, data)
    }

    // ===================================================================
    // Record construction
    // ===================================================================

    /// Encrypt `plaintext` under `secret` and pack it as a signed container.
    pub fn make_container(&self, secret: &Secret, plaintext: &[u8]) -> GolixResult<Container> {
        if secret.cipher() != self.cipher() {
            return Err(GolixError::Validation(format!(
                "Secret is for cipher {}, identity uses {}",
                secret.cipher(),
                self.cipher()
            )));
        }
        let payload = self.suite.encrypt_symmetric(secret, plaintext)?;
        Container::pack(
            self.suite,
            self.algo,
            self.address().clone(),
            payload,
            |data| self.sign(data),
        )
    }

    /// Vouch for `target`.
    pub fn make_bind_static(&self, target: &Address) -> GolixResult<StaticBinding> {
        StaticBinding::pack(
            self.suite,
            self.algo,
            self.address().clone(),
            target.clone(),
            |data| self.sign(data),
        )
    }

    /// Build one version of a dynamic binding.
    ///
    /// A fresh chain passes `dynamic_address = None`, `counter = 0` and an
    /// empty history; the dynamic address is then derived from the record.
    /// A continuation passes the chain's dynamic address, a counter above 0
    /// and the superseded versions' addresses, most recent first.
    ///
    /// # Errors
    ///
    /// [`GolixError::Validation`] when exactly one of `dynamic_address` and
    /// `history` is present, or the counter disagrees with the shape.
    pub fn make_bind_dynamic(
        &self,
        target: &Address,
        dynamic_address: Option<Address>,
        counter: u32,
        history: Vec<Address>,
    ) -> GolixResult<DynamicBinding> {
        DynamicBinding::pack(
            self.suite,
            self.algo,
            self.address().clone(),
            counter,
            target.clone(),
            dynamic_address,
            history,
            |data| self.sign(data),
        )
    }

    /// Build the version that supersedes `prev`, pointing at `target`.
    pub fn advance_bind_dynamic(
        &self,
        prev: &DynamicBinding,
        target: &Address,
    ) -> GolixResult<DynamicBinding> {
        if prev.binder() != self.address() {
            return Err(GolixError::Validation(
                "Cannot continue a dynamic binding owned by another identity".to_string(),
            ));
        }
        let counter = prev.counter().checked_add(1).ok_or_else(|| {
            GolixError::Validation("Dynamic binding counter exhausted".to_string())
        })?;
        let history = std::iter::once(prev.address().clone())
            .chain(prev.history().iter().cloned())
            .collect();
        self.make_bind_dynamic(
            target,
            Some(prev.dynamic_address().clone()),
            counter,
            history,
        )
    }

    /// Revoke the record at `target`.
    pub fn make_debind(&self, target: &Address) -> GolixResult<Debinding> {
        Debinding::pack(
            self.suite,
            self.algo,
            self.address().clone(),
            target.clone(),
            |data| self.sign(data),
        )
    }

    /// Share the secret of the container at `target`.
    pub fn make_handshake(&self, target: &Address, secret: Secret) -> AsymPayload {
        AsymPayload::Handshake {
            author: self.address().clone(),
            target: target.clone(),
            secret,
        }
    }

    /// Acknowledge the handshake at `target`.
    pub fn make_ack(&self, target: &Address, status: u32) -> AsymPayload {
        AsymPayload::Ack {
            author: self.address().clone(),
            target: target.clone(),
            status,
        }
    }

    /// Reject the handshake at `target`.
    pub fn make_nak(&self, target: &Address, status: u32) -> AsymPayload {
        AsymPayload::Nak {
            author: self.address().clone(),
            target: target.clone(),
            status,
        }
    }

    /// Wrap application-defined bytes.
    pub fn make_else(&self, payload: Vec<u8>) -> AsymPayload {
        AsymPayload::Else {
            author: self.address().clone(),
            payload,
        }
    }

    /// Seal `request` to `recipient` and MAC the result.
    ///
    /// # Errors
    ///
    /// [`GolixError::Validation`] under the test-double suite or address
    /// algorithm, when the recipient uses another suite, when this identity
    /// is not the payload's author, or when the payload does not fit.
    pub fn make_request(
        &self,
        recipient: &SecondParty,
        request: &AsymPayload,
    ) -> GolixResult<Request> {
        self.require_real_crypto("make requests")?;
        if recipient.cipher() != self.cipher() {
            return Err(GolixError::Validation(format!(
                "Recipient uses cipher {}, identity uses {}",
                recipient.cipher(),
                self.cipher()
            )));
        }
        if request.author() != self.address() {
            return Err(GolixError::Validation(
                "Request payload was authored by another identity".to_string(),
            ));
        }

        let plaintext = request.to_bytes()?;
        let payload = self.suite.encrypt_asymmetric(recipient.keys(), &plaintext)?;
        Request::pack(
            self.suite,
            self.algo,
            recipient.address().clone(),
            payload,
            |data| self.suite.mac(&self.private, recipient.keys(), data),
        )
    }

    fn require_real_crypto(&self, operation: &str) -> GolixResult<()> {
        if self.suite.is_test_double() || self.algo.is_test_double() {
            return Err(GolixError::Validation(format!(
                "Cannot {} with test-double cipher {} / address algorithm {}",
                operation,
                self.suite.id(),
                self.algo.id()
            )));
        }
        Ok(())
    }

    // ===================================================================
    // Structural ingestion
    // ===================================================================

    /// Parse a container and verify its address; the signature is not yet
    /// trusted.
    pub fn unpack_container(&self, bytes: &[u8]) -> GolixResult<Container> {
        Container::unpack(bytes, &self.registry)
    }

    pub fn unpack_bind_static(&self, bytes: &[u8]) -> GolixResult<StaticBinding> {
        StaticBinding::unpack(bytes, &self.registry)
    }

    pub fn unpack_bind_dynamic(&self, bytes: &[u8]) -> GolixResult<DynamicBinding> {
        DynamicBinding::unpack(bytes, &self.registry)
    }

    pub fn unpack_debind(&self, bytes: &[u8]) -> GolixResult<Debinding> {
        Debinding::unpack(bytes, &self.registry)
    }

    pub fn unpack_request(&self, bytes: &[u8]) -> GolixResult<Request> {
        Request::unpack(bytes, &self.registry)
    }

    // ===================================================================
    // Verified receipt
    // ===================================================================

    /// Verify the container's signature against `author`, then decrypt.
    pub fn receive_container(
        &self,
        author: &SecondParty,
        secret: &Secret,
        container: &Container,
    ) -> GolixResult<Vec<u8>> {
        author.verify_signed(&self.registry, container.author(), container.packed())?;
        let suite = self.registry.cipher_suite(container.cipher())?;
        if secret.cipher() != container.cipher() {
            return Err(GolixError::Validation(format!(
                "Secret is for cipher {}, container uses {}",
                secret.cipher(),
                container.cipher()
            )));
        }
        let plaintext = suite.decrypt_symmetric(secret, container.payload())?;
        debug!(address = %container.address(), len = plaintext.len(), "Received container");
        Ok(plaintext)
    }

    /// Verify a static binding and return its target.
    pub fn receive_bind_static(
        &self,
        binder: &SecondParty,
        binding: &StaticBinding,
    ) -> GolixResult<Address> {
        binder.verify_signed(&self.registry, binding.binder(), binding.packed())?;
        Ok(binding.target().clone())
    }

    /// Verify a dynamic binding and return its target vector (current
    /// target followed by history).
    pub fn receive_bind_dynamic(
        &self,
        binder: &SecondParty,
        binding: &DynamicBinding,
    ) -> GolixResult<Vec<Address>> {
        binder.verify_signed(&self.registry, binding.binder(), binding.packed())?;
        Ok(binding.target_vector())
    }

    /// Verify a debinding and return the revoked address.
    pub fn receive_debind(
        &self,
        debinder: &SecondParty,
        debinding: &Debinding,
    ) -> GolixResult<Address> {
        debinder.verify_signed(&self.registry, debinding.debinder(), debinding.packed())?;
        Ok(debinding.target().clone())
    }

    /// Verify a request's MAC, decrypt it and return the payload.
    ///
    /// # Errors
    ///
    /// [`GolixError::Security`] when the request is not addressed to this
    /// identity, the MAC does not verify, or the sealed payload names an
    /// author other than `requestor`. [`GolixError::Validation`] under the
    /// test-double suite or address algorithm.
    pub fn receive_request(
        &self,
        requestor: &SecondParty,
        request: &Request,
    ) -> GolixResult<AsymPayload> {
        self.require_real_crypto("receive requests")?;
        if request.recipient() != self.address() {
            warn!(
                recipient = %request.recipient(),
                own = %self.address(),
                "Request addressed to another identity"
            );
            return Err(GolixError::Security(
                "Request is not addressed to this identity".to_string(),
            ));
        }
        if request.cipher() != self.cipher() {
            return Err(GolixError::Validation(format!(
                "Request uses cipher {}, identity uses {}",
                request.cipher(),
                self.cipher()
            )));
        }

        let packed = request.packed();
        self.suite
            .verify_mac(&self.private, requestor.keys(), packed.trailer(), packed.signed_data())
            .inspect_err(|_| {
                warn!(address = %request.address(), "Request MAC rejected");
            })?;

        let plaintext = Zeroizing::new(
            self.suite.decrypt_asymmetric(&self.private, request.payload())?,
        );
        let payload = AsymPayload::from_bytes(&plaintext)?;
        if payload.author() != requestor.address() {
            warn!(
                author = %payload.author(),
                requestor = %requestor.address(),
                "Request payload author mismatch"
            );
            return Err(GolixError::Security(
                "Request payload author does not match requestor".to_string(),
            ));
        }
        debug!(address = %request.address(), "Received request");
        Ok(payload)
    }
}

impl std::fmt::Debug for FirstParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstParty")
            .field("address", self.address())
            .field("cipher", &self.suite.id())
            .field("algo", &self.algo.id())
            .finish_non_exhaustive()
    }
}
