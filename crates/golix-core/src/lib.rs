//! Golix Core Library
//!
//! Self-addressed, author-attributed binary records.
//!
//! ## Overview
//!
//! Every Golix record carries a content address computed over its own bytes
//! and, except for identity containers, a signature or MAC from its author.
//! Records are immutable once packed: a [`FirstParty`] builds and signs them
//! in one step, and any reader can parse them back and check the address
//! before deciding whom to trust.
//!
//! | Kind | Magic | Trailer |
//! |------|-------|---------|
//! | [`IdentityContainer`] | `GIDC` | none |
//! | [`Container`] | `GEOC` | signature |
//! | [`StaticBinding`] | `GOBS` | signature |
//! | [`DynamicBinding`] | `GOBD` | signature |
//! | [`Debinding`] | `GDXX` | signature |
//! | [`Request`] | `GARQ` | MAC |
//!
//! ## Quick Start
//!
//! ```
//! use golix_core::{FirstParty, GolixConfig, GolixObject};
//!
//! let config = GolixConfig::default();
//! let alice = FirstParty::generate(&config).unwrap();
//! let bob = FirstParty::generate(&config).unwrap();
//!
//! // Alice encrypts a container and shares its secret with Bob
//! let secret = alice.new_secret();
//! let container = alice.make_container(&secret, b"hello").unwrap();
//! let handshake = alice.make_handshake(container.address(), secret);
//! let request = alice.make_request(&bob.second_party(), &handshake).unwrap();
//!
//! // Bob checks the request came from Alice and opens the container
//! let request = bob.unpack_request(request.as_bytes()).unwrap();
//! let shared = bob.receive_request(&alice.second_party(), &request).unwrap();
//! let golix_core::AsymPayload::Handshake { secret, .. } = shared else {
//!     panic!("expected a handshake");
//! };
//! let container = bob.unpack_container(container.as_bytes()).unwrap();
//! let plaintext = bob
//!     .receive_container(&alice.second_party(), &secret, &container)
//!     .unwrap();
//! assert_eq!(plaintext, b"hello");
//! ```

pub mod address;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod objects;
pub mod secret;

// Re-exports
pub use address::Address;
pub use codec::ObjectKind;
pub use config::GolixConfig;
pub use crypto::{
    AddressAlgorithm, CipherSuite, ComponentLengths, PrivateKeys, PublicKeys, Registry,
};
pub use error::{GolixError, GolixResult};
pub use identity::{FirstParty, SecondParty, ThirdParty};
pub use objects::{
    AsymPayload, Container, Debinding, DynamicBinding, GolixObject, IdentityContainer, Request,
    StaticBinding, WireObject,
};
pub use secret::Secret;
