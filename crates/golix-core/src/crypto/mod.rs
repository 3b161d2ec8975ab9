//! Pluggable cryptography
//!
//! Records name their primitives by two 1-byte tags: the cipher suite in the
//! header and the address algorithm in every address. Both tags resolve
//! through a [`Registry`], a read-only lookup over static tables. Suite 0 and
//! algorithm 0 are structural test doubles; a registry only hands them out
//! when it was built for testing.
//!
//! | Cipher | Suite |
//! |--------|-------|
//! | 0 | [`NullSuite`] (test double) |
//! | 1 | [`ClassicSuite`] |
//! | 2 | [`HybridSuite`] |

pub mod address_algo;
mod aead;
pub mod classic;
pub mod hybrid;
pub mod null;
mod sealed;
pub mod suite;

pub use address_algo::{AddressAlgorithm, NullAddressAlgo, Sha512AddressAlgo};
pub use classic::ClassicSuite;
pub use hybrid::HybridSuite;
pub use null::NullSuite;
pub use suite::{CipherSuite, ComponentLengths, PrivateKeys, PublicKeys};

use crate::error::{GolixError, GolixResult};
use tracing::warn;

static ADDRESS_ALGOS: [&dyn AddressAlgorithm; 2] = [&NullAddressAlgo, &Sha512AddressAlgo];

static CIPHER_SUITES: [&dyn CipherSuite; 3] = [&NullSuite, &ClassicSuite, &HybridSuite];

/// Component lengths declared for a cipher tag, whether or not the suite is
/// selectable under the current configuration.
pub fn component_lengths_for(cipher: u8) -> Option<ComponentLengths> {
    CIPHER_SUITES
        .get(cipher as usize)
        .map(|suite| suite.lengths())
}

/// Read-only view over the address algorithm and cipher suite tables.
///
/// `Copy` and free of state beyond the test-double switch, so it can be
/// handed to any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registry {
    allow_test_doubles: bool,
}

impl Registry {
    /// Registry that refuses suite 0 and algorithm 0.
    pub const fn production() -> Self {
        Self {
            allow_test_doubles: false,
        }
    }

    /// Registry that also resolves the test doubles.
    pub const fn testing() -> Self {
        Self {
            allow_test_doubles: true,
        }
    }

    /// Whether test doubles resolve.
    pub fn allows_test_doubles(&self) -> bool {
        self.allow_test_doubles
    }

    /// Resolve an address algorithm tag.
    ///
    /// # Errors
    ///
    /// [`GolixError::Validation`] for an unknown tag or a test double in a
    /// production registry.
    pub fn address_algo(&self, id: u8) -> GolixResult<&'static dyn AddressAlgorithm> {
        let algo = *ADDRESS_ALGOS.get(id as usize).ok_or_else(|| {
            GolixError::Validation(format!("Unknown address algorithm {}", id))
        })?;
        if algo.is_test_double() && !self.allow_test_doubles {
            warn!(algo = id, "Refusing test-double address algorithm");
            return Err(GolixError::Validation(format!(
                "Address algorithm {} is a test double and is disabled",
                id
            )));
        }
        Ok(algo)
    }

    /// Resolve a cipher suite tag.
    ///
    /// # Errors
    ///
    /// [`GolixError::Validation`] for an unknown tag or a test double in a
    /// production registry.
    pub fn cipher_suite(&self, id: u8) -> GolixResult<&'static dyn CipherSuite> {
        let suite = *CIPHER_SUITES
            .get(id as usize)
            .ok_or_else(|| GolixError::Validation(format!("Unknown cipher suite {}", id)))?;
        if suite.is_test_double() && !self.allow_test_doubles {
            warn!(cipher = id, "Refusing test-double cipher suite");
            return Err(GolixError::Validation(format!(
                "Cipher suite {} is a test double and is disabled",
                id
            )));
        }
        Ok(suite)
    }
}
