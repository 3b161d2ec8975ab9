//! Runtime configuration

use crate::crypto::Registry;
use crate::error::{GolixError, GolixResult};
use serde::{Deserialize, Serialize};

/// Selects default primitives for new identities and gates the test doubles.
///
/// ```
/// use golix_core::GolixConfig;
///
/// let config = GolixConfig::from_json(r#"{ "default_cipher": 2 }"#).unwrap();
/// assert_eq!(config.default_cipher, 2);
/// assert_eq!(config.default_address_algo, 1);
/// assert!(!config.allow_test_doubles);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GolixConfig {
    /// Cipher suite for identities built by [`FirstParty::generate`](crate::FirstParty::generate).
    pub default_cipher: u8,
    /// Address algorithm for records those identities create.
    pub default_address_algo: u8,
    /// Resolve suite 0 and algorithm 0. Never set outside tests.
    pub allow_test_doubles: bool,
}

impl Default for GolixConfig {
    fn default() -> Self {
        Self {
            default_cipher: 1,
            default_address_algo: 1,
            allow_test_doubles: false,
        }
    }
}

impl GolixConfig {
    /// Configuration with the test doubles enabled and selected.
    pub fn testing() -> Self {
        Self {
            default_cipher: 0,
            default_address_algo: 0,
            allow_test_doubles: true,
        }
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> GolixResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GolixError::Validation(format!("Invalid configuration: {}", e)))
    }

    /// Registry honouring `allow_test_doubles`.
    pub fn registry(&self) -> Registry {
        if self.allow_test_doubles {
            Registry::testing()
        } else {
            Registry::production()
        }
    }
}
