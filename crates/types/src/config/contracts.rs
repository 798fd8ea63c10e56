//! Deployment parameters for the Alphabet, Audit and Reputation contracts.
//!
//! These are the values a contract persists into its own storage namespace
//! when it is deployed. The storage keys they live under are administrative
//! keys and never appear in record listings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ConfigError, QuorumThreshold};
use crate::types::ScriptHash;

fn validate_quorum(quorum: QuorumThreshold) -> Result<(), ConfigError> {
    if quorum == (QuorumThreshold::Fixed { votes: 0 }) {
        return Err(ConfigError::Validation {
            message: "fixed quorum must require at least one vote".to_string(),
        });
    }
    Ok(())
}

// =========================================================================
// AlphabetConfig
// =========================================================================

/// Deployment parameters of one Alphabet contract.
///
/// There is one Alphabet contract per Alphabet node; `index` selects the
/// node (and the committee candidate) this instance is bound to.
///
/// # Validation Rules
///
/// - `name` must not be empty
/// - `total` must be >= 1 and `index` < `total`
/// - `proxy` is required unless `notary_disabled` is set
/// - `quorum` must not be `Fixed { votes: 0 }`
///
/// # Example
///
/// ```no_run
/// # use innerring_types::{ScriptHash, config::AlphabetConfig};
/// let config = AlphabetConfig::builder()
///     .netmap(ScriptHash::new([1; 20]))
///     .proxy(ScriptHash::new([2; 20]))
///     .name("Az")
///     .index(0)
///     .total(7)
///     .build()
///     .expect("valid alphabet config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AlphabetConfig {
    /// Collect signatures by voting instead of relying on a notary.
    #[serde(default)]
    pub notary_disabled: bool,
    /// Netmap contract address (source of the current epoch).
    #[schemars(with = "String")]
    pub netmap: ScriptHash,
    /// Proxy contract address that receives half of emitted GAS.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub proxy: Option<ScriptHash>,
    /// Human readable (Glagolitic) name of this contract instance.
    pub name: String,
    /// Position of the bound node in the Alphabet list.
    pub index: usize,
    /// Number of Alphabet contracts deployed.
    pub total: usize,
    /// Threshold used when votes are collected without a notary.
    #[serde(default)]
    pub quorum: QuorumThreshold,
}

#[bon::bon]
impl AlphabetConfig {
    /// Creates a new Alphabet configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any rule listed on the type is violated.
    #[builder]
    pub fn new(
        #[builder(default)] notary_disabled: bool,
        netmap: ScriptHash,
        proxy: Option<ScriptHash>,
        #[builder(into)] name: String,
        index: usize,
        total: usize,
        #[builder(default)] quorum: QuorumThreshold,
    ) -> Result<Self, ConfigError> {
        let config = Self { notary_disabled, netmap, proxy, name, index, total, quorum };
        config.validate()?;
        Ok(config)
    }
}

impl AlphabetConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Validation { message: "name must not be empty".to_string() });
        }
        if self.total == 0 {
            return Err(ConfigError::Validation { message: "total must be >= 1".to_string() });
        }
        if self.index >= self.total {
            return Err(ConfigError::Validation {
                message: format!(
                    "index must be less than total ({}), got {}",
                    self.total, self.index
                ),
            });
        }
        if !self.notary_disabled && self.proxy.is_none() {
            return Err(ConfigError::Validation {
                message: "proxy address is required when notary is enabled".to_string(),
            });
        }
        validate_quorum(self.quorum)
    }
}

// =========================================================================
// AuditConfig
// =========================================================================

/// Deployment parameters of the Audit contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuditConfig {
    /// Inner Ring roster is read from the netmap contract instead of the
    /// native role designation.
    #[serde(default)]
    pub notary_disabled: bool,
    /// Netmap contract address.
    #[schemars(with = "String")]
    pub netmap: ScriptHash,
}

#[bon::bon]
impl AuditConfig {
    /// Creates a new Audit configuration.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for parity with the other builders.
    #[builder]
    pub fn new(
        #[builder(default)] notary_disabled: bool,
        netmap: ScriptHash,
    ) -> Result<Self, ConfigError> {
        Ok(Self { notary_disabled, netmap })
    }
}

// =========================================================================
// ReputationConfig
// =========================================================================

/// Deployment parameters of the Reputation contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReputationConfig {
    /// Collect Alphabet signatures by voting instead of relying on a notary.
    #[serde(default)]
    pub notary_disabled: bool,
    /// Account allowed to re-initialize the contract.
    #[schemars(with = "String")]
    pub owner: ScriptHash,
    /// Threshold used when votes are collected without a notary.
    #[serde(default)]
    pub quorum: QuorumThreshold,
}

#[bon::bon]
impl ReputationConfig {
    /// Creates a new Reputation configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a fixed quorum of zero votes is requested.
    #[builder]
    pub fn new(
        #[builder(default)] notary_disabled: bool,
        owner: ScriptHash,
        #[builder(default)] quorum: QuorumThreshold,
    ) -> Result<Self, ConfigError> {
        let config = Self { notary_disabled, owner, quorum };
        config.validate()?;
        Ok(config)
    }
}

impl ReputationConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `quorum` is `Fixed { votes: 0 }`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_quorum(self.quorum)
    }
}
