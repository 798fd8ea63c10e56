//! Configuration types for Inner Ring contracts.
//!
//! Deployment parameters are plain serde structs (loadable from TOML/JSON by
//! whatever deploys the contracts) with JSON schemas for tooling. All config
//! structs validate their values at construction time via fallible builders.
//! Post-deserialization validation is available via the `validate()` method.

// The schemars `JsonSchema` derive macro internally uses `.unwrap()` in its
// expansions. Allow `disallowed_methods` at the module level since config
// types are declarative structs with minimal procedural code.
#![allow(clippy::disallowed_methods)]

mod contracts;
mod quorum;

pub use contracts::*;
pub use quorum::*;
use snafu::Snafu;

/// Configuration validation error.
///
/// Returned when a configuration value is outside its valid range or
/// violates a cross-field constraint.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[snafu(display("invalid config: {message}"))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::types::ScriptHash;

    fn netmap() -> ScriptHash {
        ScriptHash::new([0x11; 20])
    }

    // =========================================================================
    // AlphabetConfig validation tests
    // =========================================================================

    #[test]
    fn test_alphabet_config_with_notary() {
        let config = AlphabetConfig::builder()
            .netmap(netmap())
            .proxy(ScriptHash::new([0x22; 20]))
            .name("Az")
            .index(2)
            .total(7)
            .build()
            .expect("valid config");
        assert!(!config.notary_disabled);
        assert_eq!(config.quorum, QuorumThreshold::TwoThirdsPlusOne);
        assert_eq!(config.index, 2);
    }

    #[test]
    fn test_alphabet_config_proxy_required_with_notary() {
        let err = AlphabetConfig::builder()
            .netmap(netmap())
            .name("Az")
            .index(0)
            .total(1)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("proxy"));
    }

    #[test]
    fn test_alphabet_config_proxy_optional_without_notary() {
        let config = AlphabetConfig::builder()
            .notary_disabled(true)
            .netmap(netmap())
            .name("Buky")
            .index(0)
            .total(1)
            .build()
            .expect("valid config");
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_alphabet_config_index_out_of_range() {
        let err = AlphabetConfig::builder()
            .notary_disabled(true)
            .netmap(netmap())
            .name("Vedi")
            .index(3)
            .total(3)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("index must be less than total"));
    }

    #[test]
    fn test_alphabet_config_empty_name() {
        let result = AlphabetConfig::builder()
            .notary_disabled(true)
            .netmap(netmap())
            .name("")
            .index(0)
            .total(1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_alphabet_config_rejects_zero_fixed_quorum() {
        let err = AlphabetConfig::builder()
            .notary_disabled(true)
            .netmap(netmap())
            .name("Az")
            .index(0)
            .total(3)
            .quorum(QuorumThreshold::Fixed { votes: 0 })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at least one vote"));
    }

    #[test]
    fn test_alphabet_config_serde_defaults() {
        let config = AlphabetConfig::builder()
            .notary_disabled(true)
            .netmap(netmap())
            .name("Glagoli")
            .index(0)
            .total(4)
            .quorum(QuorumThreshold::Majority)
            .build()
            .unwrap();
        let bytes = crate::codec::encode(&config).unwrap();
        let decoded: AlphabetConfig = crate::codec::decode(&bytes).unwrap();
        assert_eq!(decoded, config);
    }

    // =========================================================================
    // ReputationConfig validation tests
    // =========================================================================

    #[test]
    fn test_reputation_config_rejects_zero_fixed_quorum() {
        let result = ReputationConfig::builder()
            .owner(netmap())
            .quorum(QuorumThreshold::Fixed { votes: 0 })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_reputation_config_defaults() {
        let config = ReputationConfig::builder().owner(netmap()).build().unwrap();
        assert!(!config.notary_disabled);
        assert_eq!(config.quorum, QuorumThreshold::TwoThirdsPlusOne);
    }

    #[test]
    fn test_audit_config_builder() {
        let config = AuditConfig::builder().netmap(netmap()).notary_disabled(true).build().unwrap();
        assert!(config.notary_disabled);
        assert_eq!(config.netmap, netmap());
    }
}
