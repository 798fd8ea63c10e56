//! Error codes shared by every Inner Ring crate.
//!
//! Each crate defines its own snafu error enum at its module boundary; the
//! contract layer maps every variant to an [`ErrorCode`] so callers (and the
//! host, when it records why a transaction faulted) get a stable numeric
//! identifier, a retryability classification and a recovery hint.

/// Machine-readable error codes for programmatic error handling.
///
/// Codes are organized into ranges:
///
/// | Range       | Domain      | Examples                                   |
/// |-------------|-------------|--------------------------------------------|
/// | 1000–1099   | Storage     | Store backend failures, commit failures    |
/// | 1100–1199   | Encoding    | Malformed keys or audit records            |
/// | 2000–2099   | Governance  | Unauthorized voter/publisher, stale epoch  |
/// | 3000–3099   | Contract    | Config, serialization, asset movement      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // --- Storage errors (1000–1199) ---
    /// The key-value backend failed to read or write.
    StorageBackend = 1000,
    /// A buffered transaction could not be committed.
    StorageCommit = 1001,
    /// A key or record does not match its documented byte layout.
    MalformedKeyOrRecord = 1100,

    // --- Governance errors (2000–2099) ---
    /// Caller is not an eligible voter for the ballot.
    UnauthorizedVoter = 2000,
    /// Caller may not publish the record.
    UnauthorizedPublisher = 2001,
    /// Caller failed a witness or permission check on a non-governance entry point.
    UnauthorizedCaller = 2002,
    /// Submitted epoch does not match the current epoch.
    InvalidEpoch = 2003,

    // --- Contract errors (3000–3099) ---
    /// Deployment configuration is invalid or missing.
    Config = 3000,
    /// Stored value could not be serialized or deserialized.
    Serialization = 3001,
    /// A native asset transfer or vote was refused by the asset oracle.
    AssetTransfer = 3002,
    /// The request arguments are unusable (e.g. empty candidate list).
    InvalidArgument = 3003,
    /// Requested record does not exist.
    NotFound = 3004,
}

impl ErrorCode {
    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Whether resubmitting the same transaction later may succeed.
    ///
    /// Contracts never retry internally; this only classifies the failure for
    /// the submitter.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::StorageBackend | Self::StorageCommit | Self::AssetTransfer)
    }

    /// Suggested recovery action for this error code.
    #[must_use]
    pub const fn suggested_action(self) -> &'static str {
        match self {
            Self::StorageBackend => "Check the contract storage backend and resubmit.",
            Self::StorageCommit => "Resubmit the transaction; no state was changed.",
            Self::MalformedKeyOrRecord => {
                "Re-encode the record with the current stable marshaller; the header could not be read."
            },
            Self::UnauthorizedVoter => {
                "Sign the transaction with a key from the current Alphabet roster."
            },
            Self::UnauthorizedPublisher => {
                "Publish from an Inner Ring node key and include its witness."
            },
            Self::UnauthorizedCaller => "Invoke from the node or contract the entry point expects.",
            Self::InvalidEpoch => "Rebuild the transaction for the current epoch.",
            Self::Config => "Redeploy the contract with valid deployment parameters.",
            Self::Serialization => "Stored value is corrupted or from an incompatible version.",
            Self::AssetTransfer => "Check the contract account balance and resubmit.",
            Self::InvalidArgument => "Fix the request arguments.",
            Self::NotFound => "List available record identifiers before fetching.",
        }
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 12] = [
        ErrorCode::StorageBackend,
        ErrorCode::StorageCommit,
        ErrorCode::MalformedKeyOrRecord,
        ErrorCode::UnauthorizedVoter,
        ErrorCode::UnauthorizedPublisher,
        ErrorCode::UnauthorizedCaller,
        ErrorCode::InvalidEpoch,
        ErrorCode::Config,
        ErrorCode::Serialization,
        ErrorCode::AssetTransfer,
        ErrorCode::InvalidArgument,
        ErrorCode::NotFound,
    ];

    #[test]
    fn test_codes_are_distinct_and_displayed_numerically() {
        let mut seen = std::collections::HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.as_u16()), "{code:?} reuses a number");
            assert_eq!(code.to_string(), code.as_u16().to_string());
        }
    }

    #[test]
    fn test_governance_errors_are_not_retryable() {
        assert!(!ErrorCode::UnauthorizedVoter.is_retryable());
        assert!(!ErrorCode::InvalidEpoch.is_retryable());
        assert!(!ErrorCode::MalformedKeyOrRecord.is_retryable());
        assert!(ErrorCode::StorageCommit.is_retryable());
    }

    #[test]
    fn test_every_code_has_an_action() {
        for code in ALL {
            assert!(!code.suggested_action().is_empty(), "{code:?} has no action");
        }
    }
}
