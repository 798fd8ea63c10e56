//! Error type shared by every contract entry point.
//!
//! Any error aborts the invocation: entry points run inside a
//! [`StoreTransaction`](innerring_state::StoreTransaction) that is only
//! committed on success, so a failed call leaves the namespace untouched.

use innerring_state::{HeaderError, StoreError, VoteError};
use innerring_types::{
    Asset, CodecError, Epoch, ErrorCode, ScriptHash, config::ConfigError,
};
use snafu::{Location, Snafu};

/// Errors returned by contract entry points.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ContractError {
    /// Reading or writing the contract namespace failed.
    ///
    /// **Recovery**: Retryable. Resubmit the transaction.
    #[snafu(display("Storage error at {location}: {source}"))]
    Store {
        /// Underlying store error.
        source: StoreError,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// Buffered writes could not be committed.
    ///
    /// **Recovery**: Retryable. No state was changed.
    #[snafu(display("Commit failed: {source}"))]
    Commit {
        /// Underlying store error.
        source: StoreError,
    },

    /// Ballot bookkeeping failed.
    #[snafu(display("Ballot error: {source}"))]
    Ballot {
        /// Underlying vote error.
        source: VoteError,
    },

    /// Stored administrative value could not be encoded or decoded.
    ///
    /// **Recovery**: Not retryable. The namespace holds a value from an
    /// incompatible version.
    #[snafu(display("Codec error for {key}: {source}"))]
    Codec {
        /// Administrative key involved.
        key: &'static str,
        /// Underlying codec error.
        source: CodecError,
    },

    /// Submitted audit result does not follow the header layout.
    #[snafu(display("Malformed audit result: {source}"))]
    MalformedRecord {
        /// Header reader error.
        source: HeaderError,
    },

    /// Deployment parameters are invalid.
    #[snafu(display("Invalid deployment: {source}"))]
    Config {
        /// Validation error.
        source: ConfigError,
    },

    /// Contract namespace lacks a deployment key.
    ///
    /// **Recovery**: Not retryable. Deploy the contract first.
    #[snafu(display("Contract not deployed: missing {key}"))]
    NotDeployed {
        /// Missing administrative key.
        key: &'static str,
    },

    /// No roster member authorized the vote.
    #[snafu(display("Unauthorized voter"))]
    UnauthorizedVoter,

    /// Publisher is not a roster member or did not sign the transaction.
    #[snafu(display("Unauthorized publisher"))]
    UnauthorizedPublisher,

    /// Caller failed a witness or identity check.
    #[snafu(display("Unauthorized caller for {entry_point}"))]
    UnauthorizedCaller {
        /// Entry point that refused the call.
        entry_point: &'static str,
    },

    /// Payment came from a contract other than the native assets.
    #[snafu(display("Payment from {caller} rejected: only GAS and NEO are accepted"))]
    UnsupportedAsset {
        /// Calling contract.
        caller: ScriptHash,
    },

    /// Submitted epoch is not the current one.
    ///
    /// **Recovery**: Not retryable. Rebuild the transaction for the current epoch.
    #[snafu(display("Invalid epoch: submitted {submitted}, current {current}"))]
    InvalidEpoch {
        /// Epoch in the request.
        submitted: Epoch,
        /// Epoch reported by the network state.
        current: Epoch,
    },

    /// Vote carries no candidates.
    #[snafu(display("Candidate list is empty"))]
    EmptyCandidates,

    /// Contract balance is too small to emit anything.
    #[snafu(display("No GAS to emit"))]
    NothingToEmit,

    /// The asset ledger refused a mandatory transfer.
    #[snafu(display("Failed to transfer {amount} {asset}"))]
    AssetTransfer {
        /// Asset being moved.
        asset: Asset,
        /// Amount requested.
        amount: u64,
    },

    /// Requested record does not exist.
    #[snafu(display("Record not found: {id}"))]
    RecordNotFound {
        /// Hex-encoded record key.
        id: String,
    },
}

impl ContractError {
    /// Returns the machine-readable error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Store { .. } => ErrorCode::StorageBackend,
            Self::Commit { .. } => ErrorCode::StorageCommit,
            Self::Ballot { source } => match source {
                VoteError::Store { .. } => ErrorCode::StorageBackend,
                VoteError::Codec { .. } => ErrorCode::Serialization,
            },
            Self::Codec { .. } => ErrorCode::Serialization,
            Self::MalformedRecord { .. } => ErrorCode::MalformedKeyOrRecord,
            Self::Config { .. } | Self::NotDeployed { .. } => ErrorCode::Config,
            Self::UnauthorizedVoter => ErrorCode::UnauthorizedVoter,
            Self::UnauthorizedPublisher => ErrorCode::UnauthorizedPublisher,
            Self::UnauthorizedCaller { .. } | Self::UnsupportedAsset { .. } => {
                ErrorCode::UnauthorizedCaller
            },
            Self::InvalidEpoch { .. } => ErrorCode::InvalidEpoch,
            Self::EmptyCandidates => ErrorCode::InvalidArgument,
            Self::NothingToEmit | Self::AssetTransfer { .. } => ErrorCode::AssetTransfer,
            Self::RecordNotFound { .. } => ErrorCode::NotFound,
        }
    }

    /// Whether this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    /// Suggested recovery action for this error.
    #[must_use]
    pub const fn suggested_action(&self) -> &'static str {
        self.code().suggested_action()
    }
}

/// Result type for contract entry points.
pub type Result<T> = std::result::Result<T, ContractError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_governance_codes() {
        assert_eq!(ContractError::UnauthorizedVoter.code(), ErrorCode::UnauthorizedVoter);
        assert_eq!(ContractError::UnauthorizedPublisher.code(), ErrorCode::UnauthorizedPublisher);
        let stale = ContractError::InvalidEpoch { submitted: Epoch::new(4), current: Epoch::new(5) };
        assert_eq!(stale.code(), ErrorCode::InvalidEpoch);
        assert!(!stale.is_retryable());
        assert_eq!(stale.to_string(), "Invalid epoch: submitted epoch:4, current epoch:5");
    }

    #[test]
    fn test_malformed_record_code() {
        let err = ContractError::MalformedRecord {
            source: HeaderError::EpochOutOfRange { value: u64::MAX },
        };
        assert_eq!(err.code(), ErrorCode::MalformedKeyOrRecord);
    }

    #[test]
    fn test_asset_errors_are_retryable() {
        let err = ContractError::AssetTransfer { asset: Asset::Neo, amount: 10 };
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Failed to transfer 10 NEO");
        assert!(!ContractError::EmptyCandidates.is_retryable());
    }
}
