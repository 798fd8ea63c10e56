//! Quorum vote bookkeeping.
//!
//! Turns independent single-signer invocations into one threshold-gated
//! transition. Each ballot is identified by a [`BallotId`] derived from the
//! epoch and a proposal fingerprint, so a new proposal always starts a fresh
//! tally. Per ballot the state moves:
//!
//! ```text
//! absent -> accumulating (1..threshold-1 voters) -> quorum observed -> absent
//! ```
//!
//! Roster membership is checked by the caller before [`QuorumVote::register`];
//! this module trusts the identities it is given.

use std::fmt;

use innerring_types::{
    CodecError, Epoch, Hash, PublicKey, config::QuorumThreshold, decode, encode, sha256_concat,
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::{
    engine::{KvStore, StoreError},
    keys::encode_epoch,
};

/// Namespace prefix of stored tallies. Listings must filter it out.
pub const BALLOT_PREFIX: &[u8] = b"ballot:";

/// Errors from reading or writing a tally.
#[derive(Debug, Snafu)]
pub enum VoteError {
    /// Store access failed.
    #[snafu(display("ballot storage error: {source}"))]
    Store {
        /// Underlying store error.
        source: StoreError,
    },

    /// Stored tally could not be decoded or a new one encoded.
    #[snafu(display("ballot tally codec error: {source}"))]
    Codec {
        /// Underlying codec error.
        source: CodecError,
    },
}

/// Result type for vote operations.
pub type Result<T> = std::result::Result<T, VoteError>;

/// Identity of one ballot: SHA-256 of `encode_epoch(epoch) ++ fingerprint`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BallotId(Hash);

impl BallotId {
    /// Derives the ballot for a proposal fingerprint in an epoch.
    pub fn new(epoch: Epoch, fingerprint: &[u8]) -> Self {
        Self(sha256_concat(&[&encode_epoch(epoch)[..], fingerprint]))
    }

    /// Raw ballot hash.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Store key of this ballot's tally.
    pub fn storage_key(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(BALLOT_PREFIX.len() + self.0.len());
        key.extend_from_slice(BALLOT_PREFIX);
        key.extend_from_slice(&self.0);
        key
    }
}

impl fmt::Debug for BallotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BallotId({})", hex::encode(self.0))
    }
}

impl fmt::Display for BallotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Distinct voters registered for a ballot, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Voters so far; no identity appears twice.
    pub voters: Vec<PublicKey>,
}

impl Tally {
    /// Number of distinct voters.
    pub fn count(&self) -> usize {
        self.voters.len()
    }

    /// Whether `voter` already voted.
    pub fn contains(&self, voter: &PublicKey) -> bool {
        self.voters.contains(voter)
    }
}

/// Whether `count` distinct voters satisfy `threshold` over a roster of
/// `roster` members.
pub fn has_quorum(count: usize, roster: usize, threshold: QuorumThreshold) -> bool {
    threshold.is_reached(count, roster)
}

/// Ballot tallies stored in a contract namespace.
pub struct QuorumVote<'a, S: KvStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KvStore + ?Sized> QuorumVote<'a, S> {
    /// Binds vote bookkeeping to a store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns the current tally of `ballot`; an absent ballot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`VoteError`] if the store fails or the tally is corrupt.
    pub fn tally(&self, ballot: &BallotId) -> Result<Tally> {
        match self.store.get(&ballot.storage_key()).context(StoreSnafu)? {
            Some(bytes) => decode(&bytes).context(CodecSnafu),
            None => Ok(Tally::default()),
        }
    }

    /// Adds `voter` to the ballot and returns the distinct-voter count.
    ///
    /// Registering the same voter again leaves the tally unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`VoteError`] if the tally cannot be read or written.
    pub fn register(&self, ballot: &BallotId, voter: &PublicKey) -> Result<usize> {
        let mut tally = self.tally(ballot)?;
        if tally.contains(voter) {
            return Ok(tally.count());
        }

        tally.voters.push(voter.clone());
        let bytes = encode(&tally).context(CodecSnafu)?;
        self.store.put(&ballot.storage_key(), &bytes).context(StoreSnafu)?;
        Ok(tally.count())
    }

    /// Removes the ballot's tally. Call once, from the path that observed
    /// quorum, before performing the gated effect.
    ///
    /// # Errors
    ///
    /// Returns [`VoteError::Store`] if the delete fails.
    pub fn clear(&self, ballot: &BallotId) -> Result<()> {
        self.store.delete(&ballot.storage_key()).context(StoreSnafu)?;
        debug!(ballot = %ballot, "Ballot cleared");
        Ok(())
    }
}
