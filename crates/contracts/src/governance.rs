//! Collective authorization for governance entry points.
//!
//! A gated effect needs the agreement of a roster (the Alphabet). Two
//! settlement modes exist:
//!
//! - **Notary enabled**: the roster signs one transaction with its
//!   multisignature account. A present account witness settles the ballot
//!   immediately.
//! - **Notary disabled**: every roster member sends its own transaction. Each
//!   invocation registers one vote; the invocation that reaches the threshold
//!   clears the ballot and performs the effect. Earlier invocations succeed
//!   without effect.
//!
//! Both modes produce the same [`VoteOutcome`], so entry points do not care
//! which one ran.

use innerring_state::{BallotId, KvStore, QuorumVote, has_quorum};
use innerring_types::{Epoch, PublicKey, bytes_eq, config::QuorumThreshold};
use snafu::{ResultExt, ensure};
use tracing::{debug, info, warn};

use crate::{
    error::{BallotSnafu, ContractError, InvalidEpochSnafu, Result},
    host::{Env, multisig_account},
};

/// What kind of caller is being authorized; selects the rejection error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Caller votes on a governance proposal.
    Voter,
    /// Caller publishes a record that requires roster agreement.
    Publisher,
}

impl Role {
    fn unauthorized(self) -> ContractError {
        match self {
            Self::Voter => ContractError::UnauthorizedVoter,
            Self::Publisher => ContractError::UnauthorizedPublisher,
        }
    }
}

/// Result of a successful gate invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Threshold met; the caller must perform the gated effect now.
    Accepted,
    /// Vote recorded; more distinct voters are needed.
    Pending {
        /// Distinct voters so far.
        votes: usize,
        /// Voters required.
        required: usize,
    },
}

impl VoteOutcome {
    /// Whether the gated effect must be performed.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Who may pass the gate and how many of them are needed.
#[derive(Debug, Clone, Copy)]
pub struct Gate<'a> {
    /// Eligible voters.
    pub roster: &'a [PublicKey],
    /// Votes needed when collected one by one.
    pub threshold: QuorumThreshold,
    /// Collect individual votes instead of checking the multisig account.
    pub notary_disabled: bool,
    /// Error flavor on rejection.
    pub role: Role,
}

/// Returns the first roster member that signed the current transaction.
pub fn inner_ring_invoker(env: &Env<'_>, roster: &[PublicKey]) -> Option<PublicKey> {
    roster.iter().find(|key| env.witness.check_witness(key)).cloned()
}

/// Accepts `epoch` only if it is the network's current, non-negative epoch.
///
/// Negative epochs encode to keys in the ASCII range, where they could
/// collide with deployment keys and the ballot prefix.
pub(crate) fn check_epoch(env: &Env<'_>, epoch: Epoch) -> Result<()> {
    let current = env.network.current_epoch();
    ensure!(
        epoch == current && epoch.value() >= 0,
        InvalidEpochSnafu { submitted: epoch, current }
    );
    Ok(())
}

/// Whether `key` is a member of `roster`.
pub fn is_member(roster: &[PublicKey], key: &PublicKey) -> bool {
    roster.iter().any(|member| bytes_eq(member.as_bytes(), key.as_bytes()))
}

/// Runs one invocation through the gate.
///
/// Tallies are written to `store`, which should be the invocation's
/// transaction so that a later failure discards the vote.
///
/// # Errors
///
/// Returns [`ContractError::UnauthorizedVoter`] or
/// [`ContractError::UnauthorizedPublisher`] (per [`Gate::role`]) if neither
/// the multisig account nor any roster member authorized the transaction,
/// or [`ContractError::Ballot`] if the tally cannot be updated.
pub fn cast_vote<S: KvStore + ?Sized>(
    store: &S,
    env: &Env<'_>,
    gate: &Gate<'_>,
    ballot: &BallotId,
) -> Result<VoteOutcome> {
    let required = gate.threshold.required(gate.roster.len());

    if !gate.notary_disabled {
        let committee = multisig_account(gate.roster, required);
        if !env.witness.check_account(&committee) {
            warn!(committee = %committee, role = ?gate.role, "Committee witness missing");
            return Err(gate.role.unauthorized());
        }
        return Ok(VoteOutcome::Accepted);
    }

    let Some(voter) = inner_ring_invoker(env, gate.roster) else {
        warn!(role = ?gate.role, roster = gate.roster.len(), "Invoker is not a roster member");
        return Err(gate.role.unauthorized());
    };

    let votes = QuorumVote::new(store);
    let count = votes.register(ballot, &voter).context(BallotSnafu)?;
    if !has_quorum(count, gate.roster.len(), gate.threshold) {
        debug!(ballot = %ballot, voter = %voter, votes = count, required, "Vote recorded");
        return Ok(VoteOutcome::Pending { votes: count, required });
    }

    votes.clear(ballot).context(BallotSnafu)?;
    info!(ballot = %ballot, votes = count, required, "Quorum reached");
    Ok(VoteOutcome::Accepted)
}
