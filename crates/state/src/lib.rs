//! Storage layer for Inner Ring governance contracts.
//!
//! This crate sits between the contract entry points and the ledger's flat
//! key-value namespace, providing:
//!
//! - Storage engines behind the [`KvStore`] trait (in-memory and redb)
//! - Write-buffering transactions so an invocation commits fully or not at all
//! - The composite key codec for epoch-scoped, prefix-scannable records
//! - A fixed-offset reader for audit result headers
//! - Quorum vote bookkeeping for multi-invocation ballots

#![deny(unsafe_code)]

pub mod audit_header;
mod engine;
pub mod keys;
mod transaction;
pub mod vote;

pub use audit_header::{AuditHeader, HeaderError, decode_audit_header, encode_audit_result};
pub use engine::{InMemoryStore, KvStore, RedbStore, StoreError, WriteOp};
pub use keys::{
    KeyError, KeyFilter, RecordKey, decode_epoch, decode_record_key, encode_epoch,
    encode_record_key, identity_prefix, list_keys, scan_prefix,
};
pub use transaction::StoreTransaction;
pub use vote::{BALLOT_PREFIX, BallotId, QuorumVote, Tally, VoteError, has_quorum};
