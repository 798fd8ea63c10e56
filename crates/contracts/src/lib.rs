//! Inner Ring governance contracts.
//!
//! Three contracts share one storage layer and one governance gate:
//!
//! - [`Alphabet`] - committee candidate voting and GAS emission
//! - [`Audit`] - audit results published by Inner Ring nodes
//! - [`Reputation`] - Alphabet-approved peer trust values
//!
//! Contracts reach the ledger only through the oracles in [`host`]. Every
//! state-changing entry point runs in a
//! [`StoreTransaction`](innerring_state::StoreTransaction) that commits on
//! success and is dropped on error.

#![deny(unsafe_code)]

mod admin;
pub mod alphabet;
pub mod audit;
mod error;
pub mod governance;
pub mod host;
pub mod reputation;

pub use alphabet::{Alphabet, Emission};
pub use audit::Audit;
pub use error::{ContractError, Result};
pub use governance::{Gate, Role, VoteOutcome, cast_vote};
pub use host::{AssetLedger, Env, NetworkState, Witness, multisig_account, standard_account};
pub use reputation::Reputation;

/// Version shared by all contracts: `major * 1_000_000 + minor * 1_000 + patch`.
pub const VERSION: u32 = 1_000;
