//! Fundamental types for the Becoming session library.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account addresses, timestamps, milestones, tip records, token
//! ids and derived avatar stages.

pub mod address;
pub mod milestone;
pub mod stage;
pub mod time;
pub mod tip;
pub mod token;

pub use address::AccountAddress;
pub use milestone::{is_proof_digest, Milestone, MilestoneError};
pub use stage::AvatarStage;
pub use time::{Clock, SystemClock, Timestamp};
pub use tip::TipRecord;
pub use token::TokenId;
