//! Avatar evolution stage, derived from milestone count.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The evolution stage of a soulbound avatar.
///
/// A stage is never stored anywhere. It is always recomputed as a pure step
/// function of the account's current milestone count, so it can only move
/// backward if the milestone log itself shrinks (i.e. a reset).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AvatarStage {
    /// No milestones recorded yet.
    Beginning,
    /// First milestone recorded.
    OnWay,
    /// Two milestones recorded.
    Transforming,
    /// Three or more milestones recorded.
    Elite,
}

impl AvatarStage {
    /// Derive the stage from a milestone count.
    pub fn from_milestone_count(count: usize) -> Self {
        match count {
            0 => Self::Beginning,
            1 => Self::OnWay,
            2 => Self::Transforming,
            _ => Self::Elite,
        }
    }

    /// Numeric stage index as exposed by the contract (0–3).
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Beginning => 0,
            Self::OnWay => 1,
            Self::Transforming => 2,
            Self::Elite => 3,
        }
    }

    /// Reverse of [`AvatarStage::as_u8`]; indexes above 3 clamp to `Elite`.
    pub fn from_u8(index: u8) -> Self {
        match index {
            0 => Self::Beginning,
            1 => Self::OnWay,
            2 => Self::Transforming,
            _ => Self::Elite,
        }
    }
}

impl fmt::Display for AvatarStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Beginning => "beginning",
            Self::OnWay => "on-way",
            Self::Transforming => "transforming",
            Self::Elite => "elite",
        };
        write!(f, "{name}")
    }
}
