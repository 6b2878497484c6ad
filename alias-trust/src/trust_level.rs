// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capability tiers granted to forum accounts by the host platform.
///
/// Trust levels are ordered such that "higher" levels include all capabilities of the "lower"
/// ones:
///
/// NewUser < Basic < Member < Regular < Leader
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum TrustLevel {
    /// Tier 0, freshly registered account.
    #[default]
    NewUser,

    /// Tier 1.
    Basic,

    /// Tier 2, the highest tier reachable through automatic review.
    Member,

    /// Tier 3.
    Regular,

    /// Tier 4, only ever granted by administrators.
    Leader,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrustLevelError {
    #[error("trust level {0} is out of range, expected 0 to 4")]
    OutOfRange(u8),
}

impl TrustLevel {
    /// All trust levels in ascending order.
    pub const ALL: [TrustLevel; 5] = [
        TrustLevel::NewUser,
        TrustLevel::Basic,
        TrustLevel::Member,
        TrustLevel::Regular,
        TrustLevel::Leader,
    ];

    /// Numeric tier of this level.
    pub fn as_u8(&self) -> u8 {
        match self {
            TrustLevel::NewUser => 0,
            TrustLevel::Basic => 1,
            TrustLevel::Member => 2,
            TrustLevel::Regular => 3,
            TrustLevel::Leader => 4,
        }
    }

    /// The tier directly above this one, `None` for `Leader`.
    pub fn next(&self) -> Option<TrustLevel> {
        TrustLevel::try_from(self.as_u8() + 1).ok()
    }
}

impl TryFrom<u8> for TrustLevel {
    type Error = TrustLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TrustLevel::NewUser),
            1 => Ok(TrustLevel::Basic),
            2 => Ok(TrustLevel::Member),
            3 => Ok(TrustLevel::Regular),
            4 => Ok(TrustLevel::Leader),
            _ => Err(TrustLevelError::OutOfRange(value)),
        }
    }
}

impl From<TrustLevel> for u8 {
    fn from(level: TrustLevel) -> Self {
        level.as_u8()
    }
}

impl Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tl{}", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::{TrustLevel, TrustLevelError};

    #[test]
    fn ordered_tiers() {
        assert!(TrustLevel::NewUser < TrustLevel::Basic);
        assert!(TrustLevel::Member < TrustLevel::Regular);
        assert!(TrustLevel::Regular < TrustLevel::Leader);
        assert_eq!(TrustLevel::ALL.iter().max(), Some(&TrustLevel::Leader));
    }

    #[test]
    fn next_tier() {
        assert_eq!(TrustLevel::NewUser.next(), Some(TrustLevel::Basic));
        assert_eq!(TrustLevel::Regular.next(), Some(TrustLevel::Leader));
        assert_eq!(TrustLevel::Leader.next(), None);
    }

    #[test]
    fn numeric_conversion() {
        assert_eq!(TrustLevel::try_from(2), Ok(TrustLevel::Member));
        assert_eq!(TrustLevel::try_from(5), Err(TrustLevelError::OutOfRange(5)));
        assert_eq!(u8::from(TrustLevel::Leader), 4);
        assert_eq!(TrustLevel::Basic.to_string(), "tl1");
    }

    #[test]
    fn serde_as_number() {
        let json = serde_json::to_string(&TrustLevel::Regular).unwrap();
        assert_eq!(json, "3");

        let level: TrustLevel = serde_json::from_str("1").unwrap();
        assert_eq!(level, TrustLevel::Basic);

        assert!(serde_json::from_str::<TrustLevel>("7").is_err());
    }
}
