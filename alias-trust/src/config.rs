// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::TrustLevel;

const REVIEW_CEILING: TrustLevel = TrustLevel::Member;
const MAX_FLAGS_PER_DAY: u32 = 20;

/// Configuration parameters for the alias synchronizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Highest trust level automatic review promotes to. Accounts at or above it are only ever
    /// promoted manually.
    ///
    /// Default: `Member` (tier 2).
    pub(crate) review_ceiling: TrustLevel,

    /// Maximum number of flags an alias group may raise per day, shared by all accounts of the
    /// group.
    ///
    /// Default: 20.
    pub(crate) max_flags_per_day: u32,
}

impl Config {
    /// Return a default instance of `Config`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Define the highest trust level reachable through automatic review.
    pub fn review_ceiling(mut self, level: TrustLevel) -> Self {
        self.review_ceiling = level;
        self
    }

    /// Define the daily flag limit shared by an alias group.
    pub fn max_flags_per_day(mut self, limit: u32) -> Self {
        self.max_flags_per_day = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            review_ceiling: REVIEW_CEILING,
            max_flags_per_day: MAX_FLAGS_PER_DAY,
        }
    }
}
