// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Account, TrustLevel};

/// The host's activity requirements for each trust level.
pub trait PromotionCriteria {
    /// Return `true` if the account's own activity meets the requirements of `level`.
    fn qualifies(&self, account: &Account, level: TrustLevel) -> bool;
}
