// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flag limits shared by every account of an alias group.
//!
//! All bookkeeping is keyed by the base account, so an alias group behaves like a single
//! account towards the moderation system: a post can only be flagged once by the group and the
//! daily flag allowance is spent jointly.
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Identifier of a forum post.
pub type PostId = u64;

/// Day number the flag was raised on, as counted by the host (for example days since epoch).
pub type Day = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagOutcome {
    /// The flag was recorded against the group.
    Accepted,

    /// Another account of the group already flagged this post.
    AlreadyFlagged { by: AccountId },

    /// The group spent its daily allowance.
    LimitReached,
}

impl FlagOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FlagOutcome::Accepted)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FlagLedger {
    /// Account which flagged a post, per base account.
    flagged: BTreeMap<(AccountId, PostId), AccountId>,

    /// Flags raised per base account and day, only kept from the latest day on.
    daily: HashMap<(AccountId, Day), u32>,

    /// Latest day a flag was raised on.
    today: Day,
}

impl FlagLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        base: AccountId,
        flagger: AccountId,
        post: PostId,
        day: Day,
        limit: u32,
    ) -> FlagOutcome {
        if let Some(by) = self.flagged.get(&(base, post)) {
            return FlagOutcome::AlreadyFlagged { by: *by };
        }

        if day > self.today {
            self.today = day;
            self.daily.retain(|(_, spent_on), _| *spent_on >= day);
        }

        let spent = self.daily.entry((base, day)).or_default();
        if *spent >= limit {
            return FlagOutcome::LimitReached;
        }

        *spent += 1;
        self.flagged.insert((base, post), flagger);
        FlagOutcome::Accepted
    }

    pub(crate) fn flags_for(
        &self,
        base: AccountId,
        posts: &[PostId],
    ) -> BTreeMap<PostId, AccountId> {
        posts
            .iter()
            .filter_map(|post| {
                self.flagged
                    .get(&(base, *post))
                    .map(|flagger| (*post, *flagger))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::AccountId;

    use super::{FlagLedger, FlagOutcome};

    #[test]
    fn one_flag_per_post_and_group() {
        let mut ledger = FlagLedger::new();
        let (base, alias) = (AccountId::new(1), AccountId::new(2));

        assert!(ledger.record(base, alias, 100, 0, 20).is_accepted());
        assert_eq!(
            ledger.record(base, base, 100, 0, 20),
            FlagOutcome::AlreadyFlagged { by: alias }
        );

        // Other groups are unaffected.
        assert!(
            ledger
                .record(AccountId::new(3), AccountId::new(3), 100, 0, 20)
                .is_accepted()
        );
    }

    #[test]
    fn daily_allowance() {
        let mut ledger = FlagLedger::new();
        let base = AccountId::new(1);

        assert!(ledger.record(base, base, 1, 0, 2).is_accepted());
        assert!(ledger.record(base, base, 2, 0, 2).is_accepted());
        assert_eq!(ledger.record(base, base, 3, 0, 2), FlagOutcome::LimitReached);
        assert!(ledger.record(base, base, 3, 1, 2).is_accepted());

        let flags = ledger.flags_for(base, &[1, 3, 4]);
        assert_eq!(flags.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn past_days_are_forgotten() {
        let mut ledger = FlagLedger::new();
        let (base_1, base_2) = (AccountId::new(1), AccountId::new(2));

        assert!(ledger.record(base_1, base_1, 1, 3, 2).is_accepted());
        assert!(ledger.record(base_2, base_2, 1, 3, 2).is_accepted());
        assert_eq!(ledger.daily.len(), 2);

        assert!(ledger.record(base_1, base_1, 2, 4, 2).is_accepted());
        assert_eq!(ledger.daily.len(), 1);
        assert_eq!(ledger.daily.get(&(base_1, 4)), Some(&1));

        // Flags themselves are kept, a post is only flagged once per group.
        assert_eq!(
            ledger.record(base_2, base_2, 1, 4, 2),
            FlagOutcome::AlreadyFlagged { by: base_2 }
        );
    }
}
