// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::error::SyncError;
use crate::flags::{Day, FlagLedger, FlagOutcome, PostId};
use crate::reader::UserCard;
use crate::record::AliasRecord;
use crate::traits::{AccountStore, PromotionCriteria, TrustLevelChanger};
use crate::{AccountId, Config, TrustLevel};

/// Everything a synchronizer mutates, guarded by one lock.
#[derive(Debug)]
pub(crate) struct State<S, H, C> {
    pub(crate) store: S,
    pub(crate) host: H,
    pub(crate) criteria: C,
    pub(crate) config: Config,
    pub(crate) flags: FlagLedger,
}

/// Keeps base accounts in sync with the trust levels of their aliases.
///
/// The synchronizer wraps the host's capabilities: `S` persists account records and custom
/// fields, `H` is the host's native trust-level change primitive and `C` judges whether an
/// account's activity qualifies for a level.
///
/// Every public method takes the internal lock exactly once and runs to completion under it.
/// Multi-step sequences such as moving an alias between counter buckets and propagating the
/// outcome to the base account are therefore atomic with respect to each other. Clones share the
/// same state.
#[derive(Debug)]
pub struct AliasSynchronizer<S, H, C> {
    inner: Arc<Mutex<State<S, H, C>>>,
}

impl<S, H, C> Clone for AliasSynchronizer<S, H, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, H, C> AliasSynchronizer<S, H, C>
where
    S: AccountStore,
    H: TrustLevelChanger,
    C: PromotionCriteria,
{
    pub fn new(store: S, host: H, criteria: C, config: Config) -> Self {
        let state = State {
            store,
            host,
            criteria,
            config,
            flags: FlagLedger::new(),
        };

        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, State<S, H, C>> {
        self.inner
            .lock()
            .expect("acquire exclusive access on alias state")
    }

    pub fn config(&self) -> Config {
        self.state().config.clone()
    }

    /// Link `alias` to `base`.
    ///
    /// Returns `false` when the accounts were already linked. The base account is raised to the
    /// alias's trust level if it is lower.
    pub fn link(&self, base: AccountId, alias: AccountId) -> Result<bool, SyncError<S, H>> {
        self.state().link(base, alias)
    }

    /// Remove the link of an alias to its base.
    ///
    /// Returns `false` when the account was not an alias.
    pub fn unlink(&self, alias: AccountId) -> Result<bool, SyncError<S, H>> {
        self.state().unlink(alias)
    }

    /// Base account of an alias, or the account itself.
    pub fn resolve(&self, id: AccountId) -> Result<AccountId, SyncError<S, H>> {
        self.state().resolve(id)
    }

    /// All aliases of the account's base, in the order they were linked.
    pub fn aliases_of(&self, id: AccountId) -> Result<Vec<AccountId>, SyncError<S, H>> {
        self.state().aliases_of(id)
    }

    pub fn is_alias(&self, id: AccountId) -> Result<bool, SyncError<S, H>> {
        Ok(self.state().record(id)?.is_alias())
    }

    /// Typed alias state of an account as persisted in its custom fields.
    pub fn alias_record(&self, id: AccountId) -> Result<AliasRecord, SyncError<S, H>> {
        self.state().record(id)
    }

    /// Run an automatic promotion review, returns `true` if a promotion occurred.
    pub fn review(&self, id: AccountId) -> Result<bool, SyncError<S, H>> {
        self.state().review(id)
    }

    /// Change the trust level of an account, keeping its base account in sync.
    ///
    /// Returns `false` when the host declined the change.
    pub fn change_trust_level(
        &self,
        id: AccountId,
        level: TrustLevel,
    ) -> Result<bool, SyncError<S, H>> {
        self.state().change_trust_level(id, level)
    }

    /// Effective trust level of an account, read from its base account.
    pub fn trust_level(&self, id: AccountId) -> Result<TrustLevel, SyncError<S, H>> {
        self.state().trust_level(id)
    }

    /// Return `true` if the effective trust level of the account is at least `level`.
    pub fn has_trust_level(
        &self,
        id: AccountId,
        level: TrustLevel,
    ) -> Result<bool, SyncError<S, H>> {
        self.state().has_trust_level(id, level)
    }

    /// Public card representation of an account.
    pub fn user_card(&self, id: AccountId) -> Result<UserCard, SyncError<S, H>> {
        self.state().user_card(id)
    }

    /// Flag a post on behalf of an account, sharing limits with its whole alias group.
    pub fn flag(
        &self,
        id: AccountId,
        post: PostId,
        day: Day,
    ) -> Result<FlagOutcome, SyncError<S, H>> {
        let mut state = self.state();
        state.account(id)?;
        let base = state.resolve(id)?;
        let limit = state.config.max_flags_per_day;
        let outcome = state.flags.record(base, id, post, day, limit);
        debug!(%id, %base, post, ?outcome, "flag");
        Ok(outcome)
    }

    /// Which account of the group flagged each of the given posts.
    pub fn flags_for(
        &self,
        posts: &[PostId],
        id: AccountId,
    ) -> Result<BTreeMap<PostId, AccountId>, SyncError<S, H>> {
        let state = self.state();
        let base = state.resolve(id)?;
        Ok(state.flags.flags_for(base, posts))
    }
}
