// SPDX-License-Identifier: MIT OR Apache-2.0

//! Automatic promotion and trust-level changes across alias groups.
//!
//! A base account always holds at least the highest trust level of any of its aliases. Aliases
//! are promoted by the same review the host applies to regular accounts, but judged against the
//! level of the group. Each alias level change moves the alias between the counter buckets of
//! its base and is then propagated to the base account, unless another alias still holds the
//! level the alias left.
//!
//! When aliases raise a base account, the level it held before is kept in its record. Demotions
//! never go below that level, and once no alias holds the base above it the record is cleared
//! again.
use tracing::{debug, trace, warn};

use crate::error::{AliasError, SyncError};
use crate::synchronizer::State;
use crate::traits::{AccountStore, PromotionCriteria, TrustLevelChanger};
use crate::{Account, AccountId, TrustLevel, TrustLevelCounters};

impl<S, H, C> State<S, H, C>
where
    S: AccountStore,
    H: TrustLevelChanger,
    C: PromotionCriteria,
{
    pub(crate) fn review(&mut self, id: AccountId) -> Result<bool, SyncError<S, H>> {
        let account = self.account(id)?;
        let record = self.record(id)?;
        let Some(base_id) = record.base_id else {
            return self.review_native(&account);
        };

        let base = self.account(base_id)?;
        if base.is_locked() {
            debug!(alias = %id, base = %base_id, "base account is locked, skip review");
            return Ok(false);
        }

        if base.trust_level >= self.config.review_ceiling {
            return Ok(false);
        }

        // The host may have changed the alias level directly, count it where it is now.
        let counted = record.counted_level.unwrap_or(account.trust_level);
        let synced = if counted != account.trust_level {
            self.move_alias(id, base_id, counted, account.trust_level)?;
            self.sync_base(base_id, Some(counted))?
        } else if account.trust_level > base.trust_level {
            self.sync_base(base_id, None)?
        } else {
            false
        };

        let base_level = self.account(base_id)?.trust_level;
        let level = account.trust_level.max(base_level);
        let promoted = self.review_at(&account, level)?;
        Ok(promoted || synced)
    }

    /// Review of a base account, exactly as the host would do it.
    fn review_native(&mut self, account: &Account) -> Result<bool, SyncError<S, H>> {
        if account.is_locked() || account.trust_level >= self.config.review_ceiling {
            return Ok(false);
        }

        self.review_at(account, account.trust_level)
    }

    /// Promote the account by one tier above `level` if it qualifies for it.
    fn review_at(
        &mut self,
        account: &Account,
        level: TrustLevel,
    ) -> Result<bool, SyncError<S, H>> {
        let Some(next) = level.next() else {
            return Ok(false);
        };

        if next > self.config.review_ceiling || !self.criteria.qualifies(account, next) {
            return Ok(false);
        }

        debug!(id = %account.id, %next, "account qualifies for promotion");
        self.change_trust_level(account.id, next)
    }

    pub(crate) fn change_trust_level(
        &mut self,
        id: AccountId,
        level: TrustLevel,
    ) -> Result<bool, SyncError<S, H>> {
        let account = self.account(id)?;
        let mut record = self.record(id)?;
        let Some(base_id) = record.base_id else {
            if !self.apply(id, level)? {
                return Ok(false);
            }

            // An explicit change of a raised base replaces the level it falls back to.
            if record.own_level.is_some() {
                record.own_level = (level < record.counters.max_level()).then_some(level);
                self.save_record(id, &record)?;
            }

            return Ok(true);
        };

        let previous = record.counted_level.unwrap_or(account.trust_level);
        if !self.apply(id, level)? {
            return Ok(false);
        }

        if previous == level {
            return Ok(true);
        }

        let counters = self.move_alias(id, base_id, previous, level)?;
        let remaining = counters.count(previous);
        if level < previous && remaining > 0 {
            debug!(
                alias = %id,
                base = %base_id,
                level = %previous,
                remaining,
                "level still held by other aliases, keep base account"
            );
            return Ok(true);
        }

        self.sync_base(base_id, Some(previous))?;
        Ok(true)
    }

    /// Move the contribution of an alias from one counter bucket of its base to another.
    fn move_alias(
        &mut self,
        alias: AccountId,
        base_id: AccountId,
        from: TrustLevel,
        to: TrustLevel,
    ) -> Result<TrustLevelCounters, SyncError<S, H>> {
        let mut base_record = self.record(base_id)?;
        if base_record.counters.count(from) == 0 {
            warn!(%alias, base = %base_id, level = %from, "alias was not counted at its level");
        }
        base_record.counters.decrement(from);
        base_record.counters.increment(to);
        self.save_record(base_id, &base_record)?;

        let mut alias_record = self.record(alias)?;
        alias_record.counted_level = Some(to);
        self.save_record(alias, &alias_record)?;

        trace!(%alias, base = %base_id, %from, %to, "moved alias");
        Ok(base_record.counters)
    }

    /// Bring a base account in line with the levels of its aliases.
    ///
    /// The base is raised whenever an alias holds a higher level. It is only lowered when the
    /// alias contribution at `retracted` was what held it up and no other alias holds that
    /// level anymore, and then never below the level it held before aliases raised it nor below
    /// any remaining alias.
    pub(crate) fn sync_base(
        &mut self,
        base_id: AccountId,
        retracted: Option<TrustLevel>,
    ) -> Result<bool, SyncError<S, H>> {
        let base = self.account(base_id)?;
        if base.is_locked() {
            debug!(base = %base_id, "base account is locked, skip sync");
            return Ok(false);
        }

        let mut record = self.record(base_id)?;
        let floor = record.counters.max_level();

        if floor > base.trust_level {
            if !self.apply(base_id, floor)? {
                return Ok(false);
            }

            if record.own_level.is_none() {
                record.own_level = Some(base.trust_level);
                self.save_record(base_id, &record)?;
            }

            return Ok(true);
        }

        let Some(retracted) = retracted else {
            return Ok(false);
        };

        if retracted < base.trust_level || record.counters.count(retracted) > 0 {
            return Ok(false);
        }

        // Aliases never raised this base, so none of them can hold it up either.
        let Some(own_level) = record.own_level else {
            return Ok(false);
        };

        let target = floor.max(own_level);
        if target >= base.trust_level {
            return Ok(false);
        }

        if !self.apply(base_id, target)? {
            return Ok(false);
        }

        if target == own_level {
            record.own_level = None;
            self.save_record(base_id, &record)?;
        }

        Ok(true)
    }

    /// Call into the host's native primitive.
    fn apply(&mut self, id: AccountId, level: TrustLevel) -> Result<bool, SyncError<S, H>> {
        let applied = self
            .host
            .change_trust_level(id, level)
            .map_err(AliasError::Host)?;

        if applied {
            debug!(%id, %level, "changed trust level");
        } else {
            debug!(%id, %level, "host declined trust level change");
        }

        Ok(applied)
    }
}
