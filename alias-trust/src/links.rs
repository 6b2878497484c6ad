// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alias links and the per-base counter bookkeeping which goes with them.
use tracing::{debug, trace, warn};

use crate::error::{AliasError, LinkRejection, SyncError};
use crate::record::{ALIAS_FOR_FIELD, AliasRecord};
use crate::synchronizer::State;
use crate::traits::{AccountStore, PromotionCriteria, TrustLevelChanger};
use crate::{Account, AccountId};

impl<S, H, C> State<S, H, C>
where
    S: AccountStore,
    H: TrustLevelChanger,
    C: PromotionCriteria,
{
    pub(crate) fn account(&self, id: AccountId) -> Result<Account, SyncError<S, H>> {
        self.store
            .get_account(id)
            .map_err(AliasError::Store)?
            .ok_or(AliasError::UnknownAccount(id))
    }

    pub(crate) fn record(&self, id: AccountId) -> Result<AliasRecord, SyncError<S, H>> {
        let fields = self.store.custom_fields(id).map_err(AliasError::Store)?;
        AliasRecord::from_custom_fields(&fields)
            .map_err(|source| AliasError::Record { id, source })
    }

    pub(crate) fn save_record(
        &mut self,
        id: AccountId,
        record: &AliasRecord,
    ) -> Result<(), SyncError<S, H>> {
        let mut fields = self.store.custom_fields(id).map_err(AliasError::Store)?;
        record.write_custom_fields(&mut fields);
        self.store
            .save_custom_fields(id, fields)
            .map_err(AliasError::Store)
    }

    pub(crate) fn resolve(&self, id: AccountId) -> Result<AccountId, SyncError<S, H>> {
        Ok(self.record(id)?.base_id.unwrap_or(id))
    }

    pub(crate) fn aliases_of(&self, id: AccountId) -> Result<Vec<AccountId>, SyncError<S, H>> {
        let base = self.resolve(id)?;
        self.store
            .find_by_custom_field(ALIAS_FOR_FIELD, &base.to_string())
            .map_err(AliasError::Store)
    }

    pub(crate) fn link(
        &mut self,
        base: AccountId,
        alias: AccountId,
    ) -> Result<bool, SyncError<S, H>> {
        let reject = |reason| AliasError::InvalidLinkTarget { alias, base, reason };

        if alias == base {
            return Err(reject(LinkRejection::SelfLink));
        }

        let alias_account = self.account(alias)?;
        self.account(base)?;

        let mut alias_record = self.record(alias)?;
        match alias_record.base_id {
            Some(linked) if linked == base => {
                debug!(%alias, %base, "accounts already linked");
                return Ok(false);
            }
            Some(linked) => return Err(reject(LinkRejection::AlreadyLinked(linked))),
            None => (),
        }

        let mut base_record = self.record(base)?;
        if base_record.is_alias() {
            return Err(reject(LinkRejection::ChainedLink));
        }

        // Count first, an alias must never be linked without being counted.
        let level = alias_account.trust_level;
        let count = base_record.counters.increment(level);
        self.save_record(base, &base_record)?;
        trace!(%base, %level, count, "counted alias");

        alias_record.base_id = Some(base);
        alias_record.counted_level = Some(level);
        if let Err(err) = self.save_record(alias, &alias_record) {
            base_record.counters.decrement(level);
            if self.save_record(base, &base_record).is_err() {
                warn!(%alias, %base, %level, "failed to retract alias count of failed link");
            }
            return Err(err);
        }

        debug!(%alias, %base, "linked alias");
        self.sync_base(base, None)?;
        Ok(true)
    }

    pub(crate) fn unlink(&mut self, alias: AccountId) -> Result<bool, SyncError<S, H>> {
        let mut alias_record = self.record(alias)?;
        let Some(base) = alias_record.base_id.take() else {
            debug!(%alias, "account is not an alias, nothing to unlink");
            return Ok(false);
        };

        // The contribution is retracted from the bucket the alias is counted in. Every level
        // change since linking has moved it there.
        let alias_account = self.account(alias)?;
        let retracted = alias_record
            .counted_level
            .take()
            .unwrap_or(alias_account.trust_level);

        let mut base_record = self.record(base)?;
        let counted = base_record.counters.count(retracted) > 0;
        if !counted {
            warn!(%alias, %base, level = %retracted, "alias was not counted at its level");
        }
        let count = base_record.counters.decrement(retracted);
        self.save_record(base, &base_record)?;
        trace!(%base, level = %retracted, count, "retracted alias");

        if let Err(err) = self.save_record(alias, &alias_record) {
            if counted {
                base_record.counters.increment(retracted);
            }
            if self.save_record(base, &base_record).is_err() {
                warn!(%alias, %base, level = %retracted, "failed to restore alias count");
            }
            return Err(err);
        }

        debug!(%alias, %base, "unlinked alias");
        self.sync_base(base, Some(retracted))?;
        Ok(true)
    }
}
