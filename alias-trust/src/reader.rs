// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trust-level reads resolved through the alias link.
//!
//! The trust level stored on an alias account is only input for its base account. Everything
//! that surfaces a trust level, capability checks as well as serialized representations, reads
//! it from the base account instead.
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::synchronizer::State;
use crate::traits::{AccountStore, PromotionCriteria, TrustLevelChanger};
use crate::{AccountId, TrustLevel};

/// Public card representation of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCard {
    pub id: AccountId,
    pub username: String,
    pub trust_level: TrustLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_for: Option<AccountId>,
}

impl<S, H, C> State<S, H, C>
where
    S: AccountStore,
    H: TrustLevelChanger,
    C: PromotionCriteria,
{
    pub(crate) fn trust_level(&self, id: AccountId) -> Result<TrustLevel, SyncError<S, H>> {
        let base = self.resolve(id)?;
        Ok(self.account(base)?.trust_level)
    }

    pub(crate) fn has_trust_level(
        &self,
        id: AccountId,
        level: TrustLevel,
    ) -> Result<bool, SyncError<S, H>> {
        Ok(self.trust_level(id)? >= level)
    }

    pub(crate) fn user_card(&self, id: AccountId) -> Result<UserCard, SyncError<S, H>> {
        let account = self.account(id)?;
        let alias_for = self.record(id)?.base_id;
        let trust_level = self.trust_level(id)?;

        Ok(UserCard {
            id: account.id,
            username: account.username,
            trust_level,
            alias_for,
        })
    }
}
