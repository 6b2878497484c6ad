// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TrustLevel;

/// Unique identifier of a forum account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(u64);

impl AccountId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// The parts of a host account record this crate reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,

    pub username: String,

    /// Trust level as stored on this very record.
    ///
    /// For alias accounts this is only advisory input to the base account's level, use the
    /// synchronizer's reader methods to learn the effective level.
    pub trust_level: TrustLevel,

    /// Administrative override pinning the trust level. Automatic promotion and demotion are
    /// disabled while it is set.
    pub manual_locked_trust_level: Option<TrustLevel>,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, username: &str) -> Self {
        Self {
            id: id.into(),
            username: username.to_string(),
            trust_level: TrustLevel::default(),
            manual_locked_trust_level: None,
        }
    }

    pub fn with_trust_level(mut self, trust_level: TrustLevel) -> Self {
        self.trust_level = trust_level;
        self
    }

    /// Lock the account at the given level.
    pub fn locked_at(mut self, trust_level: TrustLevel) -> Self {
        self.trust_level = trust_level;
        self.manual_locked_trust_level = Some(trust_level);
        self
    }

    pub fn is_locked(&self) -> bool {
        self.manual_locked_trust_level.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Account, AccountId};
    use crate::TrustLevel;

    #[test]
    fn parse_account_id() {
        assert_eq!("42".parse::<AccountId>(), Ok(AccountId::new(42)));
        assert_eq!(" 7 ".parse::<AccountId>(), Ok(AccountId::new(7)));
        assert!("seven".parse::<AccountId>().is_err());
        assert!("-1".parse::<AccountId>().is_err());
        assert_eq!(AccountId::new(12).to_string(), "12");
    }

    #[test]
    fn locked_account() {
        let account = Account::new(1, "casey");
        assert!(!account.is_locked());
        assert_eq!(account.trust_level, TrustLevel::NewUser);

        let account = account.locked_at(TrustLevel::Basic);
        assert!(account.is_locked());
        assert_eq!(account.trust_level, TrustLevel::Basic);
    }
}
