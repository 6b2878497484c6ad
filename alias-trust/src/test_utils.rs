// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::record::counter_field;
use crate::traits::{AccountStore, PromotionCriteria, TrustLevelChanger};
use crate::{
    Account, AccountId, AliasSynchronizer, Config, CustomFields, MemoryStore, TrustLevel,
};

pub type TestSynchronizer = AliasSynchronizer<MemoryStore, TestHost, TestCriteria>;

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Criteria under which each account qualifies up to an explicitly granted level.
#[derive(Clone, Debug, Default)]
pub struct TestCriteria {
    qualified: Arc<RwLock<HashMap<AccountId, TrustLevel>>>,
}

impl TestCriteria {
    /// Let the account's activity qualify for all levels up to and including `level`.
    pub fn qualify(&self, id: AccountId, level: TrustLevel) {
        self.qualified
            .write()
            .expect("acquire write access on criteria")
            .insert(id, level);
    }
}

impl PromotionCriteria for TestCriteria {
    fn qualifies(&self, account: &Account, level: TrustLevel) -> bool {
        self.qualified
            .read()
            .expect("acquire read access on criteria")
            .get(&account.id)
            .is_some_and(|qualified| *qualified >= level)
    }
}

/// Host primitive backed by a `MemoryStore` which can be told to decline changes.
#[derive(Clone, Debug)]
pub struct TestHost {
    store: MemoryStore,
    declined: Arc<RwLock<HashSet<AccountId>>>,
}

impl TestHost {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            declined: Default::default(),
        }
    }

    /// Decline all further trust level changes of the account.
    pub fn decline(&self, id: AccountId) {
        self.declined
            .write()
            .expect("acquire write access on host")
            .insert(id);
    }
}

impl TrustLevelChanger for TestHost {
    type Error = <MemoryStore as TrustLevelChanger>::Error;

    fn change_trust_level(
        &mut self,
        id: AccountId,
        level: TrustLevel,
    ) -> Result<bool, Self::Error> {
        if self
            .declined
            .read()
            .expect("acquire read access on host")
            .contains(&id)
        {
            return Ok(false);
        }

        self.store.change_trust_level(id, level)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("writing custom fields of account {0} failed")]
pub struct WriteFailed(pub AccountId);

/// Account store backed by a `MemoryStore` which can be told to fail writes.
#[derive(Clone, Debug)]
pub struct FailingStore {
    store: MemoryStore,
    failing: Arc<RwLock<HashSet<AccountId>>>,
}

impl FailingStore {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            failing: Default::default(),
        }
    }

    /// Fail all further custom field writes of the account.
    pub fn fail_writes(&self, id: AccountId) {
        self.failing
            .write()
            .expect("acquire write access on store")
            .insert(id);
    }
}

impl AccountStore for FailingStore {
    type Error = WriteFailed;

    fn get_account(&self, id: AccountId) -> Result<Option<Account>, Self::Error> {
        Ok(self.store.account(id))
    }

    fn custom_fields(&self, id: AccountId) -> Result<CustomFields, Self::Error> {
        self.store.custom_fields(id).map_err(|err: Infallible| match err {})
    }

    fn save_custom_fields(
        &mut self,
        id: AccountId,
        fields: CustomFields,
    ) -> Result<(), Self::Error> {
        if self
            .failing
            .read()
            .expect("acquire read access on store")
            .contains(&id)
        {
            return Err(WriteFailed(id));
        }

        self.store
            .save_custom_fields(id, fields)
            .map_err(|err: Infallible| match err {})
    }

    fn find_by_custom_field(
        &self,
        name: &str,
        value: &str,
    ) -> Result<Vec<AccountId>, Self::Error> {
        self.store
            .find_by_custom_field(name, value)
            .map_err(|err: Infallible| match err {})
    }
}

/// A forum with accounts, wired up to an alias synchronizer.
#[derive(Clone, Debug)]
pub struct TestForum {
    pub store: MemoryStore,
    pub host: TestHost,
    pub criteria: TestCriteria,
    pub aliases: TestSynchronizer,
}

impl TestForum {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        setup_logging();

        let store = MemoryStore::new();
        let host = TestHost::new(store.clone());
        let criteria = TestCriteria::default();
        let aliases =
            AliasSynchronizer::new(store.clone(), host.clone(), criteria.clone(), config);

        Self {
            store,
            host,
            criteria,
            aliases,
        }
    }

    /// Register an account at the given trust level.
    ///
    /// The account's activity does not qualify for any level until `TestCriteria::qualify` is
    /// called for it.
    pub fn account(&self, id: u64, username: &str, level: TrustLevel) -> AccountId {
        let account = Account::new(id, username).with_trust_level(level);
        let id = account.id;
        self.store.insert_account(account);
        id
    }

    /// Trust level as stored on the account record itself.
    pub fn stored_level(&self, id: AccountId) -> TrustLevel {
        self.store
            .account(id)
            .expect("account exists in store")
            .trust_level
    }

    /// Raw alias counter field of a base account.
    pub fn counter_field(&self, base: AccountId, level: TrustLevel) -> Option<String> {
        self.store
            .custom_fields(base)
            .expect("infallible store")
            .get(&counter_field(level))
            .cloned()
    }
}

impl Default for TestForum {
    fn default() -> Self {
        Self::new()
    }
}
