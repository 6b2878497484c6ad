// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence for account records and their custom fields.
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::traits::{AccountStore, TrustLevelChanger};
use crate::{Account, AccountId, CustomFields, TrustLevel};

/// Position of a custom field in creation order.
type FieldSeq = u64;

#[derive(Clone, Debug, Default)]
pub struct InnerMemoryStore {
    accounts: HashMap<AccountId, Account>,
    custom_fields: HashMap<AccountId, BTreeMap<String, (FieldSeq, String)>>,
    next_field_seq: FieldSeq,
}

/// An in-memory store for host account records.
///
/// `MemoryStore` supports usage in multi-threaded contexts by wrapping an `InnerMemoryStore` with
/// an `RwLock` and `Arc`. Clones share the same records, which allows handing one clone to the
/// synchronizer as `AccountStore` and another as `TrustLevelChanger`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<InnerMemoryStore>>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain a read-lock on the store.
    pub fn read_store(&self) -> RwLockReadGuard<'_, InnerMemoryStore> {
        self.inner
            .read()
            .expect("acquire shared read access on store")
    }

    /// Obtain a write-lock on the store.
    pub fn write_store(&self) -> RwLockWriteGuard<'_, InnerMemoryStore> {
        self.inner
            .write()
            .expect("acquire exclusive write access on store")
    }

    /// Insert or replace an account record.
    pub fn insert_account(&self, account: Account) {
        self.write_store().accounts.insert(account.id, account);
    }

    /// Current account record, bypassing any alias resolution.
    pub fn account(&self, id: AccountId) -> Option<Account> {
        self.read_store().accounts.get(&id).cloned()
    }

    /// Set or lift the manual trust-level lock of an account.
    pub fn set_manual_lock(&self, id: AccountId, lock: Option<TrustLevel>) -> bool {
        match self.write_store().accounts.get_mut(&id) {
            Some(account) => {
                account.manual_locked_trust_level = lock;
                true
            }
            None => false,
        }
    }
}

impl AccountStore for MemoryStore {
    type Error = Infallible;

    fn get_account(&self, id: AccountId) -> Result<Option<Account>, Self::Error> {
        Ok(self.account(id))
    }

    fn custom_fields(&self, id: AccountId) -> Result<CustomFields, Self::Error> {
        let store = self.read_store();
        let fields = store
            .custom_fields
            .get(&id)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(key, (_, value))| (key.to_owned(), value.to_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(fields)
    }

    fn save_custom_fields(
        &mut self,
        id: AccountId,
        fields: CustomFields,
    ) -> Result<(), Self::Error> {
        let mut store = self.write_store();
        let InnerMemoryStore {
            custom_fields,
            next_field_seq,
            ..
        } = &mut *store;

        let previous = custom_fields.remove(&id).unwrap_or_default();
        let mut updated = BTreeMap::new();
        for (key, value) in fields {
            // Existing fields keep their position, updated in place.
            let seq = match previous.get(&key) {
                Some((seq, _)) => *seq,
                None => {
                    *next_field_seq += 1;
                    *next_field_seq
                }
            };
            updated.insert(key, (seq, value));
        }

        if !updated.is_empty() {
            custom_fields.insert(id, updated);
        }

        trace!(%id, "saved custom fields");
        Ok(())
    }

    fn find_by_custom_field(
        &self,
        name: &str,
        value: &str,
    ) -> Result<Vec<AccountId>, Self::Error> {
        let store = self.read_store();
        let mut matches: Vec<(FieldSeq, AccountId)> = store
            .custom_fields
            .iter()
            .filter_map(|(id, fields)| match fields.get(name) {
                Some((seq, stored)) if stored == value => Some((*seq, *id)),
                _ => None,
            })
            .collect();
        matches.sort();
        Ok(matches.into_iter().map(|(_, id)| id).collect())
    }
}

impl TrustLevelChanger for MemoryStore {
    type Error = Infallible;

    fn change_trust_level(
        &mut self,
        id: AccountId,
        level: TrustLevel,
    ) -> Result<bool, Self::Error> {
        match self.write_store().accounts.get_mut(&id) {
            Some(account) => {
                account.trust_level = level;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::traits::{AccountStore, TrustLevelChanger};
    use crate::{Account, AccountId, CustomFields, TrustLevel};

    use super::MemoryStore;

    fn bag(pairs: &[(&str, &str)]) -> CustomFields {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn custom_fields_round_trip() {
        let mut store = MemoryStore::new();
        let id = AccountId::new(1);

        assert!(store.custom_fields(id).unwrap().is_empty());

        store
            .save_custom_fields(id, bag(&[("alias_for", "2"), ("test", "1")]))
            .unwrap();
        assert_eq!(
            store.custom_fields(id).unwrap(),
            bag(&[("alias_for", "2"), ("test", "1")])
        );

        store.save_custom_fields(id, bag(&[("test", "1")])).unwrap();
        assert_eq!(store.custom_fields(id).unwrap(), bag(&[("test", "1")]));
    }

    #[test]
    fn find_in_creation_order() {
        let mut store = MemoryStore::new();
        let (a, b, c) = (AccountId::new(30), AccountId::new(10), AccountId::new(20));

        store.save_custom_fields(a, bag(&[("alias_for", "1")])).unwrap();
        store.save_custom_fields(b, bag(&[("alias_for", "9")])).unwrap();
        store.save_custom_fields(c, bag(&[("alias_for", "1")])).unwrap();
        assert_eq!(store.find_by_custom_field("alias_for", "1").unwrap(), vec![a, c]);

        // Deleting and re-creating the field moves the account to the end.
        store.save_custom_fields(a, CustomFields::new()).unwrap();
        store.save_custom_fields(a, bag(&[("alias_for", "1")])).unwrap();
        assert_eq!(store.find_by_custom_field("alias_for", "1").unwrap(), vec![c, a]);

        // Updating a value in place keeps the position of the original field.
        store.save_custom_fields(b, bag(&[("alias_for", "1")])).unwrap();
        assert_eq!(
            store.find_by_custom_field("alias_for", "1").unwrap(),
            vec![b, c, a]
        );
    }

    #[test]
    fn change_trust_level_of_known_accounts() {
        let mut store = MemoryStore::new();
        store.insert_account(Account::new(1, "casey"));

        assert!(
            store
                .change_trust_level(AccountId::new(1), TrustLevel::Member)
                .unwrap()
        );
        assert_eq!(
            store.account(AccountId::new(1)).unwrap().trust_level,
            TrustLevel::Member
        );

        assert!(
            !store
                .change_trust_level(AccountId::new(2), TrustLevel::Member)
                .unwrap()
        );
    }
}
