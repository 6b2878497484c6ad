// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use crate::{Account, AccountId, CustomFields, TrustLevel};

/// Read and write access to the host's account records.
pub trait AccountStore {
    type Error: Error;

    /// Get an account record.
    fn get_account(&self, id: AccountId) -> Result<Option<Account>, Self::Error>;

    /// Get the custom fields attached to an account, empty when there are none.
    fn custom_fields(&self, id: AccountId) -> Result<CustomFields, Self::Error>;

    /// Replace the custom fields attached to an account.
    ///
    /// Keys missing from `fields` are deleted.
    fn save_custom_fields(&mut self, id: AccountId, fields: CustomFields)
    -> Result<(), Self::Error>;

    /// Find all accounts carrying the given custom field value.
    ///
    /// Accounts are returned in the order in which the matching field was first created.
    fn find_by_custom_field(&self, name: &str, value: &str)
    -> Result<Vec<AccountId>, Self::Error>;
}

/// The host's native trust-level change primitive.
pub trait TrustLevelChanger {
    type Error: Error;

    /// Set the trust level of an account.
    ///
    /// Returns `false` when the host declined the change (for example because its own validation
    /// rejected it), `true` when the change was applied.
    fn change_trust_level(&mut self, id: AccountId, level: TrustLevel)
    -> Result<bool, Self::Error>;
}
