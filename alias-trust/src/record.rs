// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed alias state of an account and its encoding in the host's custom fields.
//!
//! The host stores arbitrary plugin state in a sparse string key-value bag attached to every
//! account. Aliasing uses two kinds of keys:
//!
//! - `alias_for`: id of the base account, only present on alias accounts.
//! - `alias_tl{N}_count`: number of linked aliases at trust level `N`, only present on base
//!   accounts and only for non-zero counts.
//! - `alias_counted_tl`: trust level bucket the alias is counted in on its base.
//! - `alias_own_tl`: trust level a base account held before its aliases raised it, only present
//!   while it is raised.
//!
//! All other keys belong to someone else and are left untouched.
use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::{AccountId, TrustLevel, TrustLevelCounters};

/// Key-value bag the host attaches to every account.
pub type CustomFields = BTreeMap<String, String>;

/// Custom field holding the base account id of an alias.
pub const ALIAS_FOR_FIELD: &str = "alias_for";

/// Custom field holding the counter bucket an alias contributes to.
pub const COUNTED_LEVEL_FIELD: &str = "alias_counted_tl";

/// Custom field holding the level a base account falls back to.
pub const OWN_LEVEL_FIELD: &str = "alias_own_tl";

/// Custom field holding the alias count at the given trust level.
pub fn counter_field(level: TrustLevel) -> String {
    format!("alias_tl{}_count", level.as_u8())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("custom field \"alias_for\" holds invalid account id \"{0}\"")]
    InvalidAccountId(String),

    #[error("custom field \"{field}\" holds invalid count \"{value}\"")]
    InvalidCounter { field: String, value: String },

    #[error("custom field \"{field}\" holds invalid trust level \"{value}\"")]
    InvalidTrustLevel { field: String, value: String },
}

/// Alias state of a single account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasRecord {
    /// Base account this account is an alias of.
    pub base_id: Option<AccountId>,

    /// Counter bucket of the base this alias is counted in.
    ///
    /// Follows every level change made through the synchronizer, so it can differ from the
    /// alias's stored level when the host changed it directly.
    pub counted_level: Option<TrustLevel>,

    /// Trust levels of the aliases linked to this account.
    pub counters: TrustLevelCounters,

    /// Level this base account held before aliases raised it.
    pub own_level: Option<TrustLevel>,
}

impl AliasRecord {
    pub fn is_alias(&self) -> bool {
        self.base_id.is_some()
    }

    pub fn from_custom_fields(fields: &CustomFields) -> Result<Self, RecordError> {
        let base_id = match fields.get(ALIAS_FOR_FIELD) {
            Some(value) => Some(
                value
                    .parse::<AccountId>()
                    .map_err(|_| RecordError::InvalidAccountId(value.to_owned()))?,
            ),
            None => None,
        };

        let counted_level = trust_level_field(fields, COUNTED_LEVEL_FIELD)?;
        let own_level = trust_level_field(fields, OWN_LEVEL_FIELD)?;

        let mut counters = TrustLevelCounters::new();
        for level in TrustLevel::ALL {
            let field = counter_field(level);
            let Some(value) = fields.get(&field) else {
                continue;
            };

            let count: i64 = value
                .trim()
                .parse()
                .map_err(|_| RecordError::InvalidCounter {
                    field: field.clone(),
                    value: value.to_owned(),
                })?;

            // Older plugin versions could drive counters below zero.
            if count < 0 {
                warn!(%field, count, "ignoring negative alias counter");
                continue;
            }

            counters.set(level, count as u64);
        }

        Ok(Self {
            base_id,
            counted_level,
            counters,
            own_level,
        })
    }

    /// Write this record into the given custom fields.
    ///
    /// Keys for absent values are deleted rather than set to an empty or zero value.
    pub fn write_custom_fields(&self, fields: &mut CustomFields) {
        match self.base_id {
            Some(base_id) => {
                fields.insert(ALIAS_FOR_FIELD.to_string(), base_id.to_string());
            }
            None => {
                fields.remove(ALIAS_FOR_FIELD);
            }
        }

        write_trust_level_field(fields, COUNTED_LEVEL_FIELD, self.counted_level);
        write_trust_level_field(fields, OWN_LEVEL_FIELD, self.own_level);

        for level in TrustLevel::ALL {
            let count = self.counters.count(level);
            if count == 0 {
                fields.remove(&counter_field(level));
            } else {
                fields.insert(counter_field(level), count.to_string());
            }
        }
    }
}

fn trust_level_field(
    fields: &CustomFields,
    field: &str,
) -> Result<Option<TrustLevel>, RecordError> {
    let Some(value) = fields.get(field) else {
        return Ok(None);
    };

    value
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|level| TrustLevel::try_from(level).ok())
        .map(Some)
        .ok_or_else(|| RecordError::InvalidTrustLevel {
            field: field.to_string(),
            value: value.to_owned(),
        })
}

fn write_trust_level_field(fields: &mut CustomFields, field: &str, level: Option<TrustLevel>) {
    match level {
        Some(level) => {
            fields.insert(field.to_string(), level.as_u8().to_string());
        }
        None => {
            fields.remove(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{AccountId, TrustLevel};

    use super::{AliasRecord, CustomFields, RecordError, counter_field};

    fn fields(pairs: &[(&str, &str)]) -> CustomFields {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn decode_alias_and_counters() {
        let record = AliasRecord::from_custom_fields(&fields(&[
            ("alias_for", "12"),
            ("alias_counted_tl", "3"),
            ("alias_tl3_count", "2"),
            ("alias_tl0_count", "0"),
            ("unrelated", "1"),
        ]))
        .unwrap();

        assert_eq!(record.base_id, Some(AccountId::new(12)));
        assert_eq!(record.counted_level, Some(TrustLevel::Regular));
        assert_eq!(record.own_level, None);
        assert_eq!(record.counters.count(TrustLevel::Regular), 2);
        assert_eq!(record.counters.count(TrustLevel::NewUser), 0);
        assert_eq!(record.counters.iter().count(), 1);
    }

    #[test]
    fn negative_counters_are_absent() {
        let record =
            AliasRecord::from_custom_fields(&fields(&[("alias_tl2_count", "-1")])).unwrap();
        assert!(record.counters.is_empty());
    }

    #[test]
    fn reject_malformed_fields() {
        assert_eq!(
            AliasRecord::from_custom_fields(&fields(&[("alias_for", "bob")])),
            Err(RecordError::InvalidAccountId("bob".to_string()))
        );
        assert_eq!(
            AliasRecord::from_custom_fields(&fields(&[("alias_tl1_count", "many")])),
            Err(RecordError::InvalidCounter {
                field: "alias_tl1_count".to_string(),
                value: "many".to_string(),
            })
        );
        assert_eq!(
            AliasRecord::from_custom_fields(&fields(&[("alias_own_tl", "7")])),
            Err(RecordError::InvalidTrustLevel {
                field: "alias_own_tl".to_string(),
                value: "7".to_string(),
            })
        );
    }

    #[test]
    fn encoding_stays_sparse() {
        let mut bag = fields(&[
            ("alias_for", "3"),
            ("alias_counted_tl", "2"),
            ("alias_tl4_count", "1"),
            ("test", "1"),
        ]);

        let mut record = AliasRecord::from_custom_fields(&bag).unwrap();
        record.base_id = None;
        record.counted_level = None;
        record.own_level = Some(TrustLevel::Basic);
        record.counters.decrement(TrustLevel::Leader);
        record.counters.increment(TrustLevel::Basic);
        record.write_custom_fields(&mut bag);

        assert_eq!(
            bag,
            fields(&[
                ("alias_own_tl", "1"),
                ("alias_tl1_count", "1"),
                ("test", "1")
            ])
        );
        assert_eq!(counter_field(TrustLevel::Member), "alias_tl2_count");
    }
}
