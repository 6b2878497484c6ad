// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account aliasing for forum platforms.
//!
//! A base account can be linked to any number of alias accounts. All accounts of such an alias
//! group act with the trust level of the base account and share its moderation-flag limits,
//! while the base account keeps up with the highest trust level any of its aliases earned.
//!
//! ## Alias links and counters
//!
//! An alias is marked by an `alias_for` custom field holding the id of its base. Links are a
//! single hop: resolving an account returns its base, or the account itself. Each base keeps a
//! histogram of how many of its aliases hold each trust level (`alias_tl{N}_count`), which
//! allows to correctly decide whether the base may be demoted when an alias leaves a level or
//! is unlinked, regardless of the order in which that happens.
//!
//! ## Host capabilities
//!
//! The crate does not own the host's account model. Instead `AliasSynchronizer` is composed of
//! three capabilities the host provides:
//!
//! - `AccountStore`: account records and their custom fields.
//! - `TrustLevelChanger`: the host's unmodified trust-level change primitive.
//! - `PromotionCriteria`: the host's activity requirements per trust level.
//!
//! An in-memory `MemoryStore` implementing the first two is gated by the `memory` feature flag,
//! enabled by default.
//!
//! ```rust
//! # use std::convert::Infallible;
//! # use alias_trust::traits::PromotionCriteria;
//! # use alias_trust::{Account, AccountId, AliasSynchronizer, Config, MemoryStore, TrustLevel};
//! # struct NoPromotions;
//! # impl PromotionCriteria for NoPromotions {
//! #     fn qualifies(&self, _: &Account, _: TrustLevel) -> bool { false }
//! # }
//! # fn run() -> Result<(), alias_trust::AliasError<Infallible, Infallible>> {
//! let store = MemoryStore::new();
//! store.insert_account(Account::new(1, "casey"));
//! store.insert_account(Account::new(2, "casey_alt").with_trust_level(TrustLevel::Regular));
//!
//! let aliases = AliasSynchronizer::new(store.clone(), store, NoPromotions, Config::default());
//! aliases.link(AccountId::new(1), AccountId::new(2))?;
//!
//! // The base account caught up with its alias.
//! assert_eq!(aliases.trust_level(AccountId::new(1))?, TrustLevel::Regular);
//! assert_eq!(aliases.resolve(AccountId::new(2))?, AccountId::new(1));
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
mod account;
mod config;
mod counters;
mod error;
pub mod flags;
mod links;
#[cfg(feature = "memory")]
pub mod memory;
mod promotion;
mod reader;
pub mod record;
mod synchronizer;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;
mod trust_level;

pub use account::{Account, AccountId};
pub use config::Config;
pub use counters::TrustLevelCounters;
pub use error::{AliasError, LinkRejection, SyncError};
pub use flags::FlagOutcome;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use reader::UserCard;
pub use record::{AliasRecord, CustomFields, RecordError};
pub use synchronizer::AliasSynchronizer;
pub use trust_level::{TrustLevel, TrustLevelError};
