// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

use crate::AccountId;
use crate::record::RecordError;
use crate::traits::{AccountStore, TrustLevelChanger};

/// Reasons for refusing to link two accounts.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LinkRejection {
    #[error("an account can not be an alias of itself")]
    SelfLink,

    #[error("account is already an alias of {0}")]
    AlreadyLinked(AccountId),

    #[error("base account is itself an alias")]
    ChainedLink,
}

#[derive(Debug, Error)]
pub enum AliasError<SE, HE> {
    #[error("can not link account {alias} to {base}: {reason}")]
    InvalidLinkTarget {
        alias: AccountId,
        base: AccountId,
        reason: LinkRejection,
    },

    #[error("account {0} not found")]
    UnknownAccount(AccountId),

    #[error("invalid alias record on account {id}: {source}")]
    Record {
        id: AccountId,
        #[source]
        source: RecordError,
    },

    #[error("account store error: {0}")]
    Store(SE),

    #[error("trust level change error: {0}")]
    Host(HE),
}

/// Error type of a synchronizer over store `S` and host `H`.
pub type SyncError<S, H> =
    AliasError<<S as AccountStore>::Error, <H as TrustLevelChanger>::Error>;
