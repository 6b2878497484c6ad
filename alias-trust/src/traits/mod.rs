// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capabilities the host platform exposes to the alias synchronizer.
mod criteria;
mod store;

pub use criteria::PromotionCriteria;
pub use store::{AccountStore, TrustLevelChanger};
