//! Settings replication
//!
//! This module provides:
//! - The compiled-in schema (defaults, key aliasing, normalization)
//! - `SettingsSnapshot` - the merged per-context view
//! - `SettingsManager` - the per-context source of truth that bridges to
//!   the persistent store and notifies local subscribers

pub mod schema;

mod manager;
mod snapshot;

pub use manager::{SettingsEvent, SettingsManager, Subscription};
pub use snapshot::SettingsSnapshot;
