//! Aura Tab Core Library
//!
//! This crate provides the core functionality for Aura Tab, including:
//! - Settings replication across execution contexts
//! - Cross-context request/response and broadcast messaging
//! - Time-driven theme resolution
//! - Clock derivations and the presentation reactor boundary
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      auratab-core                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  settings/     - Schema, snapshot, per-context manager      │
//! │  store/        - Persistent store adapters (memory, file)   │
//! │  bus/          - Message router between contexts            │
//! │  theme/        - Palette, resolution, dynamic ticker        │
//! │  context/      - Background, tab, and popup contexts        │
//! │  render/       - Surface boundary and reactors              │
//! │  clock.rs      - Pure clock math                            │
//! │  types/        - Shared type definitions                    │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The persistent store is the only resource shared across contexts;
//! each context owns a `SettingsManager` mirror of it and reacts to
//! change batches. Theme resolution is authoritative in the background
//! context and reaches tabs over the message bus.

pub mod bus;
pub mod clock;
pub mod context;
pub mod error;
pub mod render;
pub mod settings;
pub mod store;
pub mod theme;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

pub use bus::{BusHandle, MessageRouter};
pub use context::{BackgroundContext, PopupContext, PopupForm, TabContext};
pub use render::{ClockRenderer, MemorySurface, Surface, SurfaceElement, ThemeApplier};
pub use settings::{SettingsEvent, SettingsManager, SettingsSnapshot};
pub use store::{ChangeBatch, FileStore, KeyChange, MemoryStore, SettingsStore, StoreArea};
pub use theme::{resolve_theme, time_bucket, DynamicThemeTicker};
