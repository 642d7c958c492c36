//! Execution contexts
//!
//! The three independently-running parts of the system, each with its
//! own settings manager and lifecycle:
//! - `BackgroundContext` - authoritative theme resolver and broadcaster
//! - `TabContext` - renders a page, mirrors settings, applies themes
//! - `PopupContext` - the user-facing write path
//!
//! Each context runs a single event loop task: one inbound message or
//! settings event is processed to completion before the next, matching
//! the host's single-threaded execution model.

mod background;
mod popup;
mod tab;

pub use background::BackgroundContext;
pub use popup::{PopupContext, PopupForm};
pub use tab::TabContext;

use chrono::NaiveDateTime;
use std::sync::Arc;

/// Injectable wall clock, so contexts resolve themes and render clocks
/// at a controlled time under test.
#[derive(Clone)]
pub struct SharedClock(Arc<dyn Fn() -> NaiveDateTime + Send + Sync>);

impl SharedClock {
    pub fn new(clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> SharedClock {
        SharedClock(Arc::new(clock))
    }

    /// The real wall clock.
    pub fn system() -> SharedClock {
        SharedClock::new(|| chrono::Local::now().naive_local())
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.0.as_ref())()
    }
}
