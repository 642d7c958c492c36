//! Presentation reactor boundary
//!
//! The DOM layer itself is out of scope; what lives here is the contract
//! the excluded layer implements (`Surface`) and the reactors that drive
//! it from resolved settings state. Reactors are pure consumers - the
//! only write path back into settings is explicit user interaction in
//! the popup.

mod clock_renderer;
mod surface;
mod theme_applier;

pub use clock_renderer::ClockRenderer;
pub use surface::{MemorySurface, Surface, SurfaceElement};
pub use theme_applier::ThemeApplier;
