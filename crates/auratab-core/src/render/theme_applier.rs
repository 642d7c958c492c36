//! Theme application with idempotence and fallback

use super::surface::Surface;
use crate::types::ResolvedTheme;
use std::sync::Arc;
use tracing::debug;

/// Applies resolved themes to a surface.
///
/// Applying the same resolved theme twice is a visual no-op - the last
/// applied theme is tracked and identical re-applications are skipped,
/// which keeps the periodic dynamic re-evaluation from churning the
/// page.
pub struct ThemeApplier {
    surface: Arc<dyn Surface>,
    last_applied: Option<ResolvedTheme>,
}

impl ThemeApplier {
    pub fn new(surface: Arc<dyn Surface>) -> ThemeApplier {
        ThemeApplier {
            surface,
            last_applied: None,
        }
    }

    pub fn apply(&mut self, theme: ResolvedTheme) {
        if self.last_applied.as_ref() == Some(&theme) {
            debug!(
                "theme '{}' already applied; skipping",
                theme.effective_theme
            );
            return;
        }
        self.surface.apply_theme(&theme);
        self.last_applied = Some(theme);
    }

    /// Safe readable theme used when resolution or delivery failed, so
    /// the page is never left blank.
    pub fn apply_fallback(&mut self) {
        self.apply(ResolvedTheme::fallback());
    }

    pub fn last_applied(&self) -> Option<&ResolvedTheme> {
        self.last_applied.as_ref()
    }
}
