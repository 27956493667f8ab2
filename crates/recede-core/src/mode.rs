//! The per-buffer on/off toggle for the overlay.

use crate::overlay::{OverlayController, OverlayHost};

/// Flips a buffer's overlay flag and applies or removes the overlay.
///
/// Turning the mode on for a buffer that cannot take the overlay still sets
/// the flag; the buffer's highlighting is simply left as it was.
#[derive(Debug, Clone)]
pub struct ModeToggle {
    controller: OverlayController,
    lighter: String,
}

impl ModeToggle {
    pub fn new(controller: OverlayController, lighter: impl Into<String>) -> Self {
        Self {
            controller,
            lighter: lighter.into(),
        }
    }

    pub fn controller(&self) -> &OverlayController {
        &self.controller
    }

    /// Flips the flag. Returns the new state.
    pub fn toggle<H: OverlayHost + ?Sized>(&self, buffer: &mut H) -> bool {
        let on = !buffer.overlay_state().is_enabled();
        self.set(buffer, on)
    }

    /// Sets the flag to `on` and enables or disables accordingly.
    ///
    /// Setting the current state again re-runs enable or disable, both of
    /// which are idempotent.
    pub fn set<H: OverlayHost + ?Sized>(&self, buffer: &mut H, on: bool) -> bool {
        buffer.overlay_state_mut().set_enabled(on);
        if on {
            self.controller.enable(buffer);
        } else {
            self.controller.disable(buffer);
        }
        on
    }

    pub fn is_on<H: OverlayHost + ?Sized>(&self, buffer: &H) -> bool {
        buffer.overlay_state().is_enabled()
    }

    /// Status-line indicator, shown while the mode is on.
    pub fn status_label<H: OverlayHost + ?Sized>(&self, buffer: &H) -> Option<&str> {
        self.is_on(buffer).then_some(self.lighter.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::tests::FakeBuffer;
    use recede_syntax::{LanguageId, OverlayRegistry, RuleSetBuilder};
    use std::sync::Arc;

    fn toggle() -> ModeToggle {
        let registry = OverlayRegistry::builtin().unwrap();
        ModeToggle::new(OverlayController::new(Arc::new(registry), "recede"), " Recede")
    }

    fn rust_buffer() -> FakeBuffer {
        let base = RuleSetBuilder::new(LanguageId::Rust)
            .feature("comment")
            .entry("(line_comment)", None)
            .build()
            .unwrap();
        FakeBuffer::new(LanguageId::Rust, base)
    }

    #[test]
    fn test_toggle_flips() {
        let mode = toggle();
        let mut buffer = rust_buffer();
        let rules = buffer.live_rules();

        assert!(mode.toggle(&mut buffer));
        assert!(mode.is_on(&buffer));
        assert!(buffer.live_rules().len() > rules.len());
        assert_eq!(mode.status_label(&buffer), Some(" Recede"));

        assert!(!mode.toggle(&mut buffer));
        assert!(!mode.is_on(&buffer));
        assert!(Arc::ptr_eq(&buffer.live_rules(), &rules));
        assert_eq!(mode.status_label(&buffer), None);
    }

    #[test]
    fn test_set_is_reentrant() {
        let mode = toggle();
        let mut buffer = rust_buffer();

        mode.set(&mut buffer, true);
        let merged = buffer.live_rules();
        mode.set(&mut buffer, true);
        assert_eq!(*buffer.live_rules(), *merged);

        mode.set(&mut buffer, false);
        let restored = buffer.live_rules();
        mode.set(&mut buffer, false);
        assert!(Arc::ptr_eq(&buffer.live_rules(), &restored));
    }

    #[test]
    fn test_flag_set_on_unsupported_buffer() {
        let mode = toggle();
        let base = RuleSetBuilder::new(LanguageId::Python)
            .entry("(comment)", None)
            .build()
            .unwrap();
        let mut buffer = FakeBuffer::new(LanguageId::Python, base);
        let rules = buffer.live_rules();

        assert!(mode.toggle(&mut buffer));
        assert!(mode.is_on(&buffer));
        assert!(Arc::ptr_eq(&buffer.live_rules(), &rules));
        assert!(buffer.overlay.is_clear());
    }
}
