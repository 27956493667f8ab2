//! The overlay controller.
//!
//! Enabling the overlay on a buffer:
//!
//! 1. checks that the buffer has highlight state, at least one parser and a
//!    registered overlay for its language (otherwise nothing happens);
//! 2. snapshots the live rule set and feature list, unless a snapshot exists;
//! 3. sets the live rule set to `snapshot ++ overlay`;
//! 4. puts the overlay feature at the front of the top feature tier;
//! 5. asks the host to recompute features and repaint.
//!
//! Disabling puts both snapshots back verbatim and clears them.
//!
//! Restoring is last-snapshot-wins: if something else replaced the buffer's
//! rules while the overlay was on, disabling discards that change.

use std::sync::Arc;

use recede_syntax::{FeatureList, FeatureName, LanguageId, OverlayRegistry, RuleSet, SyntaxParser};

/// What the controller needs from a host buffer.
pub trait OverlayHost {
    /// True if the buffer carries highlight state at all.
    fn has_highlight_state(&self) -> bool;

    /// Parsers currently attached to the buffer.
    fn active_parsers(&self) -> &[SyntaxParser];

    fn language_id(&self) -> Option<LanguageId>;

    fn rule_set(&self) -> Option<Arc<RuleSet>>;

    fn set_rule_set(&mut self, rules: Arc<RuleSet>);

    fn feature_list(&self) -> Option<Arc<FeatureList>>;

    fn set_feature_list(&mut self, features: Arc<FeatureList>);

    /// Re-derive the enabled features from the feature list.
    fn recompute_effective_features(&mut self);

    fn request_repaint(&mut self);

    fn overlay_state(&self) -> &OverlayState;

    fn overlay_state_mut(&mut self) -> &mut OverlayState;
}

/// Per-buffer overlay bookkeeping: the mode flag and the two snapshot slots.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    enabled: bool,
    saved_rules: Option<Arc<RuleSet>>,
    saved_features: Option<Arc<FeatureList>>,
}

impl OverlayState {
    /// The mode flag, as last set by the toggle.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True when both slots hold a snapshot, i.e. the overlay is applied.
    pub fn has_snapshot(&self) -> bool {
        self.saved_rules.is_some() && self.saved_features.is_some()
    }

    /// True when neither slot holds anything.
    pub fn is_clear(&self) -> bool {
        self.saved_rules.is_none() && self.saved_features.is_none()
    }

    pub fn saved_rules(&self) -> Option<&Arc<RuleSet>> {
        self.saved_rules.as_ref()
    }

    pub fn saved_features(&self) -> Option<&Arc<FeatureList>> {
        self.saved_features.as_ref()
    }

    /// Stores a snapshot unless a complete one is already held. Returns the
    /// snapshot in effect afterwards.
    fn snapshot(
        &mut self,
        rules: Arc<RuleSet>,
        features: Arc<FeatureList>,
    ) -> (Arc<RuleSet>, Arc<FeatureList>) {
        match (&self.saved_rules, &self.saved_features) {
            (Some(rules), Some(features)) => (rules.clone(), features.clone()),
            _ => {
                if !self.is_clear() {
                    tracing::warn!("Discarding half-written overlay snapshot");
                }
                self.saved_rules = Some(rules.clone());
                self.saved_features = Some(features.clone());
                (rules, features)
            }
        }
    }

    /// Clears both slots, returning the snapshot only if it was complete.
    fn take(&mut self) -> Option<(Arc<RuleSet>, Arc<FeatureList>)> {
        match (self.saved_rules.take(), self.saved_features.take()) {
            (Some(rules), Some(features)) => Some((rules, features)),
            (None, None) => None,
            _ => {
                tracing::warn!("Overlay snapshot incomplete, nothing restored");
                None
            }
        }
    }
}

/// Applies and removes the overlay on host buffers.
#[derive(Debug, Clone)]
pub struct OverlayController {
    registry: Arc<OverlayRegistry>,
    feature: FeatureName,
}

impl OverlayController {
    pub fn new(registry: Arc<OverlayRegistry>, feature: impl Into<FeatureName>) -> Self {
        Self {
            registry,
            feature: feature.into(),
        }
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    /// The feature name inserted into the top tier.
    pub fn feature(&self) -> &FeatureName {
        &self.feature
    }

    /// The overlay rules for `buffer`, if the buffer can take them.
    pub fn rules_available<H: OverlayHost + ?Sized>(&self, buffer: &H) -> Option<Arc<RuleSet>> {
        if !buffer.has_highlight_state() {
            tracing::debug!("Overlay skipped: buffer has no highlight state");
            return None;
        }
        if buffer.active_parsers().is_empty() {
            tracing::debug!("Overlay skipped: buffer has no parser");
            return None;
        }
        let language = buffer.language_id()?;
        let rules = self.registry.lookup(language);
        if rules.is_none() {
            tracing::debug!("Overlay skipped: no overlay registered for {}", language);
        }
        rules
    }

    /// Applies the overlay. Returns false, and leaves the buffer alone, when
    /// the buffer cannot take it.
    pub fn enable<H: OverlayHost + ?Sized>(&self, buffer: &mut H) -> bool {
        let Some(overlay) = self.rules_available(buffer) else {
            return false;
        };
        let (Some(rules), Some(features)) = (buffer.rule_set(), buffer.feature_list()) else {
            return false;
        };

        let (saved_rules, saved_features) = buffer.overlay_state_mut().snapshot(rules, features);

        buffer.set_rule_set(Arc::new(saved_rules.concat(&overlay)));
        buffer.set_feature_list(Arc::new(saved_features.with_top_priority(&self.feature)));
        buffer.recompute_effective_features();
        buffer.request_repaint();

        tracing::debug!(
            "Overlay enabled: {} base rules + {} overlay rules",
            saved_rules.len(),
            overlay.len()
        );
        true
    }

    /// Restores the snapshot taken by [`Self::enable`]. Returns false when
    /// there was nothing to restore.
    pub fn disable<H: OverlayHost + ?Sized>(&self, buffer: &mut H) -> bool {
        let restored = match buffer.overlay_state_mut().take() {
            Some((rules, features)) => {
                buffer.set_rule_set(rules);
                buffer.set_feature_list(features);
                true
            }
            None => false,
        };

        if buffer.has_highlight_state() {
            buffer.recompute_effective_features();
            buffer.request_repaint();
        }

        tracing::debug!("Overlay disabled (restored: {})", restored);
        restored
    }
}
