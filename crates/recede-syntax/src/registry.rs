//! Language → overlay rule set registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::SyntaxError;
use crate::features::FeatureName;
use crate::language::LanguageId;
use crate::rules::{RuleSet, RuleSetBuilder, Style};
use crate::tables::{self, RuleTable};

/// Maps each language to its compiled overlay rule set.
///
/// Built once at startup and read-only afterwards; lookups are exact, a
/// language never falls back to a related one.
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    sets: HashMap<LanguageId, Arc<RuleSet>>,
}

impl OverlayRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles the built-in tables with the built-in language map.
    pub fn builtin() -> Result<Self, SyntaxError> {
        let tables = tables::overlay_tables();
        let mapping = tables::overlay_language_map()
            .into_iter()
            .filter_map(|(lang, name)| tables.iter().find(|t| t.name == name).map(|t| (lang, t)));
        Self::from_tables(mapping, &crate::OVERLAY_FEATURE.into(), &Style::deemphasis())
    }

    /// Compiles one rule set per `(language, table)` pair.
    ///
    /// All rules are tagged with `feature`; entries without a style get
    /// `default_style`. Fails on the first pattern that does not compile.
    pub fn from_tables<'a>(
        mapping: impl IntoIterator<Item = (LanguageId, &'a RuleTable)>,
        feature: &FeatureName,
        default_style: &Style,
    ) -> Result<Self, SyntaxError> {
        let mut registry = Self::new();
        for (language, table) in mapping {
            let rules = RuleSetBuilder::new(language)
                .feature(feature)
                .default_style(default_style.clone())
                .entries(table.entries.iter().cloned())
                .build()?;
            tracing::debug!(
                "Registered overlay '{}' for {} ({} rules)",
                table.name,
                language,
                rules.len()
            );
            registry.insert(language, Arc::new(rules));
        }
        Ok(registry)
    }

    /// Registers a rule set, replacing any previous one for the language.
    pub fn insert(&mut self, language: LanguageId, rules: Arc<RuleSet>) {
        self.sets.insert(language, rules);
    }

    /// Returns the overlay for `language`, if one is registered.
    pub fn lookup(&self, language: LanguageId) -> Option<Arc<RuleSet>> {
        self.sets.get(&language).cloned()
    }

    /// Registered languages, sorted.
    pub fn languages(&self) -> Vec<LanguageId> {
        let mut languages: Vec<_> = self.sets.keys().copied().collect();
        languages.sort();
        languages
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
