//! Highlight rules and rule sets.
//!
//! A rule pairs a tree-sitter pattern with a style. Patterns are written
//! without a capture; each one is compiled as `<pattern> @rule` so the whole
//! match is what gets styled.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tree_sitter::Query;

use crate::features::FeatureName;
use crate::language::LanguageId;
use crate::{DEEMPHASIS_STYLE, OVERLAY_FEATURE, SyntaxError};

/// Capture appended to every rule pattern.
const RULE_CAPTURE: &str = "rule";

/// A named visual style. Resolving it to colors is the renderer's job.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Style(Arc<str>);

impl Style {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The shared de-emphasis style.
    pub fn deemphasis() -> Self {
        Self::new(DEEMPHASIS_STYLE)
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Style({})", self.0)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Style {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Style {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// One uncompiled rule: a pattern and an optional style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl RuleEntry {
    /// An entry that inherits the default style.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            style: None,
        }
    }

    /// An entry with an explicit style.
    pub fn styled(pattern: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            style: Some(style.into()),
        }
    }
}

/// A compiled highlight rule.
pub struct Rule {
    pattern: String,
    style: Style,
    feature: FeatureName,
    language: LanguageId,
    query: Query,
    capture: u32,
}

impl Rule {
    /// Compiles a single pattern for a language.
    pub fn compile(
        language: LanguageId,
        feature: FeatureName,
        pattern: &str,
        style: Style,
    ) -> Result<Self, SyntaxError> {
        let invalid = |message: String| SyntaxError::InvalidPattern {
            language,
            pattern: pattern.to_string(),
            message,
        };

        let source = format!("{} @{}", pattern.trim(), RULE_CAPTURE);
        let query = Query::new(&language.grammar(), &source).map_err(|e| invalid(e.to_string()))?;

        if query.pattern_count() != 1 {
            return Err(invalid(format!(
                "expected one pattern, found {}",
                query.pattern_count()
            )));
        }
        let capture = query
            .capture_index_for_name(RULE_CAPTURE)
            .ok_or_else(|| invalid("pattern swallowed the rule capture".to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            style,
            feature,
            language,
            query,
            capture,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn feature(&self) -> &FeatureName {
        &self.feature
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Index of the capture that marks the styled node.
    pub fn capture_index(&self) -> u32 {
        self.capture
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("language", &self.language)
            .field("feature", &self.feature)
            .field("pattern", &self.pattern)
            .field("style", &self.style)
            .finish()
    }
}

/// An ordered, immutable sequence of rules.
///
/// Rules are reference counted so that concatenating two sets shares the
/// compiled queries instead of copying them. Equality is rule identity:
/// two sets are equal when they hold the very same rules in the same order.
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<Arc<Rule>>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Rule>> {
        self.rules.get(index)
    }

    /// Returns a new set holding `self`'s rules followed by `other`'s.
    pub fn concat(&self, other: &RuleSet) -> RuleSet {
        let mut rules = Vec::with_capacity(self.len() + other.len());
        rules.extend(self.rules.iter().cloned());
        rules.extend(other.rules.iter().cloned());
        Self { rules }
    }

    /// True if the first rules of `self` are exactly the rules of `prefix`.
    pub fn starts_with(&self, prefix: &RuleSet) -> bool {
        self.len() >= prefix.len() && same_rules(&self.rules[..prefix.len()], &prefix.rules)
    }

    /// True if the last rules of `self` are exactly the rules of `suffix`.
    pub fn ends_with(&self, suffix: &RuleSet) -> bool {
        self.len() >= suffix.len()
            && same_rules(&self.rules[self.len() - suffix.len()..], &suffix.rules)
    }

    /// Number of rules tagged with a feature.
    pub fn count_feature(&self, feature: &FeatureName) -> usize {
        self.rules.iter().filter(|r| r.feature() == feature).count()
    }
}

fn same_rules(a: &[Arc<Rule>], b: &[Arc<Rule>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        same_rules(&self.rules, &other.rules)
    }
}

impl Eq for RuleSet {}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

impl FromIterator<Arc<Rule>> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Arc<Rule>>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Builds a rule set from `(pattern, style?)` descriptors.
///
/// Entries without a style get the builder's default style, which starts out
/// as the de-emphasis style. Every rule is tagged with the same feature.
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    language: LanguageId,
    feature: FeatureName,
    default_style: Style,
    entries: Vec<RuleEntry>,
}

impl RuleSetBuilder {
    pub fn new(language: LanguageId) -> Self {
        Self {
            language,
            feature: FeatureName::new(OVERLAY_FEATURE),
            default_style: Style::deemphasis(),
            entries: Vec::new(),
        }
    }

    pub fn feature(mut self, feature: impl Into<FeatureName>) -> Self {
        self.feature = feature.into();
        self
    }

    pub fn default_style(mut self, style: impl Into<Style>) -> Self {
        self.default_style = style.into();
        self
    }

    pub fn entry(mut self, pattern: &str, style: Option<&str>) -> Self {
        self.entries.push(RuleEntry {
            pattern: pattern.to_string(),
            style: style.map(str::to_string),
        });
        self
    }

    pub fn entries(mut self, entries: impl IntoIterator<Item = RuleEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Compiles every entry; fails on the first pattern that does not compile.
    pub fn build(self) -> Result<RuleSet, SyntaxError> {
        let rules = self
            .entries
            .iter()
            .map(|entry| {
                let style = entry
                    .style
                    .as_deref()
                    .map(Style::new)
                    .unwrap_or_else(|| self.default_style.clone());
                Rule::compile(self.language, self.feature.clone(), &entry.pattern, style)
                    .map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Compiled {} {} rules for {}",
            rules.len(),
            self.feature,
            self.language
        );
        Ok(RuleSet { rules })
    }
}

/// Compiles `entries` for `language` into one rule set tagged with `feature`.
pub fn compile_rules(
    language: LanguageId,
    feature: impl Into<FeatureName>,
    entries: &[RuleEntry],
    default_style: impl Into<Style>,
) -> Result<RuleSet, SyntaxError> {
    RuleSetBuilder::new(language)
        .feature(feature)
        .default_style(default_style)
        .entries(entries.iter().cloned())
        .build()
}
