//! Per-buffer highlighting state and rule application.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use streaming_iterator::StreamingIterator;
use tree_sitter::{QueryCursor, Tree};

use crate::features::{FeatureList, FeatureName};
use crate::language::LanguageId;
use crate::rules::{RuleSet, Style};

/// A styled byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Start byte offset
    pub start: usize,
    /// End byte offset
    pub end: usize,
    /// Style of the rule that won this range
    pub style: Style,
    /// Feature of the rule that won this range
    pub feature: FeatureName,
}

/// The active rule set and feature list of one buffer.
///
/// Setters store the given `Arc` as-is. Callers that keep an `Arc` they got
/// from a getter can later put back the very same value.
#[derive(Debug, Clone)]
pub struct HighlightState {
    rules: Arc<RuleSet>,
    features: Arc<FeatureList>,
    level: usize,
    effective: HashSet<FeatureName>,
}

impl HighlightState {
    pub fn new(rules: Arc<RuleSet>, features: Arc<FeatureList>, level: usize) -> Self {
        let effective = features.effective(level);
        Self {
            rules,
            features,
            level,
            effective,
        }
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: Arc<RuleSet>) {
        self.rules = rules;
    }

    pub fn features(&self) -> &Arc<FeatureList> {
        &self.features
    }

    /// Replaces the feature list. Takes effect after [`Self::recompute_features`].
    pub fn set_features(&mut self, features: Arc<FeatureList>) {
        self.features = features;
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn set_level(&mut self, level: usize) {
        self.level = level;
        self.recompute_features();
    }

    /// Recomputes the enabled features from the feature list and level.
    pub fn recompute_features(&mut self) {
        self.effective = self.features.effective(self.level);
        tracing::trace!(
            "Effective features at level {}: {:?}",
            self.level,
            self.effective
        );
    }

    pub fn effective_features(&self) -> &HashSet<FeatureName> {
        &self.effective
    }

    pub fn is_feature_enabled(&self, feature: &FeatureName) -> bool {
        self.effective.contains(feature)
    }

    /// Applies every enabled rule of `language` to `tree`.
    ///
    /// Rules run in order; when two rules capture the same range the later
    /// one wins. Spans come back sorted by `(start, end)`.
    pub fn highlight(&self, language: LanguageId, tree: &Tree, source: &[u8]) -> Vec<HighlightSpan> {
        let mut styled: BTreeMap<(usize, usize), (Style, FeatureName)> = BTreeMap::new();
        let mut cursor = QueryCursor::new();

        let active = self
            .rules
            .iter()
            .filter(|rule| rule.language() == language && self.effective.contains(rule.feature()));

        for rule in active {
            let mut matches = cursor.matches(rule.query(), tree.root_node(), source);
            while let Some(query_match) = matches.next() {
                for capture in query_match.captures {
                    if capture.index != rule.capture_index() {
                        continue;
                    }
                    let (start, end) = (capture.node.start_byte(), capture.node.end_byte());
                    if start < end {
                        styled.insert(
                            (start, end),
                            (rule.style().clone(), rule.feature().clone()),
                        );
                    }
                }
            }
        }

        styled
            .into_iter()
            .map(|((start, end), (style, feature))| HighlightSpan {
                start,
                end,
                style,
                feature,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::SyntaxParser;
    use crate::rules::RuleSetBuilder;

    const SOURCE: &str = "import { a } from \"./a\";\n// note\nconst b = this.a;\n";

    fn parse(source: &str) -> Tree {
        let mut parser = SyntaxParser::new(LanguageId::TypeScript).unwrap();
        parser.parse(source).unwrap();
        parser.tree().unwrap().clone()
    }

    fn base() -> RuleSet {
        RuleSetBuilder::new(LanguageId::TypeScript)
            .feature("comment")
            .default_style("comment")
            .entry("(comment)", None)
            .build()
            .unwrap()
            .concat(
                &RuleSetBuilder::new(LanguageId::TypeScript)
                    .feature("keyword")
                    .default_style("keyword")
                    .entry(r#"["import" "from" "const"]"#, None)
                    .build()
                    .unwrap(),
            )
    }

    fn overlay() -> RuleSet {
        RuleSetBuilder::new(LanguageId::TypeScript)
            .entry(r#"["import" "from" "const"]"#, None)
            .entry("(this)", None)
            .build()
            .unwrap()
    }

    fn styles_of(spans: &[HighlightSpan], text: &str) -> Vec<String> {
        spans
            .iter()
            .filter(|s| &SOURCE[s.start..s.end] == text)
            .map(|s| s.style.to_string())
            .collect()
    }

    #[test]
    fn test_base_rules_apply() {
        let tree = parse(SOURCE);
        let state = HighlightState::new(
            Arc::new(base()),
            Arc::new(FeatureList::new([vec!["comment", "keyword"]])),
            1,
        );

        let spans = state.highlight(LanguageId::TypeScript, &tree, SOURCE.as_bytes());
        assert_eq!(styles_of(&spans, "import"), vec!["keyword"]);
        assert_eq!(styles_of(&spans, "// note"), vec!["comment"]);
        assert!(styles_of(&spans, "this").is_empty());
    }

    #[test]
    fn test_later_rules_override() {
        let tree = parse(SOURCE);
        let features = FeatureList::new([vec!["recede", "comment", "keyword"]]);
        let state = HighlightState::new(Arc::new(base().concat(&overlay())), Arc::new(features), 1);

        let spans = state.highlight(LanguageId::TypeScript, &tree, SOURCE.as_bytes());
        assert_eq!(styles_of(&spans, "import"), vec!["deemphasis"]);
        assert_eq!(styles_of(&spans, "const"), vec!["deemphasis"]);
        assert_eq!(styles_of(&spans, "this"), vec!["deemphasis"]);
        assert_eq!(styles_of(&spans, "// note"), vec!["comment"]);
    }

    #[test]
    fn test_disabled_feature_not_applied() {
        let tree = parse(SOURCE);
        let mut state = HighlightState::new(
            Arc::new(base().concat(&overlay())),
            Arc::new(FeatureList::new([vec!["comment", "keyword"], vec!["recede"]])),
            1,
        );

        let spans = state.highlight(LanguageId::TypeScript, &tree, SOURCE.as_bytes());
        assert_eq!(styles_of(&spans, "import"), vec!["keyword"]);

        state.set_level(2);
        let spans = state.highlight(LanguageId::TypeScript, &tree, SOURCE.as_bytes());
        assert_eq!(styles_of(&spans, "import"), vec!["deemphasis"]);
    }

    #[test]
    fn test_features_apply_after_recompute() {
        let mut state = HighlightState::new(
            Arc::new(base()),
            Arc::new(FeatureList::new([vec!["comment"]])),
            1,
        );
        let recede = FeatureName::new("recede");

        state.set_features(Arc::new(state.features().with_top_priority(&recede)));
        assert!(!state.is_feature_enabled(&recede));

        state.recompute_features();
        assert!(state.is_feature_enabled(&recede));
    }

    #[test]
    fn test_other_language_rules_skipped() {
        let tree = parse(SOURCE);
        let rust = RuleSetBuilder::new(LanguageId::Rust)
            .entry("\"{\"", None)
            .build()
            .unwrap();
        let state = HighlightState::new(
            Arc::new(rust),
            Arc::new(FeatureList::new([vec!["recede"]])),
            1,
        );

        assert!(
            state
                .highlight(LanguageId::TypeScript, &tree, SOURCE.as_bytes())
                .is_empty()
        );
    }

    #[test]
    fn test_spans_sorted() {
        let tree = parse(SOURCE);
        let state = HighlightState::new(
            Arc::new(overlay()),
            Arc::new(FeatureList::new([vec!["recede"]])),
            1,
        );

        let spans = state.highlight(LanguageId::TypeScript, &tree, SOURCE.as_bytes());
        assert!(spans.windows(2).all(|w| (w[0].start, w[0].end) < (w[1].start, w[1].end)));
    }
}
