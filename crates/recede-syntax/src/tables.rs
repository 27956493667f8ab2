//! Built-in rule tables.
//!
//! Tables are plain data: a name and a list of `(pattern, style?)` entries.
//! They are compiled per language when a registry or a buffer's base
//! highlighting is built.

use std::sync::Arc;

use crate::SyntaxError;
use crate::features::FeatureList;
use crate::language::LanguageId;
use crate::rules::{RuleEntry, RuleSet, RuleSetBuilder};

/// A named, uncompiled list of rule entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    pub name: String,
    pub entries: Vec<RuleEntry>,
}

impl RuleTable {
    pub fn new(name: impl Into<String>, entries: Vec<RuleEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    fn from_patterns(name: &str, patterns: &[&str]) -> Self {
        Self::new(name, patterns.iter().copied().map(RuleEntry::new).collect())
    }
}

const JAVASCRIPT_OVERLAY: &[&str] = &[
    r#"["import" "export" "from" "as" "default"]"#,
    r#"["return" "if" "else" "for" "while" "do" "switch" "case" "break" "continue"]"#,
    r#"["const" "let" "var" "function" "class" "new" "async" "await" "extends"]"#,
    "(this)",
    "(super)",
    r#"["{" "}" "(" ")" "[" "]"]"#,
    r#"[";" "," "." ":"]"#,
];

const TYPESCRIPT_MODIFIERS: &[&str] = &[
    "(accessibility_modifier)",
    r#"["readonly" "abstract" "static"]"#,
    r#"["type" "interface" "implements"]"#,
];

const RUST_OVERLAY: &[&str] = &[
    r#"["use" "mod" "pub"]"#,
    r#"["fn" "let" "struct" "enum" "impl" "trait" "type" "where" "const" "static"]"#,
    r#"["return" "if" "else" "match" "for" "while" "loop" "break" "continue" "in" "as"]"#,
    "[(self) (crate) (super)]",
    "(mutable_specifier)",
    r#"["async" "await" "unsafe" "move" "ref" "dyn"]"#,
    r#"["{" "}" "(" ")" "[" "]"]"#,
    r#"[";" "," "." "::" ":" "->" "=>"]"#,
];

const JSON_OVERLAY: &[&str] = &[r#"["{" "}" "[" "]"]"#, r#"[":" ","]"#];

/// The built-in overlay tables.
pub fn overlay_tables() -> Vec<RuleTable> {
    let typescript: Vec<&str> = JAVASCRIPT_OVERLAY
        .iter()
        .chain(TYPESCRIPT_MODIFIERS)
        .copied()
        .collect();

    vec![
        RuleTable::from_patterns("javascript", JAVASCRIPT_OVERLAY),
        RuleTable::from_patterns("typescript", &typescript),
        RuleTable::from_patterns("rust", RUST_OVERLAY),
        RuleTable::from_patterns("json", JSON_OVERLAY),
    ]
}

/// Built-in mapping from language to overlay table name.
///
/// Python has a grammar but no overlay.
pub fn overlay_language_map() -> Vec<(LanguageId, &'static str)> {
    vec![
        (LanguageId::JavaScript, "javascript"),
        (LanguageId::TypeScript, "typescript"),
        (LanguageId::Tsx, "typescript"),
        (LanguageId::Rust, "rust"),
        (LanguageId::Json, "json"),
    ]
}

/// Base highlighting features, in tier order.
pub const BASE_FEATURES: [&str; 3] = ["comment", "string", "constant"];

/// Default feature list for base highlighting: one tier per base feature.
pub fn base_feature_list() -> FeatureList {
    FeatureList::new(BASE_FEATURES.map(|f| [f]))
}

/// Base highlighting patterns for a language, one group per base feature.
fn base_patterns(language: LanguageId) -> [&'static [&'static str]; 3] {
    match language {
        LanguageId::JavaScript | LanguageId::TypeScript | LanguageId::Tsx => [
            &["(comment)"],
            &["[(string) (template_string)]"],
            &["[(number) (true) (false) (null)]"],
        ],
        LanguageId::Rust => [
            &["[(line_comment) (block_comment)]"],
            &["[(string_literal) (raw_string_literal) (char_literal)]"],
            &["[(integer_literal) (float_literal) (boolean_literal)]"],
        ],
        LanguageId::Python => [
            &["(comment)"],
            &["(string)"],
            &["[(integer) (float) (true) (false) (none)]"],
        ],
        LanguageId::Json => [&[], &["(string)"], &["[(number) (true) (false) (null)]"]],
    }
}

/// Compiles the base highlighting of `language`.
///
/// Each base feature's rules use the feature name as their style.
pub fn base_rules(language: LanguageId) -> Result<Arc<RuleSet>, SyntaxError> {
    let mut rules = RuleSet::new();
    for (feature, patterns) in BASE_FEATURES.iter().zip(base_patterns(language)) {
        let set = patterns
            .iter()
            .fold(
                RuleSetBuilder::new(language)
                    .feature(*feature)
                    .default_style(*feature),
                |builder, pattern| builder.entry(pattern, None),
            )
            .build()?;
        rules = rules.concat(&set);
    }
    Ok(Arc::new(rules))
}
