//! # Recede Syntax
//!
//! Highlight rules for tree-sitter buffers, and the overlay rule sets that
//! push low-information syntax into the background.
//!
//! ## Layers
//!
//! ```text
//! RuleEntry (pattern, style?) ──compile──▶ Rule ──▶ RuleSet (Arc, shared)
//!                                                     │
//! OverlayRegistry: LanguageId ──────────────────────▶ ┘
//!
//! HighlightState (per buffer): rules ++ overlay, tiered FeatureList, level
//! ```
//!
//! A `RuleSet` is compiled once per language and shared read-only between
//! every buffer of that language. Merging an overlay never edits a rule set;
//! it produces a new one whose rules are the concatenation of both.

pub mod features;
pub mod highlight;
pub mod language;
pub mod registry;
pub mod rules;
pub mod tables;

pub use features::{FeatureList, FeatureName};
pub use highlight::{HighlightSpan, HighlightState};
pub use language::{LanguageId, SyntaxParser};
pub use registry::OverlayRegistry;
pub use rules::{Rule, RuleEntry, RuleSet, RuleSetBuilder, Style, compile_rules};
pub use tables::RuleTable;

/// Name of the feature every overlay rule is tagged with.
pub const OVERLAY_FEATURE: &str = "recede";

/// Style applied to overlay entries that do not name one.
pub const DEEMPHASIS_STYLE: &str = "deemphasis";

/// Errors that can occur while building parsers or rule sets.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Parser error")]
    ParseError,

    #[error("Invalid pattern for {language}: {pattern}: {message}")]
    InvalidPattern {
        language: LanguageId,
        pattern: String,
        message: String,
    },
}
