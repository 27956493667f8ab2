//! Languages and their tree-sitter parsers.
//!
//! Tree-sitter is written in C; the grammar crates expose their language as a
//! `LanguageFn` which converts into a `tree_sitter::Language`.

use std::fmt;
use std::path::Path;

use tree_sitter::{InputEdit, Language, Parser, Tree};

use crate::SyntaxError;

/// Languages with a bundled grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageId {
    Rust,
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Json,
}

impl LanguageId {
    pub const ALL: [LanguageId; 6] = [
        LanguageId::Rust,
        LanguageId::JavaScript,
        LanguageId::TypeScript,
        LanguageId::Tsx,
        LanguageId::Python,
        LanguageId::Json,
    ];

    /// Stable identifier used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::Rust => "rust",
            LanguageId::JavaScript => "javascript",
            LanguageId::TypeScript => "typescript",
            LanguageId::Tsx => "tsx",
            LanguageId::Python => "python",
            LanguageId::Json => "json",
        }
    }

    /// Looks up a language by its stable identifier. Exact match only.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.name() == name)
    }

    /// Detects language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "rs" => Some(LanguageId::Rust),
            "js" | "mjs" | "cjs" | "jsx" => Some(LanguageId::JavaScript),
            "ts" | "mts" | "cts" => Some(LanguageId::TypeScript),
            "tsx" => Some(LanguageId::Tsx),
            "py" | "pyi" => Some(LanguageId::Python),
            "json" => Some(LanguageId::Json),
            _ => None,
        }
    }

    /// Detects language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the tree-sitter grammar.
    pub fn grammar(&self) -> Language {
        match self {
            LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
            LanguageId::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            LanguageId::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
            LanguageId::Json => tree_sitter_json::LANGUAGE.into(),
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for LanguageId {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SyntaxError::UnknownLanguage(s.to_string()))
    }
}

/// A tree-sitter parser bound to one language, holding its latest tree.
pub struct SyntaxParser {
    parser: Parser,
    language: LanguageId,
    tree: Option<Tree>,
}

impl SyntaxParser {
    /// Creates a new parser for a language.
    pub fn new(language: LanguageId) -> Result<Self, SyntaxError> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.grammar())
            .map_err(|_| SyntaxError::ParseError)?;

        Ok(Self {
            parser,
            language,
            tree: None,
        })
    }

    /// Parses source code, reusing the previous tree when there is one.
    pub fn parse(&mut self, source: &str) -> Result<(), SyntaxError> {
        let tree = self
            .parser
            .parse(source, self.tree.as_ref())
            .ok_or(SyntaxError::ParseError)?;
        self.tree = Some(tree);
        Ok(())
    }

    /// Parses with an edit (for incremental updates).
    pub fn parse_with_edit(&mut self, source: &str, edit: InputEdit) -> Result<(), SyntaxError> {
        if let Some(tree) = &mut self.tree {
            tree.edit(&edit);
        }
        self.parse(source)
    }

    /// Returns the language this parser was created for.
    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Returns the latest syntax tree.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }
}

impl fmt::Debug for SyntaxParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxParser")
            .field("language", &self.language)
            .field("parsed", &self.tree.is_some())
            .finish()
    }
}
