//! Documents: the host buffers the overlay acts on.
//!
//! A `Document` owns its text, the parsers for its language and the
//! highlighting state the renderer reads. It implements [`OverlayHost`] so
//! the overlay controller can snapshot and replace that state.

use recede_buffer::{ByteEdit, TextBuffer};
use recede_syntax::{
    FeatureList, HighlightSpan, HighlightState, LanguageId, RuleSet, SyntaxParser,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::event::{EditorEvent, EventBus};
use crate::overlay::{OverlayHost, OverlayState};
use crate::{CoreError, CoreResult};

/// Unique identifier for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Creates a new unique document ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single file or scratch buffer.
pub struct Document {
    /// Unique identifier
    id: DocumentId,

    /// The underlying text buffer
    buffer: TextBuffer,

    /// Display name
    name: String,

    /// Document language (for parsing and highlighting)
    language: Option<LanguageId>,

    /// Parsers attached once highlighting is enabled
    parsers: Vec<SyntaxParser>,

    /// Active rules and features; None until highlighting is enabled
    highlight: Option<HighlightState>,

    /// Overlay mode flag and snapshots
    overlay: OverlayState,

    /// Set by `request_repaint`, cleared by `take_repaint`
    repaint_pending: bool,

    /// Where repaint requests are announced
    events: EventBus,
}

impl Document {
    /// Creates a document from text.
    pub fn from_text(text: &str, language: Option<LanguageId>) -> Self {
        Self {
            id: DocumentId::new(),
            buffer: TextBuffer::from(text),
            name: "Untitled".to_string(),
            language,
            parsers: Vec::new(),
            highlight: None,
            overlay: OverlayState::default(),
            repaint_pending: false,
            events: EventBus::new(),
        }
    }

    /// Opens a document from a file; the language comes from the extension.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let buffer = TextBuffer::from_file(path)?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
            .to_string();

        Ok(Self {
            id: DocumentId::new(),
            buffer,
            name,
            language: LanguageId::from_path(path),
            parsers: Vec::new(),
            highlight: None,
            overlay: OverlayState::default(),
            repaint_pending: false,
            events: EventBus::new(),
        })
    }

    /// Routes repaint requests to `events`.
    pub fn attach_events(&mut self, events: EventBus) {
        self.events = events;
    }

    /// Parses the text and installs the host highlighting state.
    ///
    /// Documents without a language stay unhighlighted.
    pub fn enable_highlighting(
        &mut self,
        rules: Arc<RuleSet>,
        features: Arc<FeatureList>,
        level: usize,
    ) -> CoreResult<()> {
        let Some(language) = self.language else {
            tracing::debug!("No language for {}, highlighting stays off", self.name);
            return Ok(());
        };

        let mut parser = SyntaxParser::new(language)?;
        parser.parse(&self.buffer.text())?;

        self.parsers = vec![parser];
        self.highlight = Some(HighlightState::new(rules, features, level));
        self.request_repaint();
        Ok(())
    }

    // ==================== Getters ====================

    /// Returns the document ID.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Returns the file path.
    pub fn path(&self) -> Option<&Path> {
        self.buffer.file_path()
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the detected language.
    pub fn language(&self) -> Option<LanguageId> {
        self.language
    }

    /// Returns the text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns all text.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.buffer.text()
    }

    /// Returns the highlighting state, if highlighting is on.
    pub fn highlight_state(&self) -> Option<&HighlightState> {
        self.highlight.as_ref()
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    /// Returns and clears the pending-repaint flag.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint_pending)
    }

    // ==================== Editing ====================

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> CoreResult<()> {
        let edit = self.buffer.insert(char_idx, text)?;
        self.reparse(edit)
    }

    /// Deletes a character range.
    pub fn delete(&mut self, range: std::ops::Range<usize>) -> CoreResult<()> {
        let edit = self.buffer.delete(range)?;
        self.reparse(edit)
    }

    fn reparse(&mut self, edit: ByteEdit) -> CoreResult<()> {
        if self.parsers.is_empty() || edit.is_empty() {
            return Ok(());
        }
        let text = self.buffer.text();
        for parser in &mut self.parsers {
            parser.parse_with_edit(&text, input_edit(&edit))?;
        }
        drop(text);
        self.request_repaint();
        Ok(())
    }

    // ==================== Highlighting ====================

    /// Changes how many feature tiers are enabled.
    pub fn set_highlight_level(&mut self, level: usize) -> bool {
        let Some(state) = &mut self.highlight else {
            return false;
        };
        state.set_level(level);
        self.request_repaint();
        true
    }

    /// Highlights the document with its live rules.
    pub fn highlight_spans(&self) -> Vec<HighlightSpan> {
        let (Some(state), Some(parser)) = (&self.highlight, self.parsers.first()) else {
            return Vec::new();
        };
        let Some(tree) = parser.tree() else {
            return Vec::new();
        };
        state.highlight(parser.language(), tree, self.buffer.text().as_bytes())
    }

    /// Returns the text covered by a span.
    pub fn span_text(&self, span: &HighlightSpan) -> CoreResult<String> {
        Ok(self.buffer.byte_slice(span.start..span.end)?)
    }
}

fn point(p: recede_buffer::Point) -> tree_sitter::Point {
    tree_sitter::Point {
        row: p.row,
        column: p.column,
    }
}

fn input_edit(edit: &ByteEdit) -> tree_sitter::InputEdit {
    tree_sitter::InputEdit {
        start_byte: edit.start_byte,
        old_end_byte: edit.old_end_byte,
        new_end_byte: edit.new_end_byte,
        start_position: point(edit.start_point),
        old_end_position: point(edit.old_end_point),
        new_end_position: point(edit.new_end_point),
    }
}

impl OverlayHost for Document {
    fn has_highlight_state(&self) -> bool {
        self.highlight.is_some()
    }

    fn active_parsers(&self) -> &[SyntaxParser] {
        &self.parsers
    }

    fn language_id(&self) -> Option<LanguageId> {
        self.language
    }

    fn rule_set(&self) -> Option<Arc<RuleSet>> {
        self.highlight.as_ref().map(|h| h.rules().clone())
    }

    fn set_rule_set(&mut self, rules: Arc<RuleSet>) {
        if let Some(state) = &mut self.highlight {
            state.set_rules(rules);
        }
    }

    fn feature_list(&self) -> Option<Arc<FeatureList>> {
        self.highlight.as_ref().map(|h| h.features().clone())
    }

    fn set_feature_list(&mut self, features: Arc<FeatureList>) {
        if let Some(state) = &mut self.highlight {
            state.set_features(features);
        }
    }

    fn recompute_effective_features(&mut self) {
        if let Some(state) = &mut self.highlight {
            state.recompute_features();
        }
    }

    fn request_repaint(&mut self) {
        self.repaint_pending = true;
        self.events.emit(EditorEvent::RepaintRequested(self.id));
    }

    fn overlay_state(&self) -> &OverlayState {
        &self.overlay
    }

    fn overlay_state_mut(&mut self) -> &mut OverlayState {
        &mut self.overlay
    }
}

/// Manages multiple open documents.
pub struct DocumentManager {
    /// All open documents
    documents: HashMap<DocumentId, Document>,

    /// Order of documents (for tabs)
    order: Vec<DocumentId>,

    /// Currently active document
    active: Option<DocumentId>,
}

impl DocumentManager {
    /// Creates a new document manager.
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            order: Vec::new(),
            active: None,
        }
    }

    /// Adds a document and makes it active.
    pub fn add(&mut self, doc: Document) -> DocumentId {
        let id = doc.id();
        self.documents.insert(id, doc);
        self.order.push(id);
        self.active = Some(id);
        id
    }

    /// Removes a document.
    pub fn close(&mut self, id: DocumentId) -> CoreResult<Document> {
        let doc = self
            .documents
            .remove(&id)
            .ok_or(CoreError::DocumentNotFound(id))?;
        self.order.retain(|&i| i != id);

        if self.active == Some(id) {
            self.active = self.order.last().copied();
        }

        Ok(doc)
    }

    /// Returns a document by ID.
    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Returns a mutable document by ID.
    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    /// Returns the active document ID.
    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    /// Sets the active document.
    pub fn set_active(&mut self, id: DocumentId) {
        if self.documents.contains_key(&id) {
            self.active = Some(id);
        }
    }

    /// Finds a document by path.
    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|(_, doc)| doc.path() == Some(path))
            .map(|(&id, _)| id)
    }

    /// Returns an iterator over all documents.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Returns the document order (for tabs).
    pub fn order(&self) -> &[DocumentId] {
        &self.order
    }

    /// Returns the number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no documents are open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Default for DocumentManager {
    fn default() -> Self {
        Self::new()
    }
}
