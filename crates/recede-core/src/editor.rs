//! Editor facade.
//!
//! `Editor` ties configuration, open documents, the overlay toggle and the
//! event bus together. External code only talks to `Editor`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use recede_syntax::{FeatureList, HighlightSpan, LanguageId, RuleSet, tables};

use crate::config::Config;
use crate::document::{Document, DocumentId, DocumentManager};
use crate::event::{EditorEvent, EventBus};
use crate::mode::ModeToggle;
use crate::overlay::OverlayController;
use crate::{CoreError, CoreResult};

/// The main editor state.
///
/// `Editor` is owned by a single thread; overlay changes happen
/// synchronously and are announced on the event bus.
pub struct Editor {
    /// Document management
    documents: DocumentManager,

    /// Editor configuration
    config: Config,

    /// Overlay on/off per document
    mode: ModeToggle,

    /// Base highlighting rules, compiled once per language and shared
    base_rules: HashMap<LanguageId, Arc<RuleSet>>,

    /// Feature list new documents start with
    base_features: Arc<FeatureList>,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl Editor {
    /// Creates an editor with the default configuration.
    pub fn new() -> CoreResult<Self> {
        Self::with_config(Config::default())
    }

    /// Creates an editor with custom configuration.
    ///
    /// Fails if the overlay configuration does not compile.
    pub fn with_config(config: Config) -> CoreResult<Self> {
        let registry = config.overlay.build_registry()?;
        tracing::info!(
            "Overlay registered for {} languages",
            registry.languages().len()
        );

        let controller = OverlayController::new(Arc::new(registry), config.overlay.feature.as_str());
        let mode = ModeToggle::new(controller, config.overlay.lighter.clone());

        Ok(Self {
            documents: DocumentManager::new(),
            config,
            mode,
            base_rules: HashMap::new(),
            base_features: Arc::new(tables::base_feature_list()),
            event_bus: EventBus::new(),
        })
    }

    // ==================== Document Operations ====================

    /// Opens a file in a new document.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> CoreResult<DocumentId> {
        let path = path.as_ref();

        if let Some(id) = self.documents.find_by_path(path) {
            self.documents.set_active(id);
            return Ok(id);
        }

        let doc = Document::from_file(path)?;
        self.add_document(doc)
    }

    /// Opens a scratch document holding `text`.
    pub fn open_text(&mut self, text: &str, language: Option<LanguageId>) -> CoreResult<DocumentId> {
        self.add_document(Document::from_text(text, language))
    }

    fn add_document(&mut self, mut doc: Document) -> CoreResult<DocumentId> {
        doc.attach_events(self.event_bus.clone());

        if let Some(language) = doc.language() {
            let rules = self.base_rules_for(language)?;
            doc.enable_highlighting(rules, self.base_features.clone(), self.config.highlight.level)?;
        }
        if self.config.overlay.enable_by_default {
            self.mode.set(&mut doc, true);
        }

        let id = self.documents.add(doc);
        self.emit(EditorEvent::DocumentOpened(id));
        Ok(id)
    }

    fn base_rules_for(&mut self, language: LanguageId) -> CoreResult<Arc<RuleSet>> {
        if let Some(rules) = self.base_rules.get(&language) {
            return Ok(rules.clone());
        }
        let rules = tables::base_rules(language)?;
        self.base_rules.insert(language, rules.clone());
        Ok(rules)
    }

    /// Closes a document.
    pub fn close_document(&mut self, id: DocumentId) -> CoreResult<()> {
        self.documents.close(id)?;
        self.emit(EditorEvent::DocumentClosed(id));
        Ok(())
    }

    /// Returns the active document ID.
    pub fn active_document_id(&self) -> CoreResult<DocumentId> {
        self.documents.active_id().ok_or(CoreError::NoActiveDocument)
    }

    /// Returns a document by ID.
    pub fn document(&self, id: DocumentId) -> CoreResult<&Document> {
        self.documents.get(id).ok_or(CoreError::DocumentNotFound(id))
    }

    /// Returns a mutable document by ID.
    pub fn document_mut(&mut self, id: DocumentId) -> CoreResult<&mut Document> {
        self.documents.get_mut(id).ok_or(CoreError::DocumentNotFound(id))
    }

    /// Returns all open documents.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    // ==================== Overlay ====================

    /// Flips the overlay for a document. Returns the new mode state.
    pub fn toggle_overlay(&mut self, id: DocumentId) -> CoreResult<bool> {
        let doc = self.documents.get_mut(id).ok_or(CoreError::DocumentNotFound(id))?;
        let on = self.mode.toggle(doc);
        self.emit(EditorEvent::OverlayToggled { id, on });
        Ok(on)
    }

    /// Turns the overlay on or off for a document.
    pub fn set_overlay(&mut self, id: DocumentId, on: bool) -> CoreResult<bool> {
        let doc = self.documents.get_mut(id).ok_or(CoreError::DocumentNotFound(id))?;
        let on = self.mode.set(doc, on);
        self.emit(EditorEvent::OverlayToggled { id, on });
        Ok(on)
    }

    /// Status-line indicator for a document, if the overlay mode is on.
    pub fn status_label(&self, id: DocumentId) -> CoreResult<Option<&str>> {
        let doc = self.document(id)?;
        Ok(self.mode.status_label(doc))
    }

    pub fn mode(&self) -> &ModeToggle {
        &self.mode
    }

    // ==================== Highlighting ====================

    /// Changes the highlight level of a document.
    pub fn set_highlight_level(&mut self, id: DocumentId, level: usize) -> CoreResult<()> {
        if self.document_mut(id)?.set_highlight_level(level) {
            self.emit(EditorEvent::HighlightLevelChanged { id, level });
        }
        Ok(())
    }

    /// Highlights a document with its live rules.
    pub fn highlight_spans(&self, id: DocumentId) -> CoreResult<Vec<HighlightSpan>> {
        Ok(self.document(id)?.highlight_spans())
    }

    // ==================== Configuration ====================

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Events ====================

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }
}
