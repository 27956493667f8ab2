//! # Recede Core
//!
//! The de-emphasis overlay and the host pieces it runs against.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                          Editor                            │
//! │  ┌──────────┐  ┌──────────────────────┐  ┌──────────────┐  │
//! │  │  Config  │  │ ModeToggle           │  │   EventBus   │  │
//! │  └────┬─────┘  │  └ OverlayController │  └──────▲───────┘  │
//! │       │        │     └ OverlayRegistry│         │ repaint  │
//! │       ▼        └──────────┬───────────┘         │          │
//! │  registry build           │ enable / disable    │          │
//! │                ┌──────────▼──────────────────────┴───────┐  │
//! │                │ Document (OverlayHost)                  │  │
//! │                │  TextBuffer · SyntaxParser · Highlight  │  │
//! │                │  State · OverlayState (snapshots)       │  │
//! │                └─────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the editing thread. The controller never owns buffer
//! state; each call receives the buffer it acts on.

pub mod command;
pub mod config;
pub mod document;
pub mod editor;
pub mod event;
pub mod mode;
pub mod overlay;

pub use command::{Command, CommandContext, CommandHandler, CommandRegistry};
pub use config::{Config, ConfigError};
pub use document::{Document, DocumentId, DocumentManager};
pub use editor::Editor;
pub use event::{EditorEvent, EventBus, EventHandler};
pub use mode::ModeToggle;
pub use overlay::{OverlayController, OverlayHost, OverlayState};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("No active document")]
    NoActiveDocument,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer error: {0}")]
    Buffer(#[from] recede_buffer::BufferError),

    #[error("Syntax error: {0}")]
    Syntax(#[from] recede_syntax::SyntaxError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command not found: {0}")]
    CommandNotFound(String),
}
