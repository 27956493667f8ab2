//! Command system for editor actions.
//!
//! Built-in commands are an enum (exhaustive, no allocation); extensions
//! register `CommandHandler` trait objects and are invoked through
//! `Command::Custom`.

use crate::CoreResult;
use crate::editor::Editor;
use std::collections::HashMap;

/// Built-in editor commands. All act on the active document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Command {
    ToggleOverlay,
    EnableOverlay,
    DisableOverlay,
    SetHighlightLevel { level: usize },

    // Custom command (name, arguments)
    Custom { name: String, args: Vec<String> },
}

impl Command {
    /// Returns the command's display name.
    pub fn display_name(&self) -> &str {
        match self {
            Command::ToggleOverlay => "Toggle Syntax De-emphasis",
            Command::EnableOverlay => "Enable Syntax De-emphasis",
            Command::DisableOverlay => "Disable Syntax De-emphasis",
            Command::SetHighlightLevel { .. } => "Set Highlight Level",
            Command::Custom { name, .. } => name,
        }
    }
}

/// Context passed to command execution.
pub struct CommandContext<'a> {
    pub editor: &'a mut Editor,
}

/// Trait for custom command handlers.
pub trait CommandHandler: Send + Sync {
    /// Returns the command name.
    fn name(&self) -> &str;

    /// Executes the command.
    fn execute(&self, ctx: &mut CommandContext, args: &[String]) -> CoreResult<()>;

    /// Returns a description for the command palette.
    fn description(&self) -> &str {
        self.name()
    }
}

/// Registry for commands.
pub struct CommandRegistry {
    /// Custom command handlers
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Creates a new registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a custom command handler.
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
        let name = handler.name().to_string();
        self.handlers.insert(name, handler);
    }

    /// Executes a command.
    pub fn execute(&self, cmd: &Command, editor: &mut Editor) -> CoreResult<()> {
        let mut ctx = CommandContext { editor };

        match cmd {
            Command::ToggleOverlay => {
                let id = ctx.editor.active_document_id()?;
                let on = ctx.editor.toggle_overlay(id)?;
                tracing::info!("Syntax de-emphasis {}", if on { "on" } else { "off" });
                Ok(())
            }
            Command::EnableOverlay => {
                let id = ctx.editor.active_document_id()?;
                ctx.editor.set_overlay(id, true).map(|_| ())
            }
            Command::DisableOverlay => {
                let id = ctx.editor.active_document_id()?;
                ctx.editor.set_overlay(id, false).map(|_| ())
            }
            Command::SetHighlightLevel { level } => {
                let id = ctx.editor.active_document_id()?;
                ctx.editor.set_highlight_level(id, *level)
            }

            // Custom commands
            Command::Custom { name, args } => {
                if let Some(handler) = self.handlers.get(name) {
                    handler.execute(&mut ctx, args)
                } else {
                    Err(crate::CoreError::CommandNotFound(name.clone()))
                }
            }
        }
    }

    /// Returns all registered command names.
    pub fn list(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use recede_syntax::LanguageId;

    struct OverlayOnAll;

    impl CommandHandler for OverlayOnAll {
        fn name(&self) -> &str {
            "overlay-on-all"
        }

        fn execute(&self, ctx: &mut CommandContext, _args: &[String]) -> CoreResult<()> {
            let ids: Vec<_> = ctx.editor.documents().map(|d| d.id()).collect();
            for id in ids {
                ctx.editor.set_overlay(id, true)?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_command_display_name() {
        assert_eq!(Command::ToggleOverlay.display_name(), "Toggle Syntax De-emphasis");
        assert_eq!(
            Command::Custom {
                name: "my_cmd".to_string(),
                args: vec![]
            }
            .display_name(),
            "my_cmd"
        );
    }

    #[test]
    fn test_toggle_acts_on_active_document() {
        let mut editor = Editor::new().unwrap();
        let id = editor.open_text("let a = 1;", Some(LanguageId::JavaScript)).unwrap();
        let registry = CommandRegistry::new();

        registry.execute(&Command::ToggleOverlay, &mut editor).unwrap();
        assert_eq!(editor.status_label(id).unwrap(), Some(" Recede"));

        registry.execute(&Command::DisableOverlay, &mut editor).unwrap();
        assert_eq!(editor.status_label(id).unwrap(), None);
    }

    #[test]
    fn test_no_active_document() {
        let mut editor = Editor::new().unwrap();
        let result = CommandRegistry::new().execute(&Command::ToggleOverlay, &mut editor);
        assert!(matches!(result, Err(CoreError::NoActiveDocument)));
    }

    #[test]
    fn test_custom_handler() {
        let mut editor = Editor::new().unwrap();
        let a = editor.open_text("{}", Some(LanguageId::Json)).unwrap();
        let b = editor.open_text("fn f() {}", Some(LanguageId::Rust)).unwrap();

        let mut registry = CommandRegistry::new();
        registry.register(Box::new(OverlayOnAll));
        assert_eq!(registry.list(), vec!["overlay-on-all"]);

        let cmd = Command::Custom {
            name: "overlay-on-all".to_string(),
            args: vec![],
        };
        registry.execute(&cmd, &mut editor).unwrap();

        assert!(editor.document(a).unwrap().overlay().has_snapshot());
        assert!(editor.document(b).unwrap().overlay().has_snapshot());

        let missing = Command::Custom {
            name: "nope".to_string(),
            args: vec![],
        };
        assert!(matches!(
            registry.execute(&missing, &mut editor),
            Err(CoreError::CommandNotFound(_))
        ));
    }
}
