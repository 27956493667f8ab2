//! Event system for editor notifications.
//!
//! Uses `tokio::sync::broadcast`: events are values, subscribers receive
//! clones, and a lagging subscriber never blocks the sender. Overlay changes
//! are announced here so a renderer can repaint the affected document.

use crate::document::DocumentId;
use tokio::sync::broadcast;

/// Events that can occur in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A document was opened
    DocumentOpened(DocumentId),
    /// A document was closed
    DocumentClosed(DocumentId),
    /// A document's effective highlighting changed and needs repainting
    RepaintRequested(DocumentId),
    /// The overlay mode of a document was switched
    OverlayToggled { id: DocumentId, on: bool },
    /// A document's highlight level changed
    HighlightLevelChanged { id: DocumentId, level: usize },
    /// Configuration changed
    ConfigChanged,
}

/// Event bus for broadcasting editor events.
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        // Capacity of 256 events in the buffer
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: EditorEvent) {
        // Ignore error if no receivers (not a problem)
        let _ = self.sender.send(event);
    }

    /// Subscribes to events.
    ///
    /// Returns a receiver that will get all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}

/// Helper for processing events asynchronously.
///
/// ## Example
///
/// ```ignore
/// let mut handler = EventHandler::new(editor.subscribe());
///
/// tokio::spawn(async move {
///     while let Some(event) = handler.next().await {
///         if let EditorEvent::RepaintRequested(id) = event {
///             // Repaint the document
///         }
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<EditorEvent>,
}

impl EventHandler {
    /// Creates a new event handler.
    pub fn new(receiver: broadcast::Receiver<EditorEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(EditorEvent::ConfigChanged);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, EditorEvent::ConfigChanged);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        let id = DocumentId::new();

        bus.emit(EditorEvent::RepaintRequested(id));

        assert_eq!(rx1.recv().await.unwrap(), EditorEvent::RepaintRequested(id));
        assert_eq!(rx2.recv().await.unwrap(), EditorEvent::RepaintRequested(id));
    }

    #[tokio::test]
    async fn test_handler_skips_lag() {
        let bus = EventBus::new();
        let mut handler = EventHandler::new(bus.subscribe());

        for _ in 0..300 {
            bus.emit(EditorEvent::ConfigChanged);
        }

        assert_eq!(handler.next().await, Some(EditorEvent::ConfigChanged));
    }

    #[test]
    fn test_try_next_empty() {
        let bus = EventBus::new();
        let mut handler = EventHandler::new(bus.subscribe());
        assert_eq!(handler.try_next(), None);

        bus.emit(EditorEvent::ConfigChanged);
        assert_eq!(handler.try_next(), Some(EditorEvent::ConfigChanged));
    }
}
