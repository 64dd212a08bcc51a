//! Broadcast hub for the panel event channel.
//!
//! Panels are not tracked individually. Each panel session subscribes to one
//! `tokio::sync::broadcast` channel and forwards whatever it receives.

use tokio::sync::broadcast;
use tracing::trace;

use super::messages::PanelEvent;

/// Capacity of the panel channel. Panels that fall behind skip events.
const PANEL_CAPACITY: usize = 256;

/// Fan-out point for events addressed to every connected panel.
#[derive(Debug, Clone)]
pub struct PanelHub {
    sender: broadcast::Sender<PanelEvent>,
}

impl PanelHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(PANEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe a panel session to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.sender.subscribe()
    }

    /// Deliver an event to every subscribed panel. Returns the number of
    /// panels it was queued for; zero panels is not an error.
    pub fn emit(&self, event: PanelEvent) -> usize {
        let name = event.name().to_string();
        let reached = self.sender.send(event).unwrap_or(0);
        trace!(event = %name, panels = reached, "panel event emitted");
        reached
    }

    /// Number of panel sessions currently subscribed.
    pub fn panel_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PanelHub {
    fn default() -> Self {
        Self::new()
    }
}
