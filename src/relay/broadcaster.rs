//! Relay Broadcaster: routes panel requests to game clients and client
//! telemetry back to panels.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::clients::ClientRegistry;
use super::messages::{ClientCommand, ClientReport, PanelEvent, PanelRequest, RelayError};
use super::panels::PanelHub;

/// What the relay did with one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Forwarded; holds the number of receivers it was queued for.
    Forwarded(usize),
    /// Accepted without forwarding (handshake).
    Acknowledged,
    /// Nothing matched; dropped silently.
    Ignored,
}

/// Shared relay core. Owns the live client set and the panel hub.
#[derive(Debug, Default)]
pub struct Relay {
    clients: ClientRegistry,
    panels: PanelHub,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn panels(&self) -> &PanelHub {
        &self.panels
    }

    /// Serialize `command` once and queue it for every client live at call
    /// time. Returns how many clients it was queued for.
    pub async fn fanout_to_clients(&self, command: &ClientCommand) -> Result<usize, RelayError> {
        let text = command.to_json()?;
        Ok(self.clients.send_all(&text).await)
    }

    /// Emit `payload` under `event` to every connected panel.
    pub fn fanout_to_panels(&self, event: &str, payload: Value) -> usize {
        self.panels.emit(PanelEvent::new(event, payload))
    }

    /// Handle a request decoded from a panel frame.
    pub async fn handle_panel_request(&self, request: PanelRequest) -> Outcome {
        match request {
            PanelRequest::Effect(effect) => {
                info!(
                    effect = %effect,
                    "requested effect, transmitting to Kerbal Space Program"
                );
                match self.fanout_to_clients(&ClientCommand::effect(effect)).await {
                    Ok(n) => Outcome::Forwarded(n),
                    Err(e) => {
                        warn!("effect not transmitted: {e}");
                        Outcome::Ignored
                    }
                }
            }
            PanelRequest::InvalidEffect(payload) => {
                warn!(%payload, "effect event without an effect identifier");
                Outcome::Ignored
            }
            PanelRequest::Unhandled(name) => {
                debug!(event = %name, "unhandled panel event");
                Outcome::Ignored
            }
        }
    }

    /// Decode and route one client text frame.
    ///
    /// A malformed frame returns the error and leaves the relay untouched;
    /// the caller logs it and keeps the connection.
    pub async fn handle_client_text(&self, text: &str) -> Result<Outcome, RelayError> {
        let outcome = match ClientReport::decode(text)? {
            ClientReport::Power(power) => {
                Outcome::Forwarded(self.panels.emit(PanelEvent::power(power)))
            }
            ClientReport::Hello => {
                info!("Kerbal Space Program says hello");
                Outcome::Acknowledged
            }
            ClientReport::Unknown { kind } => {
                debug!(kind = kind.as_deref().unwrap_or("<none>"), "ignored client message");
                Outcome::Ignored
            }
        };
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn effect_reaches_both_clients_verbatim() {
        let relay = Relay::new();
        let (_a, mut rx_a) = relay.clients().connect().await;
        let (_b, mut rx_b) = relay.clients().connect().await;

        let outcome = relay
            .handle_panel_request(PanelRequest::Effect("explode".into()))
            .await;
        assert_eq!(outcome, Outcome::Forwarded(2));

        let expected = r#"{"type":"effect","effect":"explode"}"#;
        assert_eq!(&*rx_a.recv().await.unwrap(), expected);
        assert_eq!(&*rx_b.recv().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn effect_with_no_clients_completes() {
        let relay = Relay::new();
        let outcome = relay
            .handle_panel_request(PanelRequest::Effect("explode".into()))
            .await;
        assert_eq!(outcome, Outcome::Forwarded(0));
    }

    #[tokio::test]
    async fn power_goes_to_every_panel() {
        let relay = Relay::new();
        let mut p1 = relay.panels().subscribe();
        let mut p2 = relay.panels().subscribe();

        let outcome = relay
            .handle_client_text(r#"{"type":"power","power":42}"#)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Forwarded(2));

        for rx in [&mut p1, &mut p2] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.name(), "power");
            assert_eq!(event.payload(), &json!(42));
        }
    }

    #[tokio::test]
    async fn hello_is_not_forwarded() {
        let relay = Relay::new();
        let mut panel = relay.panels().subscribe();

        let outcome = relay.handle_client_text(r#"{"type":"hello"}"#).await.unwrap();
        assert_eq!(outcome, Outcome::Acknowledged);
        assert!(panel.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_type_is_ignored() {
        let relay = Relay::new();
        let mut panel = relay.panels().subscribe();
        let (_id, mut client) = relay.clients().connect().await;

        let outcome = relay
            .handle_client_text(r#"{"type":"unknown","x":1}"#)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);
        assert!(panel.try_recv().is_err());
        assert!(client.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_text_is_reported_not_forwarded() {
        let relay = Relay::new();
        let mut panel = relay.panels().subscribe();

        let err = relay.handle_client_text("{{{").await.unwrap_err();
        assert!(matches!(err, RelayError::Parse(_)));
        assert!(panel.try_recv().is_err());
    }

    #[tokio::test]
    async fn client_reports_never_loop_back_to_clients() {
        let relay = Relay::new();
        let (_id, mut client) = relay.clients().connect().await;
        relay
            .handle_client_text(r#"{"type":"power","power":1}"#)
            .await
            .unwrap();
        assert!(client.try_recv().is_err());
    }

    #[tokio::test]
    async fn fanout_to_panels_passes_payload_through() {
        let relay = Relay::new();
        let mut panel = relay.panels().subscribe();
        assert_eq!(relay.fanout_to_panels("status", json!({"ok": true})), 1);
        let event = panel.recv().await.unwrap();
        assert_eq!(event, PanelEvent::new("status", json!({"ok": true})));
    }

    #[tokio::test]
    async fn disconnected_client_is_skipped_by_fanout() {
        let relay = Relay::new();
        let (gone, _rx_gone) = relay.clients().connect().await;
        let (_stay, mut rx_stay) = relay.clients().connect().await;
        relay.clients().disconnect(gone).await;

        let n = relay
            .fanout_to_clients(&ClientCommand::effect("boost"))
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert!(rx_stay.recv().await.is_some());
    }
}
