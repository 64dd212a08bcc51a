//! Client Gateway — one WebSocket session per Kerbal Space Program client.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use crate::api::state::SharedState;
use crate::relay::ClientId;

/// Any path on the client port — upgrade to the game client socket.
pub async fn client_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    info!("received new connection from Kerbal Space Program client");

    let (client_id, mut rx) = state.relay.clients().connect().await;
    let (mut sink, mut stream) = socket.split();

    // Writer task: forward queued frames → WS sink.
    let mut writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sink
                .send(Message::Text(text.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // Reader task: handle client → relay messages in receipt order.
    let reader_state = state.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(text) => {
                    handle_client_message(&reader_state, client_id, text.as_str()).await;
                }
                Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(text) => handle_client_message(&reader_state, client_id, text).await,
                    Err(e) => warn!(client_id, "dropped non-UTF-8 binary frame: {e}"),
                },
                Message::Close(_) => break,
                _ => {} // Ping / Pong handled by Axum
            }
        }
    });

    tokio::select! {
        _ = &mut writer => { reader.abort(); }
        _ = &mut reader => { writer.abort(); }
    }

    cleanup(&state, client_id).await;
}

/// Route one client frame. A malformed frame is logged and dropped; the
/// connection stays open.
async fn handle_client_message(state: &SharedState, client_id: ClientId, text: &str) {
    if let Err(e) = state.relay.handle_client_text(text).await {
        warn!(client_id, "ignored client message: {e}");
    }
}

/// Remove the client from the live set.
async fn cleanup(state: &SharedState, client_id: ClientId) {
    if state.relay.clients().disconnect(client_id).await {
        info!(client_id, "Kerbal Space Program has disconnected, removed from list");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use serde_json::json;

    #[tokio::test]
    async fn handler_type_check() {
        fn assert_handler<F, Fut, R>(_: F)
        where
            F: FnOnce(WebSocketUpgrade, State<SharedState>) -> Fut,
            Fut: std::future::Future<Output = R>,
            R: IntoResponse,
        {
        }
        assert_handler(client_handler);
    }

    #[tokio::test]
    async fn malformed_message_does_not_drop_client() {
        let state = AppState::new(AppConfig::default());
        let (id, _rx) = state.relay.clients().connect().await;
        let mut panel = state.relay.panels().subscribe();

        handle_client_message(&state, id, "{oops").await;
        assert!(state.relay.clients().contains(id).await);

        handle_client_message(&state, id, r#"{"type":"power","power":7}"#).await;
        assert_eq!(panel.recv().await.unwrap().payload(), &json!(7));
    }

    #[tokio::test]
    async fn cleanup_is_idempotent() {
        let state = AppState::new(AppConfig::default());
        let (id, _rx) = state.relay.clients().connect().await;
        cleanup(&state, id).await;
        cleanup(&state, id).await;
        assert!(state.relay.clients().is_empty().await);
    }
}
