//! Panel Gateway — one WebSocket session per browser control panel.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::api::state::SharedState;
use crate::relay::{PanelEvent, PanelRequest};

/// GET /socket — upgrade to the panel event channel.
pub async fn panel_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    debug!("connection from interface received");

    let mut rx = state.relay.panels().subscribe();
    let (mut sink, mut stream) = socket.split();

    // Writer task: forward hub events → WS sink.
    let mut writer = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if sink
                        .send(Message::Text(event.to_json().into()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "panel fell behind, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
        let _ = sink.close().await;
    });

    // Reader task: handle panel → relay events.
    let reader_state = state.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(text) => handle_panel_message(&reader_state, &text).await,
                Message::Close(_) => break,
                _ => {} // Binary / Ping / Pong handled by Axum
            }
        }
    });

    tokio::select! {
        _ = &mut writer => { reader.abort(); }
        _ = &mut reader => { writer.abort(); }
    }

    debug!("interface disconnected");
}

/// Process a panel-sent text frame.
async fn handle_panel_message(state: &SharedState, text: &str) {
    let Some(event) = PanelEvent::parse(text) else {
        debug!("ignored panel frame that is not an event");
        return;
    };
    state
        .relay
        .handle_panel_request(PanelRequest::from(event))
        .await;
}
