//! Broadcast hub WebSocket handler.
//!
//! One task per connection. After the upgrade the client is registered
//! and a writer task drains its outbox into the socket. Each inbound text
//! frame is dispatched and broadcast as `"<name>: <text>"`. The
//! registration is dropped on every exit path, which unregisters the
//! client exactly once.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        ConnectInfo, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use crate::chat::ClientRegistry;
use crate::exchange::{CommandDispatcher, RateSource};

/// State shared by all hub connections.
pub struct HubState<S> {
    /// Connected clients.
    pub registry: Arc<ClientRegistry>,
    /// Inbound message dispatcher.
    pub dispatcher: CommandDispatcher<S>,
}

impl<S: RateSource> HubState<S> {
    /// Create hub state with an empty registry.
    pub fn new(dispatcher: CommandDispatcher<S>) -> Self {
        Self {
            registry: Arc::new(ClientRegistry::new()),
            dispatcher,
        }
    }
}

/// WebSocket hub handler.
///
/// GET /
pub async fn hub_ws_handler<S: RateSource + 'static>(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<Arc<HubState<S>>>,
) -> Response {
    debug!("WebSocket upgrade requested by {}", peer);
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

/// Handle a WebSocket connection until it closes.
async fn handle_socket<S: RateSource>(
    socket: WebSocket,
    state: Arc<HubState<S>>,
    peer: SocketAddr,
) {
    let (client, mut outbox) = state.registry.join();
    info!("{} connects as {}", peer, client.name());

    let (mut ws_sender, mut ws_receiver) = socket.split();

    let mut writer = tokio::spawn(async move {
        while let Some(text) = outbox.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let name = client.name();
                        let reply = state.dispatcher.dispatch(name, text.as_str()).await;
                        let delivered = state.registry.broadcast_all(&format!("{name}: {reply}"));
                        debug!("Message from {} delivered to {} clients", name, delivered);
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket closed by client: {}", peer);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("WebSocket error from {}: {}", peer, e);
                        break;
                    }
                }
            }

            _ = &mut writer => {
                debug!("WebSocket writer for {} stopped", peer);
                break;
            }
        }
    }

    writer.abort();
    info!("{} disconnects ({})", peer, client.name());
    drop(client);
}
