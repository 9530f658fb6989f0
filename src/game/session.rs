use super::heartbeat::{spawn_heartbeat, HeartbeatHandle};
use super::registry::PlayerRegistry;
use super::types::{PlayerId, PlayerState, WorldMap};
use crate::protocol::{self, ClientMessage, HandshakeRequest, HandshakeResponse, MoveRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum SessionState {
    Unauthenticated,
    Active {
        player_id: PlayerId,
        heartbeat: HeartbeatHandle,
    },
    Closed,
}

/// Protocol state for one client connection.
///
/// Only `handshake` is honoured until a player id has been assigned. Bad
/// application messages are logged and dropped; the connection is closed by
/// the transport, never by message content.
#[derive(Debug)]
pub struct Session {
    session_id: String,
    registry: Arc<PlayerRegistry>,
    world: Arc<WorldMap>,
    outbound: mpsc::Sender<String>,
    heartbeat_interval: Duration,
    state: SessionState,
}

impl Session {
    pub fn new(
        session_id: String,
        registry: Arc<PlayerRegistry>,
        world: Arc<WorldMap>,
        outbound: mpsc::Sender<String>,
        heartbeat_interval: Duration,
    ) -> Self {
        Self {
            session_id,
            registry,
            world,
            outbound,
            heartbeat_interval,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        match &self.state {
            SessionState::Active { player_id, .. } => Some(*player_id),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed)
    }

    pub async fn handle_raw(&mut self, raw: &[u8]) {
        if self.is_closed() {
            return;
        }
        let message = match protocol::decode(raw).and_then(|envelope| ClientMessage::from_envelope(&envelope)) {
            Ok(message) => message,
            Err(error) => {
                tracing::warn!(session_id = %self.session_id, %error, "dropping malformed message");
                return;
            }
        };
        self.dispatch(message).await;
    }

    async fn dispatch(&mut self, message: ClientMessage) {
        match (message, self.player_id()) {
            (ClientMessage::Handshake(request), None) => self.handle_handshake(request).await,
            (ClientMessage::Handshake(_), Some(player_id)) => {
                tracing::warn!(session_id = %self.session_id, %player_id, "ignoring repeated handshake");
            }
            (ClientMessage::Move(request), Some(player_id)) => self.handle_move(player_id, request),
            (ClientMessage::Move(_), None) => {
                tracing::warn!(session_id = %self.session_id, "ignoring move before handshake");
            }
            (ClientMessage::Unknown(message_type), _) => {
                tracing::info!(session_id = %self.session_id, message_type = %message_type, "ignoring unknown message type");
            }
        }
    }

    async fn handle_handshake(&mut self, request: HandshakeRequest) {
        let player_id = PlayerId::new();
        let player = PlayerState {
            id: player_id,
            profile: request.user_profile,
            position: self.world.spawn,
            session_id: self.session_id.clone(),
        };
        if let Err(error) = self.registry.insert(player) {
            tracing::error!(session_id = %self.session_id, %error, "rejecting handshake");
            return;
        }

        let response = protocol::encode(
            protocol::TYPE_HANDSHAKE,
            &HandshakeResponse {
                player_id,
                match_map: (*self.world).clone(),
            },
        );
        if self.outbound.send(response).await.is_err() {
            // Connection already gone; undo the insert instead of going active.
            self.registry.remove(player_id);
            tracing::debug!(session_id = %self.session_id, %player_id, "handshake response not delivered");
            return;
        }
        let heartbeat = spawn_heartbeat(
            Arc::clone(&self.registry),
            self.outbound.clone(),
            self.heartbeat_interval,
        );
        self.state = SessionState::Active { player_id, heartbeat };
        tracing::info!(session_id = %self.session_id, %player_id, "player joined");
    }

    fn handle_move(&self, player_id: PlayerId, request: MoveRequest) {
        match self.registry.apply_move(player_id, request.direction, &self.world) {
            Ok(position) => {
                tracing::trace!(%player_id, direction = ?request.direction, ?position, "move applied");
            }
            Err(error) => {
                tracing::warn!(session_id = %self.session_id, %error, "dropping move");
            }
        }
    }

    /// Moves to `Closed`, removing the player and stopping its heartbeat.
    /// Later calls do nothing.
    pub fn close(&mut self) {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Active { player_id, heartbeat } => {
                let _ = heartbeat.cancel();
                if self.registry.remove(player_id).is_some() {
                    tracing::info!(session_id = %self.session_id, %player_id, "player left");
                }
            }
            SessionState::Unauthenticated | SessionState::Closed => {}
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
