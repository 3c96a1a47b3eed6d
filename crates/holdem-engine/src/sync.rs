use std::collections::HashMap;

use holdem_protocol::{ConnectionId, ServerEvent};
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::table::GameTable;

/// Per-connection outbox for server events.
pub type Outbox = UnboundedSender<ServerEvent>;

/// Fan-out of table state to connections. Each broadcast builds one redacted
/// view per seat, so a player only ever receives their own hole cards.
///
/// Sends are best-effort: a closed outbox is skipped and the periodic sweep
/// reclaims the seat later.
#[derive(Debug, Default)]
pub struct SyncService {
    outboxes: HashMap<ConnectionId, Outbox>,
}

impl SyncService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, connection: ConnectionId, outbox: Outbox) {
        self.outboxes.insert(connection, outbox);
    }

    pub fn unregister(&mut self, connection: ConnectionId) {
        self.outboxes.remove(&connection);
    }

    pub fn is_alive(&self, connection: ConnectionId) -> bool {
        self.outboxes
            .get(&connection)
            .is_some_and(|tx| !tx.is_closed())
    }

    pub fn connection_count(&self) -> usize {
        self.outboxes.len()
    }

    pub fn send(&self, connection: ConnectionId, event: ServerEvent) {
        if let Some(outbox) = self.outboxes.get(&connection) {
            if outbox.send(event).is_err() {
                trace!(%connection, "dropping event for closed outbox");
            }
        }
    }

    /// Push a refreshed `StateUpdated` view to every seat.
    pub fn broadcast_state(&self, table: &GameTable) {
        for player in table.players() {
            self.send(
                player.connection,
                ServerEvent::StateUpdated {
                    state: table.view_for(player.connection),
                    current_player_id: player.id.clone(),
                },
            );
        }
    }

    /// Announce a freshly started hand to every seat.
    pub fn broadcast_started(&self, table: &GameTable) {
        for player in table.players() {
            self.send(
                player.connection,
                ServerEvent::GameStarted {
                    state: table.view_for(player.connection),
                    current_player_id: player.id.clone(),
                },
            );
        }
    }

    /// Announce a new seat to everyone already at the table.
    pub fn broadcast_player_joined(&self, table: &GameTable, except: ConnectionId) {
        for player in table.players() {
            if player.connection == except {
                continue;
            }
            self.send(
                player.connection,
                ServerEvent::PlayerJoined {
                    state: table.view_for(player.connection),
                },
            );
        }
    }

    /// Announce a departure to the seats that remain.
    pub fn broadcast_player_left(&self, table: &GameTable) {
        for player in table.players() {
            self.send(
                player.connection,
                ServerEvent::PlayerLeft {
                    state: table.view_for(player.connection),
                },
            );
        }
    }
}
