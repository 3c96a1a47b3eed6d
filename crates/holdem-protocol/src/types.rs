//! Identity types and the typed event boundary.
//!
//! Every signal that crosses between a client and the game core is one of
//! the enums defined here. The core never sees a socket; it sees a
//! [`ClientEvent`] coming in and produces [`ServerEvent`]s going out, which
//! keeps the whole state machine testable with plain in-process channels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::view::TableView;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable player identity.
///
/// Assigned on first join and survives reconnects: the seat is keyed by
/// display name, so a player who drops and rejoins under the same name
/// gets the same id back. Newtype over `String`; serializes as the bare
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A room identifier, chosen by clients when they join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a live transport connection.
///
/// Unlike [`PlayerId`], this changes every time a client reconnects. It
/// never travels on the wire; it exists so the core can address outbound
/// state pushes without holding a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Betting actions
// ---------------------------------------------------------------------------

/// A betting action submitted by the player whose turn it is.
///
/// `{"kind": "fold"}`, `{"kind": "raise", "amount": 20}`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActionKind {
    /// Give up the hand. No chip movement.
    Fold,
    /// Match the table-high bet for this round.
    Call,
    /// Commit `amount` more chips (table minimum 10).
    Raise { amount: u32 },
    /// Commit the entire remaining stack.
    AllIn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fold => write!(f, "fold"),
            Self::Call => write!(f, "call"),
            Self::Raise { amount } => write!(f, "raise {amount}"),
            Self::AllIn => write!(f, "all-in"),
        }
    }
}

// ---------------------------------------------------------------------------
// Client → server events
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
///
/// Every variant carries the target room: connections are not bound to a
/// room at the transport level, the binding happens through `Join`.
/// Disconnection is not an event — it is the transport closing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Take a seat in `room_id` (creating the room if needed) under
    /// `player_name`. Joining with a name already seated there rebinds
    /// that seat to this connection instead of adding a new one.
    Join { room_id: RoomId, player_name: String },

    /// Start a new hand. Requires at least two seated players.
    Start { room_id: RoomId },

    /// Submit a betting action for the current hand.
    Action { room_id: RoomId, action: ActionKind },
}

// ---------------------------------------------------------------------------
// Server → client events
// ---------------------------------------------------------------------------

/// Messages the server pushes to clients.
///
/// Wherever a variant carries `current_player_id`, the field echoes the
/// *receiving* player's own id — clients use it to find their seat in the
/// view. Whose turn it is lives in `TableView::current_player_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Reply to `Join`. On success carries the joiner's view and id;
    /// on failure (room full) carries a human-readable message.
    JoinResult {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        state: Option<TableView>,
        #[serde(skip_serializing_if = "Option::is_none")]
        player_id: Option<PlayerId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Someone else took a seat; sent to every other seat in the room.
    PlayerJoined { state: TableView },

    /// A hand started; sent to every seat with its own redacted view.
    GameStarted {
        state: TableView,
        current_player_id: PlayerId,
    },

    /// The table changed (action applied, phase advanced, sweep removed
    /// a player); sent to every seat with its own redacted view.
    StateUpdated {
        state: TableView,
        current_player_id: PlayerId,
    },

    /// A seat was vacated; sent to the survivors.
    PlayerLeft { state: TableView },

    /// A signal was rejected. Sent only to the originator; nothing was
    /// mutated and nobody else is notified.
    ActionRejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId("player_ab12".into())).unwrap();
        assert_eq!(json, "\"player_ab12\"");
    }

    #[test]
    fn test_room_id_round_trip() {
        let id: RoomId = serde_json::from_str("\"R1\"").unwrap();
        assert_eq!(id, RoomId("R1".into()));
        assert_eq!(id.to_string(), "R1");
    }

    #[test]
    fn test_connection_id_display_and_map_key() {
        use std::collections::HashMap;
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "alice");
        assert_eq!(map[&ConnectionId::new(1)], "alice");
    }

    #[test]
    fn test_action_kind_json_shapes() {
        // The `kind` tag is camelCase on the wire.
        let json = serde_json::to_value(ActionKind::Fold).unwrap();
        assert_eq!(json["kind"], "fold");

        let json = serde_json::to_value(ActionKind::Raise { amount: 20 }).unwrap();
        assert_eq!(json["kind"], "raise");
        assert_eq!(json["amount"], 20);

        let json = serde_json::to_value(ActionKind::AllIn).unwrap();
        assert_eq!(json["kind"], "allIn");
    }

    #[test]
    fn test_action_kind_rejects_unknown_kind() {
        let result: Result<ActionKind, _> =
            serde_json::from_str(r#"{"kind": "check"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_event_join_json_shape() {
        let event = ClientEvent::Join {
            room_id: RoomId("R1".into()),
            player_name: "alice".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Join");
        assert_eq!(json["room_id"], "R1");
        assert_eq!(json["player_name"], "alice");
    }

    #[test]
    fn test_client_event_action_round_trip() {
        let event = ClientEvent::Action {
            room_id: RoomId("R1".into()),
            action: ActionKind::Call,
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ClientEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_join_result_failure_omits_empty_fields() {
        let event = ServerEvent::JoinResult {
            success: false,
            state: None,
            player_id: None,
            message: Some("Room is full".into()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "JoinResult");
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Room is full");
        assert!(json.get("state").is_none());
        assert!(json.get("player_id").is_none());
    }

    #[test]
    fn test_action_rejected_json_shape() {
        let event = ServerEvent::ActionRejected {
            reason: "not your turn".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ActionRejected");
        assert_eq!(json["reason"], "not your turn");
    }

    #[test]
    fn test_decode_wrong_shape_returns_error() {
        let result: Result<ClientEvent, _> = serde_json::from_str(r#"{"name": "x"}"#);
        assert!(result.is_err());
    }
}
