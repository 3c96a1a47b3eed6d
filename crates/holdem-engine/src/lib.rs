//! Game engine for the hold'em server: tables, dealing, betting rounds,
//! simplified hand ranking, the room registry, and per-viewer state fan-out.
//!
//! The engine is transport-agnostic. It identifies viewers by
//! [`ConnectionId`](holdem_protocol::ConnectionId) and emits
//! [`ServerEvent`](holdem_protocol::ServerEvent)s through [`SyncService`]
//! outboxes; whatever owns the sockets pumps those outboxes onto the wire.

mod betting;
mod deck;
mod error;
mod eval;
mod player;
mod registry;
mod sync;
mod table;

pub use deck::Deck;
pub use error::TableError;
pub use eval::rank_hand;
pub use player::Player;
pub use registry::RoomRegistry;
pub use sync::{Outbox, SyncService};
pub use table::{GameTable, JoinOutcome, BASE_BET, MAX_PLAYERS, MIN_PLAYERS, STARTING_CHIPS};
