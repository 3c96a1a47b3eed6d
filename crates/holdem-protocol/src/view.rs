//! Per-viewer state projections.
//!
//! A [`TableView`] is what a client actually sees: the full public table
//! state plus only its *own* hole cards. It is a fixed-schema snapshot
//! built by a pure transform in the engine; producing one never mutates
//! the table. The unredacted form (every hand visible) backs the HTTP
//! debugging endpoint only.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::types::{PlayerId, RoomId};

/// The stage of the current hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No hand in progress; the room is gathering players.
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    /// Hands revealed and the pot paid out. Persists until a new start.
    Showdown,
}

impl Phase {
    /// `true` once a hand has been dealt (anything past `Waiting`).
    pub fn is_active(self) -> bool {
        !matches!(self, Phase::Waiting)
    }

    /// `true` while a betting round can accept actions.
    pub fn accepts_actions(self) -> bool {
        matches!(self, Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

/// One seat as a viewer sees it.
///
/// `hand` is populated only when the seat belongs to the viewer (or in
/// the unredacted debug projection); for every other seat it is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub chips: u32,
    pub bet: u32,
    pub folded: bool,
    pub all_in: bool,
    pub hand: Vec<Card>,
    pub is_current_player: bool,
    pub is_dealer: bool,
}

/// A snapshot of one table, redacted for a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub room_id: RoomId,
    pub players: Vec<SeatView>,
    pub community_cards: Vec<Card>,
    pub pot: u32,
    pub current_bet: u32,
    pub current_player_index: usize,
    pub dealer_index: usize,
    pub phase: Phase,
    /// Derived: phase is anything past `waiting`.
    pub is_game_active: bool,
    /// Derived: at least two seats and no hand in progress.
    pub can_start_game: bool,
    /// The fixed table minimum raise.
    pub base_bet: u32,
}

/// One line in the room listing served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub player_count: usize,
    pub max_players: usize,
    pub phase: Phase,
}
