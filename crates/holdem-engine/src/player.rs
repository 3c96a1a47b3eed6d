use holdem_protocol::{Card, ConnectionId, PlayerId};
use rand::Rng;

use crate::table::STARTING_CHIPS;

/// A seated player. Identity is the stable `id` (assigned at first join and
/// kept across reconnects); `connection` tracks the transport currently bound
/// to the seat.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub connection: ConnectionId,
    pub name: String,
    pub chips: u32,
    pub hand: Vec<Card>,
    pub current_bet: u32,
    pub folded: bool,
    pub all_in: bool,
}

impl Player {
    pub(crate) fn new(name: &str, connection: ConnectionId) -> Self {
        Self {
            id: generate_player_id(),
            connection,
            name: name.to_owned(),
            chips: STARTING_CHIPS,
            hand: Vec::new(),
            current_bet: 0,
            folded: false,
            all_in: false,
        }
    }

    /// Whether the player still has decisions to make this hand.
    pub fn is_active(&self) -> bool {
        !self.folded && !self.all_in
    }
}

fn generate_player_id() -> PlayerId {
    let mut rng = rand::rng();
    let bytes: [u8; 8] = rng.random();
    let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    PlayerId(format!("player_{suffix}"))
}
