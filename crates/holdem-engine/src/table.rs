use holdem_protocol::{Card, ConnectionId, Phase, PlayerId, RoomId, RoomSummary, SeatView, TableView};
use rand::Rng;
use tracing::{debug, info};

use crate::deck::Deck;
use crate::error::TableError;
use crate::eval::rank_hand;
use crate::player::Player;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;
pub const STARTING_CHIPS: u32 = 1000;
/// Minimum raise, surfaced to clients as `baseBet`.
pub const BASE_BET: u32 = 10;

/// Result of seating a player: the stable identity for the seat, and whether
/// the join rebound an existing seat instead of creating one.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub player_id: PlayerId,
    pub reconnected: bool,
}

/// One table: seats, deck, board, pot, and the phase machine for a hand.
///
/// All methods run synchronously to completion; the caller serializes access
/// (one lock per registry of tables).
#[derive(Debug)]
pub struct GameTable {
    pub(crate) room_id: RoomId,
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) community_cards: Vec<Card>,
    pub(crate) pot: u32,
    pub(crate) current_bet: u32,
    pub(crate) dealer_index: usize,
    pub(crate) current_player_index: usize,
    pub(crate) phase: Phase,
}

impl GameTable {
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            players: Vec::new(),
            deck: Deck::standard(),
            community_cards: Vec::new(),
            pot: 0,
            current_bet: 0,
            dealer_index: 0,
            current_player_index: 0,
            phase: Phase::Waiting,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pot(&self) -> u32 {
        self.pot
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn community_cards(&self) -> &[Card] {
        &self.community_cards
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn cards_remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn is_game_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn can_start(&self) -> bool {
        self.phase == Phase::Waiting && self.players.len() >= MIN_PLAYERS
    }

    pub fn seat_of(&self, connection: ConnectionId) -> Option<usize> {
        self.players.iter().position(|p| p.connection == connection)
    }

    pub fn player_by_connection(&self, connection: ConnectionId) -> Option<&Player> {
        self.players.iter().find(|p| p.connection == connection)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Seat a player, keyed by name. A join with a name already at the table
    /// rebinds that seat to the new connection (reconnect) and preserves the
    /// seat's identity, chips, and hand.
    pub fn add_player(&mut self, name: &str, connection: ConnectionId) -> Result<JoinOutcome, TableError> {
        if let Some(existing) = self.players.iter_mut().find(|p| p.name == name) {
            debug!(room_id = %self.room_id, player = %existing.id, "rebinding seat to new connection");
            existing.connection = connection;
            return Ok(JoinOutcome {
                player_id: existing.id.clone(),
                reconnected: true,
            });
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(TableError::RoomFull(self.room_id.clone()));
        }
        let player = Player::new(name, connection);
        let player_id = player.id.clone();
        self.players.push(player);
        Ok(JoinOutcome {
            player_id,
            reconnected: false,
        })
    }

    /// Unseat whichever player is bound to `connection`, keeping the dealer
    /// and turn markers pointed at the seats they referred to before.
    ///
    /// When the removed seat held the turn, the marker moves on to the next
    /// seat that can act, and if the departure settled the street the hand
    /// moves to the next phase.
    pub fn remove_connection(&mut self, connection: ConnectionId) -> Option<Player> {
        let seat = self.seat_of(connection)?;
        let player = self.players.remove(seat);
        let len = self.players.len();
        self.dealer_index = adjust_index(self.dealer_index, seat, len);
        self.current_player_index = adjust_index(self.current_player_index, seat, len);
        if self.phase.accepts_actions() && !self.players.is_empty() {
            let on_turn = self
                .players
                .get(self.current_player_index)
                .is_some_and(Player::is_active);
            if !on_turn {
                self.advance_turn();
            }
            if self.betting_round_complete() {
                // Only deal errors can surface here, and a partial deck is
                // impossible mid-hand; log rather than lose the removal.
                if let Err(e) = self.advance_phase() {
                    debug!(room_id = %self.room_id, error = %e, "phase advance after removal failed");
                }
            }
        }
        Some(player)
    }

    /// Unseat every player whose connection fails the liveness check.
    /// Returns the number of seats removed.
    pub fn remove_dead(&mut self, alive: &dyn Fn(ConnectionId) -> bool) -> usize {
        let dead: Vec<ConnectionId> = self
            .players
            .iter()
            .filter(|p| !alive(p.connection))
            .map(|p| p.connection)
            .collect();
        for connection in &dead {
            self.remove_connection(*connection);
        }
        dead.len()
    }

    /// Begin a new hand: fresh shuffled deck, two hole cards per seat, a
    /// random dealer who acts first. There are no blinds; the pot opens at
    /// zero.
    pub fn start(&mut self) -> Result<(), TableError> {
        if self.players.len() < MIN_PLAYERS {
            return Err(TableError::NotEnoughPlayers {
                seated: self.players.len(),
            });
        }
        self.deck = Deck::shuffled();
        self.community_cards.clear();
        self.pot = 0;
        self.current_bet = 0;
        self.dealer_index = rand::rng().random_range(0..self.players.len());
        for player in &mut self.players {
            player.hand.clear();
            player.current_bet = 0;
            player.folded = false;
            player.all_in = false;
        }
        for player in &mut self.players {
            player.hand.push(self.deck.draw()?);
            player.hand.push(self.deck.draw()?);
        }
        self.phase = Phase::Preflop;
        self.begin_betting_round();
        info!(
            room_id = %self.room_id,
            players = self.players.len(),
            dealer = %self.players[self.dealer_index].id,
            "hand started"
        );
        Ok(())
    }

    /// Reset per-round bets and hand the action to the first seat from the
    /// dealer that can still act.
    pub(crate) fn begin_betting_round(&mut self) {
        self.current_bet = 0;
        for player in &mut self.players {
            player.current_bet = 0;
        }
        let len = self.players.len();
        self.current_player_index = (0..len)
            .map(|step| (self.dealer_index + step) % len)
            .find(|&idx| self.players[idx].is_active())
            .unwrap_or(self.dealer_index);
    }

    /// Move to the next street, dealing its community cards, or settle the
    /// hand at showdown. Streets where nobody can act (every seat folded or
    /// all-in) are dealt through without stopping, so the hand always
    /// reaches showdown and the pot is paid out.
    pub(crate) fn advance_phase(&mut self) -> Result<(), TableError> {
        loop {
            let next = match self.phase {
                Phase::Preflop => {
                    self.deal_community(3)?;
                    Phase::Flop
                }
                Phase::Flop => {
                    self.deal_community(1)?;
                    Phase::Turn
                }
                Phase::Turn => {
                    self.deal_community(1)?;
                    Phase::River
                }
                Phase::River => Phase::Showdown,
                Phase::Waiting | Phase::Showdown => return Ok(()),
            };
            self.phase = next;
            if next == Phase::Showdown {
                self.settle_showdown();
                return Ok(());
            }
            self.begin_betting_round();
            debug!(room_id = %self.room_id, phase = %self.phase, "phase advanced");
            if self.players.iter().any(Player::is_active) {
                return Ok(());
            }
        }
    }

    fn deal_community(&mut self, count: usize) -> Result<(), TableError> {
        for _ in 0..count {
            let card = self.deck.draw()?;
            self.community_cards.push(card);
        }
        Ok(())
    }

    /// Rank every non-folded hand and award the entire pot to the best one.
    /// Ties break toward the earliest seat; the pot is never split and there
    /// are no side pots.
    fn settle_showdown(&mut self) {
        let mut ranked: Vec<(usize, u32)> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.folded)
            .map(|(seat, p)| {
                let pool: Vec<Card> = p
                    .hand
                    .iter()
                    .chain(self.community_cards.iter())
                    .copied()
                    .collect();
                (seat, rank_hand(&pool))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(&(winner, score)) = ranked.first() {
            info!(
                room_id = %self.room_id,
                winner = %self.players[winner].id,
                score,
                pot = self.pot,
                "showdown settled"
            );
            self.players[winner].chips += self.pot;
            self.pot = 0;
        }
    }

    /// The state as seen by one connection: only the viewer's own hole cards
    /// are present, every other seat's hand is empty.
    pub fn view_for(&self, viewer: ConnectionId) -> TableView {
        self.build_view(Some(viewer))
    }

    /// The full state with every hand visible. Used for the read-only HTTP
    /// surface, never pushed to players.
    pub fn view_unredacted(&self) -> TableView {
        self.build_view(None)
    }

    fn build_view(&self, viewer: Option<ConnectionId>) -> TableView {
        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, p)| SeatView {
                id: p.id.clone(),
                name: p.name.clone(),
                chips: p.chips,
                bet: p.current_bet,
                folded: p.folded,
                all_in: p.all_in,
                hand: match viewer {
                    None => p.hand.clone(),
                    Some(conn) if p.connection == conn => p.hand.clone(),
                    Some(_) => Vec::new(),
                },
                is_current_player: seat == self.current_player_index,
                is_dealer: seat == self.dealer_index,
            })
            .collect();
        TableView {
            room_id: self.room_id.clone(),
            players,
            community_cards: self.community_cards.clone(),
            pot: self.pot,
            current_bet: self.current_bet,
            current_player_index: self.current_player_index,
            dealer_index: self.dealer_index,
            phase: self.phase,
            is_game_active: self.is_game_active(),
            can_start_game: self.can_start(),
            base_bet: BASE_BET,
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.room_id.clone(),
            player_count: self.players.len(),
            max_players: MAX_PLAYERS,
            phase: self.phase,
        }
    }
}

/// Re-point an index at the seat it referred to after one removal. An index
/// at the removed seat ends up on the seat that slid into its place.
fn adjust_index(index: usize, removed: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if index > removed {
        index - 1
    } else {
        index % len
    }
}
