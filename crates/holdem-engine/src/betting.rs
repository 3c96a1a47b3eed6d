//! Betting-round rules: applying player actions, rotating the turn, and
//! deciding when a street is finished.

use holdem_protocol::{ActionKind, ConnectionId};
use tracing::debug;

use crate::error::TableError;
use crate::table::{GameTable, BASE_BET};

impl GameTable {
    /// Apply one action from the connection bound to a seat. On success the
    /// turn advances, and if the street is settled the table moves to the
    /// next phase. Rejections leave the table untouched.
    pub fn apply_action(&mut self, connection: ConnectionId, action: ActionKind) -> Result<(), TableError> {
        if !self.phase.accepts_actions() {
            return Err(TableError::NoBettingRound);
        }
        let seat = self.seat_of(connection).ok_or(TableError::UnknownPlayer)?;
        if seat != self.current_player_index {
            return Err(TableError::NotYourTurn(self.players[seat].id.clone()));
        }
        if self.players[seat].folded {
            return Err(TableError::PlayerFolded(self.players[seat].id.clone()));
        }
        if self.players[seat].all_in {
            return Err(TableError::PlayerAllIn(self.players[seat].id.clone()));
        }

        match action {
            ActionKind::Fold => {
                self.players[seat].folded = true;
            }
            ActionKind::Call => {
                // A call matches the table bet; zero due is a check.
                let due = self.current_bet.saturating_sub(self.players[seat].current_bet);
                if due > self.players[seat].chips {
                    return Err(TableError::CannotCoverCall {
                        due,
                        available: self.players[seat].chips,
                    });
                }
                let player = &mut self.players[seat];
                player.chips -= due;
                player.current_bet += due;
                self.pot += due;
            }
            ActionKind::Raise { amount } => {
                if amount < BASE_BET || amount > self.players[seat].chips {
                    return Err(TableError::InvalidRaise {
                        amount,
                        min: BASE_BET,
                        available: self.players[seat].chips,
                    });
                }
                let player = &mut self.players[seat];
                player.chips -= amount;
                player.current_bet += amount;
                let commitment = player.current_bet;
                self.pot += amount;
                // The raiser's total commitment becomes the table bet, even
                // when that lowers it below another seat's commitment.
                self.current_bet = commitment;
            }
            ActionKind::AllIn => {
                let player = &mut self.players[seat];
                let stack = player.chips;
                player.chips = 0;
                player.current_bet += stack;
                player.all_in = true;
                let commitment = player.current_bet;
                self.pot += stack;
                if commitment > self.current_bet {
                    self.current_bet = commitment;
                }
            }
        }
        debug!(
            room_id = %self.room_id,
            player = %self.players[seat].id,
            action = %action,
            pot = self.pot,
            "action applied"
        );

        self.advance_turn();
        if self.betting_round_complete() {
            self.advance_phase()?;
        }
        Ok(())
    }

    /// Move the turn to the next seat that can still act, scanning
    /// circularly. With no actionable seats the marker stays put.
    pub(crate) fn advance_turn(&mut self) {
        let len = self.players.len();
        if len == 0 {
            return;
        }
        for step in 1..=len {
            let idx = (self.current_player_index + step) % len;
            if self.players[idx].is_active() {
                self.current_player_index = idx;
                return;
            }
        }
    }

    /// A street is settled when at most one seat can still act, or when
    /// every seat that can act has matched commitments.
    pub fn betting_round_complete(&self) -> bool {
        let mut active = self.players.iter().filter(|p| p.is_active());
        let Some(first) = active.next() else {
            return true;
        };
        let reference = first.current_bet;
        let mut rest = active.peekable();
        if rest.peek().is_none() {
            return true;
        }
        std::iter::once(first)
            .chain(rest)
            .all(|p| p.current_bet == reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_protocol::{Phase, RoomId};
    use crate::table::STARTING_CHIPS;

    fn started_table(seats: usize) -> GameTable {
        let mut t = GameTable::new(RoomId("R1".into()));
        for i in 0..seats {
            t.add_player(&format!("p{i}"), ConnectionId::new(i as u64))
                .unwrap();
        }
        t.start().unwrap();
        t
    }

    fn conn_at(t: &GameTable, seat: usize) -> ConnectionId {
        t.players()[seat].connection
    }

    fn chip_sum(t: &GameTable) -> u32 {
        t.players().iter().map(|p| p.chips).sum::<u32>() + t.pot()
    }

    #[test]
    fn acting_out_of_turn_is_rejected_without_side_effects() {
        let mut t = started_table(3);
        let off_turn = (t.current_player_index() + 1) % 3;
        let err = t
            .apply_action(conn_at(&t, off_turn), ActionKind::Raise { amount: 20 })
            .unwrap_err();
        assert!(matches!(err, TableError::NotYourTurn(_)));
        assert_eq!(t.pot(), 0);
        assert_eq!(t.players()[off_turn].chips, STARTING_CHIPS);
    }

    #[test]
    fn unknown_connection_is_rejected() {
        let mut t = started_table(2);
        let err = t
            .apply_action(ConnectionId::new(77), ActionKind::Call)
            .unwrap_err();
        assert!(matches!(err, TableError::UnknownPlayer));
    }

    #[test]
    fn actions_are_rejected_outside_a_hand() {
        let mut t = GameTable::new(RoomId("R1".into()));
        t.add_player("alice", ConnectionId::new(1)).unwrap();
        t.add_player("bob", ConnectionId::new(2)).unwrap();
        let err = t
            .apply_action(ConnectionId::new(1), ActionKind::Call)
            .unwrap_err();
        assert!(matches!(err, TableError::NoBettingRound));
    }

    #[test]
    fn raise_below_the_minimum_is_rejected() {
        let mut t = started_table(2);
        let actor = conn_at(&t, t.current_player_index());
        let err = t
            .apply_action(actor, ActionKind::Raise { amount: 5 })
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidRaise { amount: 5, min: BASE_BET, .. }
        ));
        assert_eq!(t.pot(), 0);
    }

    #[test]
    fn raise_beyond_the_stack_is_rejected() {
        let mut t = started_table(2);
        let actor = conn_at(&t, t.current_player_index());
        let err = t
            .apply_action(actor, ActionKind::Raise { amount: 1500 })
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidRaise { amount: 1500, .. }));
    }

    #[test]
    fn raise_then_call_settles_the_street() {
        let mut t = started_table(2);
        let raiser = t.current_player_index();
        let caller = (raiser + 1) % 2;

        t.apply_action(conn_at(&t, raiser), ActionKind::Raise { amount: 20 })
            .unwrap();
        assert_eq!(t.pot(), 20);
        assert_eq!(t.current_bet(), 20);
        assert_eq!(t.phase(), Phase::Preflop);
        assert_eq!(t.current_player_index(), caller);

        t.apply_action(conn_at(&t, caller), ActionKind::Call).unwrap();
        assert_eq!(t.pot(), 40);
        assert_eq!(t.phase(), Phase::Flop);
        assert_eq!(t.community_cards().len(), 3);
        // Street bets reset for the new round; the pot carries over.
        assert_eq!(t.current_bet(), 0);
        assert!(t.players().iter().all(|p| p.current_bet == 0));
        assert_eq!(chip_sum(&t), 2 * STARTING_CHIPS);
    }

    #[test]
    fn unmatched_commitments_keep_the_street_open() {
        let mut t = started_table(3);
        let first = t.current_player_index();
        t.apply_action(conn_at(&t, first), ActionKind::Raise { amount: 10 })
            .unwrap();
        let second = t.current_player_index();
        t.apply_action(conn_at(&t, second), ActionKind::Raise { amount: 20 })
            .unwrap();
        // Commitments are 10/20/0: the street must stay open.
        assert!(!t.betting_round_complete());
        assert_eq!(t.phase(), Phase::Preflop);
    }

    #[test]
    fn a_later_raise_resets_the_table_bet_to_its_own_commitment() {
        let mut t = started_table(3);
        let first = t.current_player_index();
        t.apply_action(conn_at(&t, first), ActionKind::Raise { amount: 20 })
            .unwrap();
        assert_eq!(t.current_bet(), 20);
        let second = t.current_player_index();
        t.apply_action(conn_at(&t, second), ActionKind::Raise { amount: 10 })
            .unwrap();
        // The table bet follows the most recent raiser, even downward.
        assert_eq!(t.current_bet(), 10);
    }

    #[test]
    fn fold_passes_the_turn_and_a_lone_active_seat_settles_the_street() {
        let mut t = started_table(3);
        let first = t.current_player_index();
        t.apply_action(conn_at(&t, first), ActionKind::Raise { amount: 20 })
            .unwrap();
        let second = t.current_player_index();
        t.apply_action(conn_at(&t, second), ActionKind::Fold).unwrap();
        assert!(t.players()[second].folded);
        let third = t.current_player_index();
        t.apply_action(conn_at(&t, third), ActionKind::Fold).unwrap();
        // One active seat left: streets settle immediately from here on.
        assert_ne!(t.phase(), Phase::Preflop);
        assert_eq!(chip_sum(&t), 3 * STARTING_CHIPS);
    }

    #[test]
    fn all_in_caps_the_stack_and_can_raise_the_table_bet() {
        let mut t = started_table(3);
        let first = t.current_player_index();
        t.apply_action(conn_at(&t, first), ActionKind::Raise { amount: 10 })
            .unwrap();
        let second = t.current_player_index();
        t.apply_action(conn_at(&t, second), ActionKind::AllIn).unwrap();
        assert_eq!(t.players()[second].chips, 0);
        assert!(t.players()[second].all_in);
        assert_eq!(t.current_bet(), STARTING_CHIPS);
        assert_eq!(t.pot(), STARTING_CHIPS + 10);
        // Remaining active seats are still unmatched, so the street is open.
        assert_eq!(t.phase(), Phase::Preflop);
    }

    #[test]
    fn hand_runs_to_showdown_when_every_seat_is_all_in() {
        let mut t = started_table(2);
        let first = t.current_player_index();
        t.apply_action(conn_at(&t, first), ActionKind::AllIn).unwrap();
        // The opponent is the only seat left that can act.
        assert_eq!(t.phase(), Phase::Flop);
        let second = t.current_player_index();
        t.apply_action(conn_at(&t, second), ActionKind::AllIn).unwrap();
        // Nobody can act on the remaining streets; the board is dealt out
        // and the pot settles instead of stranding mid-hand.
        assert_eq!(t.phase(), Phase::Showdown);
        assert_eq!(t.community_cards().len(), 5);
        assert_eq!(t.pot(), 0);
        assert!(t.players().iter().any(|p| p.chips == 2 * STARTING_CHIPS));
        assert_eq!(chip_sum(&t), 2 * STARTING_CHIPS);
    }

    #[test]
    fn lone_all_in_settles_the_street_among_the_rest() {
        let mut t = started_table(3);
        let first = t.current_player_index();
        t.apply_action(conn_at(&t, first), ActionKind::AllIn).unwrap();
        // The other two seats are matched at zero, so play moves on.
        assert_eq!(t.phase(), Phase::Flop);
        assert_eq!(t.pot(), STARTING_CHIPS);
        assert!(t.players()[first].all_in);
    }

    #[test]
    fn call_that_cannot_be_covered_is_rejected() {
        let mut t = started_table(2);
        let first = t.current_player_index();
        let second = (first + 1) % 2;
        t.players[second].chips = 5;
        t.apply_action(conn_at(&t, first), ActionKind::Raise { amount: 20 })
            .unwrap();
        let err = t
            .apply_action(conn_at(&t, second), ActionKind::Call)
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::CannotCoverCall { due: 20, available: 5 }
        ));
        // Rejection leaves the table untouched.
        assert_eq!(t.pot(), 20);
        assert_eq!(t.current_player_index(), second);
    }

    #[test]
    fn turn_rotation_skips_folded_and_all_in_seats() {
        let mut t = started_table(4);
        let first = t.current_player_index();
        t.players[(first + 1) % 4].folded = true;
        t.players[(first + 2) % 4].all_in = true;
        t.apply_action(conn_at(&t, first), ActionKind::Raise { amount: 10 })
            .unwrap();
        assert_eq!(t.current_player_index(), (first + 3) % 4);
    }

    #[test]
    fn calls_walk_a_full_hand_to_showdown_with_eight_players() {
        let mut t = started_table(8);
        assert_eq!(t.cards_remaining(), 52 - 16);
        // With no blinds, the opening call settles each street immediately.
        for expected in [Phase::Flop, Phase::Turn, Phase::River, Phase::Showdown] {
            let actor = conn_at(&t, t.current_player_index());
            t.apply_action(actor, ActionKind::Call).unwrap();
            assert_eq!(t.phase(), expected);
        }
        assert_eq!(t.community_cards().len(), 5);
        assert_eq!(t.cards_remaining(), 52 - 16 - 5);
        assert_eq!(chip_sum(&t), 8 * STARTING_CHIPS);
    }

    #[test]
    fn chip_total_is_conserved_across_a_contested_hand() {
        let mut t = started_table(3);
        let total = 3 * STARTING_CHIPS;
        let first = t.current_player_index();
        t.apply_action(conn_at(&t, first), ActionKind::Raise { amount: 50 })
            .unwrap();
        assert_eq!(chip_sum(&t), total);
        let second = t.current_player_index();
        t.apply_action(conn_at(&t, second), ActionKind::Call).unwrap();
        assert_eq!(chip_sum(&t), total);
        let third = t.current_player_index();
        t.apply_action(conn_at(&t, third), ActionKind::Fold).unwrap();
        assert_eq!(chip_sum(&t), total);
        while t.phase() != Phase::Showdown {
            let actor = conn_at(&t, t.current_player_index());
            t.apply_action(actor, ActionKind::Call).unwrap();
            assert_eq!(chip_sum(&t), total);
        }
        assert_eq!(t.pot(), 0);
        assert_eq!(chip_sum(&t), total);
    }
}
