use holdem_protocol::{PlayerId, RoomId};
use thiserror::Error;

/// Errors produced by table operations.
///
/// Every variant maps to a condition a client can trigger, so messages are
/// written to be sent back over the wire verbatim.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("room {0} is full")]
    RoomFull(RoomId),

    #[error("need at least 2 players to start, have {seated}")]
    NotEnoughPlayers { seated: usize },

    #[error("no betting round is in progress")]
    NoBettingRound,

    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("{0} has already folded")]
    PlayerFolded(PlayerId),

    #[error("{0} is all-in and cannot act")]
    PlayerAllIn(PlayerId),

    #[error("raise of {amount} is invalid (minimum {min}, maximum {available})")]
    InvalidRaise {
        amount: u32,
        min: u32,
        available: u32,
    },

    #[error("cannot cover call of {due} with {available} chips")]
    CannotCoverCall { due: u32, available: u32 },

    #[error("connection is not seated at this table")]
    UnknownPlayer,

    #[error("deck exhausted")]
    DeckExhausted,
}
