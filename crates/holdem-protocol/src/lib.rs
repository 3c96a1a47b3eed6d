//! Wire protocol for the hold'em server.
//!
//! This crate defines the "language" that clients and the game core speak:
//!
//! - **Identity** ([`PlayerId`], [`RoomId`], [`ConnectionId`]) — who is
//!   acting, where, and over which live connection.
//! - **Cards** ([`Card`], [`Suit`], [`Rank`]) — shared value objects.
//! - **Events** ([`ClientEvent`], [`ServerEvent`], [`ActionKind`]) — the
//!   typed message boundary between transport and core.
//! - **Views** ([`TableView`], [`SeatView`], [`Phase`]) — per-viewer
//!   redacted snapshots of table state.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages become bytes.
//!
//! The protocol layer knows nothing about sockets or game rules; it only
//! defines shapes and their serialization.

mod cards;
mod codec;
mod error;
mod types;
mod view;

pub use cards::{Card, Rank, Suit};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ActionKind, ClientEvent, ConnectionId, PlayerId, RoomId, ServerEvent};
pub use view::{Phase, RoomSummary, SeatView, TableView};
