//! Periodic reaper for seats whose connections died without a clean close.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::server::{ServerState, Shared};

/// Runs [`sweep_once`] forever on a fixed interval.
pub async fn run_sweeper(state: Arc<ServerState>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        sweep_once(&state).await;
    }
}

/// Unseats every player whose outbox has closed, drops rooms that empty
/// out, and pushes refreshed state to the rooms that lost a seat. Returns
/// the number of affected rooms.
pub async fn sweep_once(state: &Arc<ServerState>) -> usize {
    let mut guard = state.shared.lock().await;
    let Shared { registry, sync, memberships } = &mut *guard;

    let changed = registry.sweep_dead(|conn| sync.is_alive(conn));
    memberships.retain(|conn, _| sync.is_alive(*conn));
    if changed.is_empty() {
        return 0;
    }
    tracing::info!(rooms = changed.len(), "sweep removed dead connections");

    for room_id in &changed {
        if let Some(table) = registry.get(room_id) {
            sync.broadcast_state(table);
        }
    }
    changed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_protocol::{ConnectionId, RoomId, ServerEvent};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn sweep_unseats_dead_connections_and_refreshes_survivors() {
        let state = crate::server::ServerState::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let room = RoomId("R1".into());
        {
            let mut guard = state.shared.lock().await;
            let shared = &mut *guard;
            shared.sync.register(ConnectionId::new(1), tx1);
            shared.sync.register(ConnectionId::new(2), tx2);
            let table = shared.registry.find_or_create(&room);
            table.add_player("alice", ConnectionId::new(1)).unwrap();
            table.add_player("bob", ConnectionId::new(2)).unwrap();
            shared.memberships.insert(ConnectionId::new(1), room.clone());
            shared.memberships.insert(ConnectionId::new(2), room.clone());
        }

        // Nothing dead yet.
        assert_eq!(sweep_once(&state).await, 0);

        drop(rx2);
        assert_eq!(sweep_once(&state).await, 1);

        let guard = state.shared.lock().await;
        let table = guard.registry.get(&room).unwrap();
        assert_eq!(table.player_count(), 1);
        assert!(!guard.memberships.contains_key(&ConnectionId::new(2)));
        drop(guard);

        // The survivor got a refreshed view.
        assert!(matches!(
            rx1.try_recv().unwrap(),
            ServerEvent::StateUpdated { .. }
        ));
    }

    #[tokio::test]
    async fn sweep_drops_rooms_that_empty_out() {
        let state = crate::server::ServerState::new();
        let room = RoomId("R1".into());
        {
            let mut guard = state.shared.lock().await;
            let shared = &mut *guard;
            let (tx, rx) = mpsc::unbounded_channel();
            drop(rx);
            shared.sync.register(ConnectionId::new(1), tx);
            shared
                .registry
                .find_or_create(&room)
                .add_player("alice", ConnectionId::new(1))
                .unwrap();
            shared.memberships.insert(ConnectionId::new(1), room.clone());
        }

        sweep_once(&state).await;
        let guard = state.shared.lock().await;
        assert!(guard.registry.get(&room).is_none());
        assert!(guard.memberships.is_empty());
    }
}
