use std::collections::HashMap;

use holdem_protocol::{ConnectionId, RoomId, RoomSummary};
use tracing::info;

use crate::table::GameTable;

/// All live tables, keyed by room id. Owned by the caller and handed around
/// explicitly; there is no global instance.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    tables: HashMap<RoomId, GameTable>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a room, creating it on first reference.
    pub fn find_or_create(&mut self, room_id: &RoomId) -> &mut GameTable {
        self.tables.entry(room_id.clone()).or_insert_with(|| {
            info!(%room_id, "room created");
            GameTable::new(room_id.clone())
        })
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&GameTable> {
        self.tables.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut GameTable> {
        self.tables.get_mut(room_id)
    }

    /// Drop the room if its last seat has emptied. Returns true on removal.
    pub fn remove_if_empty(&mut self, room_id: &RoomId) -> bool {
        let emptied = self.tables.get(room_id).is_some_and(GameTable::is_empty);
        if emptied {
            self.tables.remove(room_id);
            info!(%room_id, "room destroyed");
        }
        emptied
    }

    /// Summaries of every live room, ordered by room id.
    pub fn list(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<RoomSummary> =
            self.tables.values().map(GameTable::summary).collect();
        summaries.sort_by(|a, b| a.room_id.0.cmp(&b.room_id.0));
        summaries
    }

    /// Unseat every player whose connection fails the liveness check and
    /// drop rooms that empty out. Returns the surviving rooms that lost at
    /// least one seat, so the caller can push refreshed state to them.
    pub fn sweep_dead(&mut self, alive: impl Fn(ConnectionId) -> bool) -> Vec<RoomId> {
        let mut changed = Vec::new();
        for (room_id, table) in &mut self.tables {
            if table.remove_dead(&alive) > 0 {
                changed.push(room_id.clone());
            }
        }
        self.tables.retain(|room_id, table| {
            if table.is_empty() {
                info!(%room_id, "room destroyed");
                false
            } else {
                true
            }
        });
        changed.retain(|room_id| self.tables.contains_key(room_id));
        changed.sort_by(|a, b| a.0.cmp(&b.0));
        changed
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_protocol::Phase;

    fn room(id: &str) -> RoomId {
        RoomId(id.into())
    }

    #[test]
    fn find_or_create_is_idempotent() {
        let mut registry = RoomRegistry::new();
        registry
            .find_or_create(&room("R1"))
            .add_player("alice", ConnectionId::new(1))
            .unwrap();
        let table = registry.find_or_create(&room("R1"));
        assert_eq!(table.player_count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_if_empty_only_drops_vacant_rooms() {
        let mut registry = RoomRegistry::new();
        registry
            .find_or_create(&room("R1"))
            .add_player("alice", ConnectionId::new(1))
            .unwrap();
        assert!(!registry.remove_if_empty(&room("R1")));
        registry
            .get_mut(&room("R1"))
            .unwrap()
            .remove_connection(ConnectionId::new(1));
        assert!(registry.remove_if_empty(&room("R1")));
        assert!(registry.is_empty());
    }

    #[test]
    fn list_is_sorted_by_room_id() {
        let mut registry = RoomRegistry::new();
        registry.find_or_create(&room("zulu"));
        registry.find_or_create(&room("alpha"));
        let summaries = registry.list();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].room_id, room("alpha"));
        assert_eq!(summaries[1].room_id, room("zulu"));
        assert_eq!(summaries[0].phase, Phase::Waiting);
    }

    #[test]
    fn sweep_removes_dead_seats_and_empty_rooms() {
        let mut registry = RoomRegistry::new();
        {
            let table = registry.find_or_create(&room("R1"));
            table.add_player("alice", ConnectionId::new(1)).unwrap();
            table.add_player("bob", ConnectionId::new(2)).unwrap();
        }
        registry
            .find_or_create(&room("R2"))
            .add_player("carol", ConnectionId::new(3))
            .unwrap();

        // Connection 2 and 3 are dead: R1 survives with one seat, R2 empties.
        let changed = registry.sweep_dead(|conn| conn == ConnectionId::new(1));
        assert_eq!(changed, vec![room("R1")]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&room("R1")).unwrap().player_count(), 1);
        assert!(registry.get(&room("R2")).is_none());
    }

    #[test]
    fn sweep_with_all_connections_alive_changes_nothing() {
        let mut registry = RoomRegistry::new();
        registry
            .find_or_create(&room("R1"))
            .add_player("alice", ConnectionId::new(1))
            .unwrap();
        let changed = registry.sweep_dead(|_| true);
        assert!(changed.is_empty());
        assert_eq!(registry.len(), 1);
    }
}
