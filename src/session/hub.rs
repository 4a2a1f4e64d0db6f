// src/session/hub.rs

use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::session::events::ServerEvent;

pub type ConnectionId = Uuid;

/// Connection registry grouping real-time clients into rooms keyed by game id.
#[derive(Default)]
pub struct RoomHub {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
    members: DashMap<i64, HashSet<ConnectionId>>,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection and returns the receiving end of its outbound queue.
    pub fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(id, tx);
        (id, rx)
    }

    /// Adds `connection` to the room of `game_id`.
    pub fn subscribe(&self, connection: ConnectionId, game_id: i64) {
        self.members.entry(game_id).or_default().insert(connection);
    }

    /// Forgets `connection` and drops it from every room it joined.
    pub fn disconnect(&self, connection: ConnectionId) {
        self.connections.remove(&connection);
        for mut room in self.members.iter_mut() {
            room.value_mut().remove(&connection);
        }
        self.members.retain(|_, conns| !conns.is_empty());
    }

    /// Queues `event` for a single connection.
    pub fn send_to(&self, connection: ConnectionId, event: ServerEvent) {
        let Some(tx) = self.connections.get(&connection) else {
            tracing::debug!(%connection, event = event.name(), "dropping event for unknown connection");
            return;
        };
        if tx.send(event).is_err() {
            tracing::debug!(%connection, "connection writer closed");
        }
    }

    /// Queues `event` for every connection subscribed to `game_id`.
    pub fn broadcast(&self, game_id: i64, event: ServerEvent) {
        let Some(room) = self.members.get(&game_id) else {
            return;
        };
        for connection in room.value() {
            if let Some(tx) = self.connections.get(connection) {
                let _ = tx.send(event.clone());
            }
        }
    }

    pub fn room_size(&self, game_id: i64) -> usize {
        self.members.get(&game_id).map(|r| r.len()).unwrap_or(0)
    }

    /// Drops the subscriptions of an evicted room.
    pub fn close_room(&self, game_id: i64) {
        self.members.remove(&game_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ping() -> ServerEvent {
        ServerEvent::QuizError {
            error: "ping".to_string(),
        }
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_room_members() {
        let hub = RoomHub::new();
        let (a, mut rx_a) = hub.connect();
        let (b, mut rx_b) = hub.connect();
        let (_c, mut rx_c) = hub.connect();
        hub.subscribe(a, 1);
        hub.subscribe(b, 1);

        hub.broadcast(1, ping());

        assert_eq!(rx_a.recv().await, Some(ping()));
        assert_eq!(rx_b.recv().await, Some(ping()));
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_leaves_rooms() {
        let hub = RoomHub::new();
        let (a, _rx_a) = hub.connect();
        let (b, mut rx_b) = hub.connect();
        hub.subscribe(a, 1);
        hub.subscribe(a, 2);
        hub.subscribe(b, 1);

        hub.disconnect(a);
        assert_eq!(hub.room_size(1), 1);
        assert_eq!(hub.room_size(2), 0);

        hub.broadcast(1, ping());
        assert_eq!(rx_b.recv().await, Some(ping()));
    }

    #[tokio::test]
    async fn test_send_to_single_connection() {
        let hub = RoomHub::new();
        let (a, mut rx_a) = hub.connect();
        let (b, mut rx_b) = hub.connect();
        hub.subscribe(a, 3);
        hub.subscribe(b, 3);

        hub.send_to(b, ping());
        assert_eq!(rx_b.recv().await, Some(ping()));
        assert!(rx_a.try_recv().is_err());
    }
}
