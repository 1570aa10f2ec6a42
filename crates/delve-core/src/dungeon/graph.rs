//! Room graph arena
//!
//! Rooms live in a `Vec` indexed by [`RoomId`]; edges are neighbor id lists
//! kept symmetric by [`RoomGraph::link`].

use std::collections::VecDeque;

use glam::Vec3;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::room::{Room, RoomId, RoomType};

/// Unordered pair key for an undirected edge
pub fn edge_key(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// All rooms of one generation plus their connectivity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    /// Main chain in order, start room first
    chain: Vec<RoomId>,
}

impl RoomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room with the next id
    pub fn add_room(&mut self, center: Vec3, footprint: f32, room_type: RoomType) -> RoomId {
        let id = RoomId(self.rooms.len());
        self.rooms.push(Room::new(id, center, footprint, room_type));
        id
    }

    /// Create a room that extends the main chain
    pub fn add_chain_room(&mut self, center: Vec3, footprint: f32, room_type: RoomType) -> RoomId {
        let id = self.add_room(center, footprint, room_type);
        self.chain.push(id);
        id
    }

    /// Connect `child` to `parent` in both directions and record the parent edge
    pub fn attach(&mut self, parent: RoomId, child: RoomId) {
        self.link(parent, child);
        if let Some(room) = self.rooms.get_mut(child.index()) {
            room.parent = Some(parent);
        }
    }

    /// Add an undirected edge. Self-loops and duplicates are ignored.
    pub fn link(&mut self, a: RoomId, b: RoomId) {
        if a == b || a.index() >= self.rooms.len() || b.index() >= self.rooms.len() {
            return;
        }
        if !self.rooms[a.index()].neighbors.contains(&b) {
            self.rooms[a.index()].neighbors.push(b);
        }
        if !self.rooms[b.index()].neighbors.contains(&a) {
            self.rooms[b.index()].neighbors.push(a);
        }
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id.index())
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut [Room] {
        &mut self.rooms
    }

    pub fn chain(&self) -> &[RoomId] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn start(&self) -> Option<&Room> {
        self.rooms.first()
    }

    /// The boss room, if one was appended
    pub fn boss(&self) -> Option<&Room> {
        self.rooms.iter().find(|r| r.room_type == RoomType::Boss)
    }

    pub fn count_type(&self, room_type: RoomType) -> usize {
        self.rooms.iter().filter(|r| r.room_type == room_type).count()
    }

    /// Every undirected edge exactly once, in first-visit order
    pub fn edges(&self) -> Vec<(RoomId, RoomId)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for room in &self.rooms {
            for &other in &room.neighbors {
                let key = edge_key(room.id, other);
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Rooms reachable from the start room by neighbor traversal
    pub fn reachable_from_start(&self) -> usize {
        if self.rooms.is_empty() {
            return 0;
        }
        let mut visited = vec![false; self.rooms.len()];
        let mut queue = VecDeque::from([RoomId::START]);
        visited[0] = true;
        let mut count = 0;
        while let Some(id) = queue.pop_front() {
            count += 1;
            for &n in &self.rooms[id.index()].neighbors {
                if !visited[n.index()] {
                    visited[n.index()] = true;
                    queue.push_back(n);
                }
            }
        }
        count
    }

    /// Tree check: connected and exactly `rooms - 1` edges
    pub fn is_tree(&self) -> bool {
        if self.rooms.is_empty() {
            return true;
        }
        self.edge_count() == self.rooms.len() - 1 && self.reachable_from_start() == self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> RoomGraph {
        let mut graph = RoomGraph::new();
        for i in 0..n {
            let center = Vec3::new(0.0, 0.0, i as f32 * 10.0);
            let id = graph.add_chain_room(center, 4.0, RoomType::Normal);
            if i > 0 {
                graph.attach(RoomId(i - 1), id);
            }
        }
        graph
    }

    #[test]
    fn test_link_is_symmetric_and_deduplicated() {
        let mut graph = path(2);
        graph.link(RoomId(1), RoomId(0));
        graph.link(RoomId(0), RoomId(0));
        assert_eq!(graph.get(RoomId(0)).unwrap().neighbors, vec![RoomId(1)]);
        assert_eq!(graph.get(RoomId(1)).unwrap().neighbors, vec![RoomId(0)]);
        assert_eq!(graph.get(RoomId(1)).unwrap().parent, Some(RoomId(0)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_edges_unique() {
        let graph = path(5);
        let edges = graph.edges();
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|(a, b)| a < b));
    }

    #[test]
    fn test_tree_detection() {
        let mut graph = path(4);
        assert!(graph.is_tree());
        assert_eq!(graph.reachable_from_start(), 4);

        graph.link(RoomId(0), RoomId(3));
        assert!(!graph.is_tree());

        let mut split = path(2);
        split.add_room(Vec3::ZERO, 4.0, RoomType::Branch);
        assert!(!split.is_tree());
    }

    #[test]
    fn test_empty_graph() {
        let graph = RoomGraph::new();
        assert!(graph.is_tree());
        assert!(graph.start().is_none());
        assert_eq!(graph.reachable_from_start(), 0);
    }

    #[test]
    fn test_edge_key_unordered() {
        assert_eq!(edge_key(RoomId(3), RoomId(1)), edge_key(RoomId(1), RoomId(3)));
    }
}
