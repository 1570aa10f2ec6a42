//! Corridor synthesis
//!
//! One straight floor strip per graph edge, running from the edge of one
//! room's footprint to the edge of the other's.

use glam::Vec3;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::debug;

use super::graph::{edge_key, RoomGraph};
use super::room::{Room, RoomId};

/// Ground-plane axis a corridor runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum CorridorAxis {
    X,
    Z,
}

/// Corridor strip between two connected rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    /// Lower room id of the pair
    pub from: RoomId,
    pub to: RoomId,
    /// Point on `from`'s footprint edge
    pub start: Vec3,
    /// Point on `to`'s footprint edge
    pub end: Vec3,
    pub axis: CorridorAxis,
    pub width: f32,
}

impl Corridor {
    /// Build the strip between two rooms
    pub fn between(a: &Room, b: &Room, width: f32) -> Self {
        let direction = a.direction_to(b);
        let start = a.center + direction * a.half_extent();
        let end = b.center - direction * b.half_extent();
        let axis = if direction.x.abs() > direction.z.abs() {
            CorridorAxis::X
        } else {
            CorridorAxis::Z
        };
        Self {
            from: a.id,
            to: b.id,
            start,
            end,
            axis,
            width,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.start + self.end) / 2.0
    }

    /// Distance between the two endpoints
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Strip extents: `length` along the long axis, `width` across it
    pub fn size(&self, thickness: f32) -> Vec3 {
        match self.axis {
            CorridorAxis::X => Vec3::new(self.length(), thickness, self.width),
            CorridorAxis::Z => Vec3::new(self.width, thickness, self.length()),
        }
    }

    /// Whether a ground-plane point lies on the strip
    pub fn contains_point(&self, point: Vec3) -> bool {
        let c = self.center();
        let size = self.size(0.0);
        (point.x - c.x).abs() <= size.x / 2.0 && (point.z - c.z).abs() <= size.z / 2.0
    }
}

/// One corridor per undirected edge
pub fn synthesize_corridors(graph: &RoomGraph, width: f32) -> Vec<Corridor> {
    let mut seen = HashSet::new();
    let mut corridors = Vec::new();

    for room in graph.rooms() {
        for &other_id in &room.neighbors {
            if !seen.insert(edge_key(room.id, other_id)) {
                continue;
            }
            let Some(other) = graph.get(other_id) else {
                continue;
            };
            let (a, b) = if room.id < other.id {
                (room, other)
            } else {
                (other, room)
            };
            let corridor = Corridor::between(a, b, width);
            debug!(
                from = corridor.from.index(),
                to = corridor.to.index(),
                axis = %corridor.axis,
                length = corridor.length(),
                "corridor"
            );
            corridors.push(corridor);
        }
    }
    corridors
}
