//! Serializable level export

use serde::{Deserialize, Serialize};

use crate::dungeon::{CorridorAxis, DoorMask, Room, RoomGeometry, RoomId, RoomType, Wall};
use crate::level::{GeneratedLevel, LevelStats};

/// One room as exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub room_type: RoomType,
    pub center: [f32; 3],
    pub footprint: f32,
    pub progression: usize,
    pub neighbors: Vec<RoomId>,
    pub parent: Option<RoomId>,
    pub doors: Vec<Wall>,
    pub wall_segments: usize,
    pub enemies: usize,
    pub loot: usize,
    pub decorations: usize,
    pub has_boss: bool,
}

impl RoomSummary {
    fn new(room: &Room, geometry: Option<&RoomGeometry>) -> Self {
        let doors = geometry.map_or(DoorMask::empty(), |g| g.doors);
        Self {
            id: room.id,
            room_type: room.room_type,
            center: room.center.to_array(),
            footprint: room.footprint,
            progression: room.progression,
            neighbors: room.neighbors.clone(),
            parent: room.parent,
            doors: doors.walls(),
            wall_segments: geometry.map_or(0, |g| g.segments.len()),
            enemies: room.contents.enemies.len(),
            loot: room.contents.loot.len(),
            decorations: room.contents.decorations.len(),
            has_boss: room.contents.boss.is_some(),
        }
    }
}

/// One corridor as exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorSummary {
    pub from: RoomId,
    pub to: RoomId,
    pub axis: CorridorAxis,
    pub start: [f32; 3],
    pub end: [f32; 3],
    pub width: f32,
}

/// Whole-level export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub seed: u64,
    pub epoch: u64,
    pub rooms: Vec<RoomSummary>,
    pub corridors: Vec<CorridorSummary>,
    pub stats: LevelStats,
}

impl LevelSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Rooms of one type
    pub fn rooms_of(&self, room_type: RoomType) -> impl Iterator<Item = &RoomSummary> {
        self.rooms.iter().filter(move |r| r.room_type == room_type)
    }
}

impl GeneratedLevel {
    pub fn summary(&self) -> LevelSummary {
        let rooms = self
            .graph
            .rooms()
            .iter()
            .map(|room| RoomSummary::new(room, self.geometry.get(room.id.index())))
            .collect();
        let corridors = self
            .corridors
            .iter()
            .map(|c| CorridorSummary {
                from: c.from,
                to: c.to,
                axis: c.axis,
                start: c.start.to_array(),
                end: c.end.to_array(),
                width: c.width,
            })
            .collect();
        LevelSummary {
            seed: self.seed,
            epoch: self.epoch,
            rooms,
            corridors,
            stats: self.stats,
        }
    }
}
