//! Room types and structures
//!
//! A room is a passive node of the room graph. Everything that acts on rooms
//! lives in the builder, carver and population modules.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::spawn::EntityHandle;

/// Stable index of a room in its graph, assigned in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub usize);

impl RoomId {
    /// The start room is always created first
    pub const START: RoomId = RoomId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Room types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomType {
    /// First room of the chain, where the player spawns
    Start,
    /// Chain room with enemies
    #[default]
    Normal,
    /// Loot room without enemies
    Treasure,
    /// Leaf room hanging off the chain, with enemies
    Branch,
    /// Terminal room holding the boss
    Boss,
}

impl RoomType {
    /// Rooms whose population includes regular enemies
    pub fn has_enemies(self) -> bool {
        matches!(self, RoomType::Normal | RoomType::Branch)
    }

    /// Get description for this room type
    pub fn description(self) -> &'static str {
        match self {
            RoomType::Start => "Starting room",
            RoomType::Normal => "Room with enemies",
            RoomType::Treasure => "Treasure room",
            RoomType::Branch => "Side room with enemies",
            RoomType::Boss => "Boss chamber",
        }
    }
}

/// Entities spawned for a room during one generation
///
/// Runtime only: never serialized and cleared on regeneration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomContents {
    /// Container holding the floor and walls
    pub geometry: Option<EntityHandle>,
    /// Floor and wall pieces spawned without any parent to own them
    pub geometry_parts: Vec<EntityHandle>,
    pub enemies: Vec<EntityHandle>,
    pub loot: Vec<EntityHandle>,
    pub decorations: Vec<EntityHandle>,
    /// Boss or placeholder marker
    pub boss: Option<EntityHandle>,
}

impl RoomContents {
    pub fn entity_count(&self) -> usize {
        self.geometry.iter().count()
            + self.geometry_parts.len()
            + self.enemies.len()
            + self.loot.len()
            + self.decorations.len()
            + self.boss.iter().count()
    }
}

/// A square room on the ground plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Center of the floor; y is the level's ground plane
    pub center: Vec3,
    /// Edge length of the square footprint
    pub footprint: f32,
    pub room_type: RoomType,
    /// Connected rooms; symmetric, never shrinks
    pub neighbors: Vec<RoomId>,
    /// The room this one was attached to when created (None for the start room)
    pub parent: Option<RoomId>,
    /// Room index fed to the difficulty curve
    pub progression: usize,
    /// Enemy estimate used to size the room
    pub planned_enemies: u32,
    #[serde(skip)]
    pub contents: RoomContents,
}

impl Room {
    pub fn new(id: RoomId, center: Vec3, footprint: f32, room_type: RoomType) -> Self {
        Self {
            id,
            center,
            footprint,
            room_type,
            neighbors: Vec::new(),
            parent: None,
            progression: 0,
            planned_enemies: 0,
            contents: RoomContents::default(),
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.footprint / 2.0
    }

    pub fn area(&self) -> f32 {
        self.footprint * self.footprint
    }

    pub fn is_connected_to(&self, other: RoomId) -> bool {
        self.neighbors.contains(&other)
    }

    /// Whether a point lies on this room's floor (x/z only)
    pub fn contains_point(&self, point: Vec3) -> bool {
        let h = self.half_extent();
        (point.x - self.center.x).abs() <= h && (point.z - self.center.z).abs() <= h
    }

    /// Unit vector on the ground plane from this room's center toward `other`
    pub fn direction_to(&self, other: &Room) -> Vec3 {
        let d = other.center - self.center;
        Vec3::new(d.x, 0.0, d.z).normalize_or_zero()
    }
}
