//! Wall and door carving
//!
//! Door openings are derived from the graph alone: a wall gets a centered gap
//! when a neighbor lies in its direction. A neighbor that is off-axis by more
//! than the threshold opens both of the walls it faces.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::debug;

use super::graph::RoomGraph;
use super::room::Room;
use crate::consts::{DOOR_DIRECTION_THRESHOLD, DOOR_MARGIN, MIN_WALL_SEGMENT};

/// Cardinal walls of a room (north is +Z, east is +X)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Wall {
    North,
    South,
    East,
    West,
}

impl Wall {
    /// Outward normal
    pub fn normal(self) -> Vec3 {
        match self {
            Wall::North => Vec3::Z,
            Wall::South => Vec3::NEG_Z,
            Wall::East => Vec3::X,
            Wall::West => Vec3::NEG_X,
        }
    }

    /// Direction the wall runs along
    pub fn tangent(self) -> Vec3 {
        match self {
            Wall::North | Wall::South => Vec3::X,
            Wall::East | Wall::West => Vec3::Z,
        }
    }

    /// Yaw in degrees that turns a unit wall piece (long along X) onto this wall
    pub fn yaw(self) -> f32 {
        match self {
            Wall::North | Wall::South => 0.0,
            Wall::East | Wall::West => 90.0,
        }
    }

    pub fn mask(self) -> DoorMask {
        match self {
            Wall::North => DoorMask::NORTH,
            Wall::South => DoorMask::SOUTH,
            Wall::East => DoorMask::EAST,
            Wall::West => DoorMask::WEST,
        }
    }
}

bitflags! {
    /// Walls of a room that carry a door
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct DoorMask: u8 {
        const NORTH = 0x01;
        const SOUTH = 0x02;
        const EAST = 0x04;
        const WEST = 0x08;
    }
}

impl DoorMask {
    pub fn has_door(self, wall: Wall) -> bool {
        self.contains(wall.mask())
    }

    /// Carved walls in North, South, East, West order
    pub fn walls(self) -> Vec<Wall> {
        Wall::iter().filter(|w| self.has_door(*w)).collect()
    }
}

/// Walls a single neighbor direction opens
///
/// The dominant axis always opens its wall; the other axis also opens one when
/// its component exceeds the threshold, so a diagonal neighbor carves two
/// adjacent walls.
pub fn doors_for_direction(direction: Vec3) -> DoorMask {
    let (dx, dz) = (direction.x, direction.z);
    let mut mask = DoorMask::empty();

    if dx.abs() >= dz.abs() || dx.abs() > DOOR_DIRECTION_THRESHOLD {
        if dx > 0.0 {
            mask |= DoorMask::EAST;
        } else if dx < 0.0 {
            mask |= DoorMask::WEST;
        }
    }
    if dz.abs() >= dx.abs() || dz.abs() > DOOR_DIRECTION_THRESHOLD {
        if dz > 0.0 {
            mask |= DoorMask::NORTH;
        } else if dz < 0.0 {
            mask |= DoorMask::SOUTH;
        }
    }
    mask
}

/// Union of the doors every neighbor of `room` opens
pub fn carve_doors(graph: &RoomGraph, room: &Room) -> DoorMask {
    let mut mask = DoorMask::empty();
    for &id in &room.neighbors {
        let Some(other) = graph.get(id) else {
            continue;
        };
        let direction = room.direction_to(other);
        let doors = doors_for_direction(direction);
        debug!(
            room = room.id.index(),
            neighbor = id.index(),
            dx = direction.x,
            dz = direction.z,
            doors = ?doors,
            "door detection"
        );
        mask |= doors;
    }
    mask
}

/// A built piece of wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub wall: Wall,
    pub center: Vec3,
    /// Extent along the wall's tangent
    pub length: f32,
}

/// Floor and wall pieces of one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomGeometry {
    pub doors: DoorMask,
    pub door_width: f32,
    pub segments: Vec<WallSegment>,
}

impl RoomGeometry {
    pub fn segments_on(&self, wall: Wall) -> impl Iterator<Item = &WallSegment> {
        self.segments.iter().filter(move |s| s.wall == wall)
    }
}

/// Opening width of every door
pub fn door_width(corridor_width: f32) -> f32 {
    corridor_width + DOOR_MARGIN
}

/// Segments of one wall: the full wall, or the two pieces flanking a centered door
pub fn wall_segments(
    room: &Room,
    wall: Wall,
    doors: DoorMask,
    door_width: f32,
) -> Vec<WallSegment> {
    let wall_length = room.footprint;
    let wall_center = room.center + wall.normal() * room.half_extent();

    if !doors.has_door(wall) {
        return vec![WallSegment {
            wall,
            center: wall_center,
            length: wall_length,
        }];
    }

    let side = (wall_length - door_width) / 2.0;
    if side < MIN_WALL_SEGMENT {
        return Vec::new();
    }
    let offset = door_width / 2.0 + side / 2.0;
    [-1.0_f32, 1.0]
        .into_iter()
        .map(|s| WallSegment {
            wall,
            center: wall_center + wall.tangent() * (offset * s),
            length: side,
        })
        .collect()
}

/// Carve doors for `room` and build its wall segments
pub fn build_room_geometry(graph: &RoomGraph, room: &Room, corridor_width: f32) -> RoomGeometry {
    let doors = carve_doors(graph, room);
    let width = door_width(corridor_width);
    let segments = Wall::iter()
        .flat_map(|wall| wall_segments(room, wall, doors, width))
        .collect();
    RoomGeometry {
        doors,
        door_width: width,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::room::{RoomId, RoomType};

    #[test]
    fn test_cardinal_directions() {
        assert_eq!(doors_for_direction(Vec3::X), DoorMask::EAST);
        assert_eq!(doors_for_direction(Vec3::NEG_X), DoorMask::WEST);
        assert_eq!(doors_for_direction(Vec3::Z), DoorMask::NORTH);
        assert_eq!(doors_for_direction(Vec3::NEG_Z), DoorMask::SOUTH);
        assert_eq!(doors_for_direction(Vec3::ZERO), DoorMask::empty());
    }

    #[test]
    fn test_diagonal_carves_two_walls() {
        let mask = doors_for_direction(Vec3::new(0.95, 0.0, 0.32));
        assert_eq!(mask, DoorMask::EAST | DoorMask::NORTH);
    }

    #[test]
    fn test_small_off_axis_component_ignored() {
        let mask = doors_for_direction(Vec3::new(-0.96, 0.0, 0.28));
        assert_eq!(mask, DoorMask::WEST);
    }

    #[test]
    fn test_exact_diagonal() {
        let d = Vec3::new(-1.0, 0.0, -1.0).normalize();
        assert_eq!(doors_for_direction(d), DoorMask::WEST | DoorMask::SOUTH);
    }

    #[test]
    fn test_mask_walls_order() {
        let mask = DoorMask::WEST | DoorMask::NORTH;
        assert_eq!(mask.walls(), vec![Wall::North, Wall::West]);
    }

    #[test]
    fn test_solid_wall_single_segment() {
        let room = Room::new(RoomId(0), Vec3::ZERO, 10.0, RoomType::Start);
        let segs = wall_segments(&room, Wall::South, DoorMask::empty(), 4.0);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].length, 10.0);
        assert_eq!(segs[0].center, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_door_splits_wall() {
        let room = Room::new(RoomId(0), Vec3::ZERO, 10.0, RoomType::Start);
        let segs = wall_segments(&room, Wall::East, DoorMask::EAST, 4.0);
        assert_eq!(segs.len(), 2);
        for s in &segs {
            assert_eq!(s.length, 3.0);
            assert_eq!(s.center.x, 5.0);
            assert_eq!(s.center.z.abs(), 3.5);
        }
    }

    #[test]
    fn test_slivers_dropped() {
        let room = Room::new(RoomId(0), Vec3::ZERO, 4.8, RoomType::Branch);
        // (4.8 - 4.0) / 2 = 0.4 < 0.5
        assert!(wall_segments(&room, Wall::North, DoorMask::NORTH, 4.0).is_empty());
    }

    #[test]
    fn test_geometry_from_graph() {
        let mut graph = RoomGraph::new();
        let a = graph.add_chain_room(Vec3::ZERO, 10.0, RoomType::Start);
        let b = graph.add_chain_room(Vec3::new(0.0, 0.0, 20.0), 10.0, RoomType::Normal);
        graph.attach(a, b);

        let geometry = build_room_geometry(&graph, graph.get(a).unwrap(), 3.0);
        assert_eq!(geometry.doors, DoorMask::NORTH);
        assert_eq!(geometry.door_width, 3.0 + DOOR_MARGIN);
        assert_eq!(geometry.segments_on(Wall::North).count(), 2);
        assert_eq!(geometry.segments.len(), 5);

        let geometry = build_room_geometry(&graph, graph.get(b).unwrap(), 3.0);
        assert_eq!(geometry.doors, DoorMask::SOUTH);
    }
}
