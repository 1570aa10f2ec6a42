//! Dungeon system
//!
//! Room graph, placement, corridors, door carving and population.

mod boss;
mod builder;
mod corridor;
mod graph;
mod placement;
mod population;
mod room;
mod walls;

pub use boss::append_boss_room;
pub use builder::{
    build_room_graph, planned_enemy_count, room_footprint, rotate_quarter, BuildReport,
    GenerationCursor,
};
pub use corridor::{synthesize_corridors, Corridor, CorridorAxis};
pub use graph::{edge_key, RoomGraph};
pub use placement::{collides, first_collision, resolve_position, resolve_with_budget, Placement};
pub use population::{
    decoration_count, enemy_cap, random_floor_point, spawn_enemy_count, Archetype,
    ArchetypeTable, LootEntry, LootTable, PopulationReport, Populator, MIN_UNLOCKED_WEIGHT,
};
pub use room::{Room, RoomContents, RoomId, RoomType};
pub use walls::{
    build_room_geometry, carve_doors, door_width, doors_for_direction, wall_segments, DoorMask,
    RoomGeometry, Wall, WallSegment,
};
