//! Generation constants
//!
//! Fixed tuning values that are not part of the per-run configuration.

/// Retries the placement resolver makes after the first collision
pub const PLACEMENT_RETRY_BUDGET: u32 = 10;

/// Extra distance, on top of the corridor width, a colliding candidate is pushed per retry
pub const PLACEMENT_STEP: f32 = 2.0;

/// Branch rooms are tested once and dropped on collision
pub const BRANCH_RETRY_BUDGET: u32 = 0;

/// Probability that the chain turns by 90 degrees at a room (rooms 2 and later)
pub const TURN_CHANCE: f32 = 0.4;

/// Probability that a spawned branch room is a treasure room
pub const BRANCH_TREASURE_CHANCE: f32 = 0.6;

/// Branch room footprint as a fraction of the base room size
pub const BRANCH_SIZE_FACTOR: f32 = 0.8;

/// A neighbor direction component above this magnitude carves the matching wall
pub const DOOR_DIRECTION_THRESHOLD: f32 = 0.3;

/// Door opening width on top of the corridor width
pub const DOOR_MARGIN: f32 = 1.0;

/// Wall pieces shorter than this are dropped instead of built
pub const MIN_WALL_SEGMENT: f32 = 0.5;

/// Wall thickness used for wall segment scale
pub const WALL_THICKNESS: f32 = 0.5;

/// Floor and corridor slab thickness
pub const FLOOR_THICKNESS: f32 = 0.2;

/// Items spawned are kept this far from the walls
pub const SPAWN_INSET: f32 = 1.0;

/// Height above the floor at which the player is placed
pub const PLAYER_SPAWN_HEIGHT: f32 = 1.0;

/// Map symbols used by the ASCII renderer
pub const S_STONE: char = ' ';
pub const S_FLOOR: char = '.';
pub const S_CORRIDOR: char = '#';
pub const S_VWALL: char = '|';
pub const S_HWALL: char = '-';
pub const S_START: char = '@';
pub const S_TREASURE: char = '$';
pub const S_BRANCH: char = 'b';
pub const S_BOSS: char = 'B';
pub const S_ENEMY: char = 'e';
