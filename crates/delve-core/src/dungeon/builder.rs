//! Room graph growth
//!
//! Grows the main chain room by room from a cursor that walks the ground
//! plane, occasionally turning by 90 degrees, and hangs branch rooms off the
//! side of the chain.

use glam::Vec3;
use tracing::{debug, info};

use super::graph::RoomGraph;
use super::placement::resolve_with_budget;
use super::population::enemy_cap;
use super::room::{RoomId, RoomType};
use crate::config::GenerationConfig;
use crate::consts::{
    BRANCH_RETRY_BUDGET, BRANCH_SIZE_FACTOR, BRANCH_TREASURE_CHANCE, PLACEMENT_RETRY_BUDGET,
    PLACEMENT_STEP, TURN_CHANCE,
};
use crate::rng::GameRng;

/// Rotate a ground-plane direction by a quarter turn; `sign` picks the side
pub fn rotate_quarter(direction: Vec3, sign: f32) -> Vec3 {
    Vec3::new(-direction.z * sign, 0.0, direction.x * sign)
}

/// Position and heading of the chain while it is being grown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationCursor {
    pub position: Vec3,
    /// Cardinal unit vector
    pub direction: Vec3,
}

impl GenerationCursor {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            direction: Vec3::Z,
        }
    }

    pub fn turn(&mut self, sign: f32) {
        self.direction = rotate_quarter(self.direction, sign);
    }

    pub fn advance(&mut self, distance: f32) {
        self.position += self.direction * distance;
    }
}

/// What happened while growing the graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub chain_length: usize,
    pub branches: usize,
    pub rejected_branches: usize,
    /// Chain rooms kept at a colliding position after the retry budget ran out
    pub contested_placements: usize,
}

/// Room type of chain room `index`
fn chain_room_type(index: usize, config: &GenerationConfig, rng: &mut GameRng) -> RoomType {
    if index == 0 {
        RoomType::Start
    } else if index >= 2 && rng.chance(config.empty_room_chance) {
        RoomType::Treasure
    } else {
        RoomType::Normal
    }
}

/// Enemy estimate used only to size chain room `index`
pub fn planned_enemy_count(index: usize, config: &GenerationConfig, rng: &mut GameRng) -> u32 {
    let lo = index.max(1) as u32;
    let hi = enemy_cap(config, index as i32).max(lo);
    rng.range_inclusive(lo, hi)
}

/// Footprint of a chain room planned for `enemies` enemies
pub fn room_footprint(config: &GenerationConfig, enemies: u32) -> f32 {
    (config.base_room_size + enemies as f32 * config.size_increase_per_enemy)
        .min(config.max_room_size)
}

/// Grow the main chain and its branch rooms
pub fn build_room_graph(config: &GenerationConfig, rng: &mut GameRng) -> (RoomGraph, BuildReport) {
    let mut graph = RoomGraph::new();
    let mut report = BuildReport::default();

    let chain_length = rng.range_inclusive(config.min_rooms, config.max_rooms) as usize;
    report.chain_length = chain_length;

    let mut cursor = GenerationCursor::new(Vec3::new(0.0, config.floor_height, 0.0));
    let mut previous: Option<RoomId> = None;

    for i in 0..chain_length {
        let room_type = chain_room_type(i, config, rng);
        let planned = if room_type.has_enemies() {
            planned_enemy_count(i, config, rng)
        } else {
            0
        };
        let footprint = room_footprint(config, planned);

        let placement = resolve_with_budget(
            cursor.position,
            graph.rooms(),
            footprint,
            config.corridor_width,
            cursor.direction,
            PLACEMENT_RETRY_BUDGET,
        );
        if !placement.clear {
            report.contested_placements += 1;
        }

        let id = graph.add_chain_room(placement.position, footprint, room_type);
        if let Some(room) = graph.get_mut(id) {
            room.progression = i;
            room.planned_enemies = planned;
        }
        if let Some(prev) = previous {
            graph.attach(prev, id);
        }
        debug!(
            room = id.index(),
            %room_type,
            footprint,
            planned_enemies = planned,
            attempts = placement.attempts,
            x = placement.position.x,
            z = placement.position.z,
            "placed chain room"
        );

        if i >= 2 && rng.chance(TURN_CHANCE) {
            let sign = rng.sign();
            cursor.turn(sign);
            debug!(room = id.index(), sign, "chain turned");
        }

        if i >= 1 && i + 3 <= chain_length && rng.chance(config.branch_chance) {
            match try_spawn_branch(&mut graph, id, cursor.direction, i, config, rng) {
                Some(_) => report.branches += 1,
                None => report.rejected_branches += 1,
            }
        }

        cursor.position = placement.position;
        cursor.advance(footprint + config.corridor_width);
        previous = Some(id);
    }

    info!(
        chain = report.chain_length,
        branches = report.branches,
        rejected_branches = report.rejected_branches,
        contested = report.contested_placements,
        "room graph built"
    );
    (graph, report)
}

/// Place one branch room beside `anchor`, perpendicular to `direction`
///
/// The candidate is tested with the base room size and is dropped on the
/// first collision.
fn try_spawn_branch(
    graph: &mut RoomGraph,
    anchor: RoomId,
    direction: Vec3,
    index: usize,
    config: &GenerationConfig,
    rng: &mut GameRng,
) -> Option<RoomId> {
    let side = rng.sign();
    let perpendicular = rotate_quarter(direction, side);
    let anchor_room = graph.get(anchor)?;
    let offset = (anchor_room.footprint + config.base_room_size) / 2.0
        + config.corridor_width
        + PLACEMENT_STEP;
    let candidate = anchor_room.center + perpendicular * offset;

    let placement = resolve_with_budget(
        candidate,
        graph.rooms(),
        config.base_room_size,
        config.corridor_width,
        perpendicular,
        BRANCH_RETRY_BUDGET,
    );
    if !placement.clear {
        debug!(anchor = anchor.index(), "branch rejected: collision");
        return None;
    }

    let room_type = if rng.chance(BRANCH_TREASURE_CHANCE) {
        RoomType::Treasure
    } else {
        RoomType::Branch
    };
    let footprint = BRANCH_SIZE_FACTOR * config.base_room_size;
    let id = graph.add_room(placement.position, footprint, room_type);
    if let Some(room) = graph.get_mut(id) {
        room.progression = index;
    }
    graph.attach(anchor, id);
    debug!(
        room = id.index(),
        anchor = anchor.index(),
        %room_type,
        "placed branch room"
    );
    Some(id)
}
