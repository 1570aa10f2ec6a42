//! Boss room
//!
//! Appended once after the chain is complete, straight ahead of the last chain
//! room. No collision search is done: the boss room always exists when the
//! chain does.

use glam::Vec3;
use tracing::{error, info};

use super::graph::RoomGraph;
use super::room::{RoomId, RoomType};
use crate::config::GenerationConfig;

/// Append the boss room after the last chain room
///
/// Returns `None` (and logs) when the graph has no chain to extend.
pub fn append_boss_room(graph: &mut RoomGraph, config: &GenerationConfig) -> Option<RoomId> {
    let chain = graph.chain();
    let Some(&last_id) = chain.last() else {
        error!("cannot append boss room: room graph is empty");
        return None;
    };
    let last = graph.get(last_id)?;

    let direction = if chain.len() >= 2 {
        let before = graph.get(chain[chain.len() - 2])?;
        let d = (last.center - before.center).normalize_or_zero();
        if d == Vec3::ZERO { Vec3::Z } else { d }
    } else {
        Vec3::Z
    };

    let footprint = config.max_room_size * config.boss_room_size_multiplier;
    let distance = last.half_extent() + config.corridor_width + footprint / 2.0;
    let center = last.center + direction * distance;
    let progression = chain.len();

    let id = graph.add_room(center, footprint, RoomType::Boss);
    if let Some(room) = graph.get_mut(id) {
        room.progression = progression;
    }
    graph.attach(last_id, id);
    info!(
        room = id.index(),
        attached_to = last_id.index(),
        footprint,
        x = center.x,
        z = center.z,
        "boss room appended"
    );
    Some(id)
}
