//! Room placement
//!
//! Pushes a candidate room along a direction until it stops colliding with the
//! rooms already placed, or the retry budget runs out. An exhausted budget is
//! not an error: the last tested position is returned and the caller builds
//! a possibly overlapping room.

use glam::Vec3;
use tracing::debug;

use super::room::Room;
use crate::consts::{PLACEMENT_RETRY_BUDGET, PLACEMENT_STEP};

/// Outcome of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Last tested position
    pub position: Vec3,
    /// Positions tested, including the first candidate
    pub attempts: u32,
    /// Whether `position` is free of collisions
    pub clear: bool,
}

/// Whether a room of `footprint` at `position` collides with `other`
pub fn collides(position: Vec3, footprint: f32, other: &Room, corridor_width: f32) -> bool {
    let min_distance = (footprint + other.footprint) / 2.0 + corridor_width;
    position.distance(other.center) < min_distance
}

/// First room that a room of `footprint` at `position` collides with
pub fn first_collision<'a>(
    position: Vec3,
    footprint: f32,
    rooms: &'a [Room],
    corridor_width: f32,
) -> Option<&'a Room> {
    rooms
        .iter()
        .find(|r| collides(position, footprint, r, corridor_width))
}

/// Search with an explicit retry budget
///
/// Tests `candidate`, then on each collision advances by
/// `corridor_width + PLACEMENT_STEP` along `direction`, up to `retries` times.
pub fn resolve_with_budget(
    candidate: Vec3,
    rooms: &[Room],
    footprint: f32,
    corridor_width: f32,
    direction: Vec3,
    retries: u32,
) -> Placement {
    let step = direction * (corridor_width + PLACEMENT_STEP);
    let mut position = candidate;

    for attempt in 0..=retries {
        match first_collision(position, footprint, rooms, corridor_width) {
            None => {
                return Placement {
                    position,
                    attempts: attempt + 1,
                    clear: true,
                };
            }
            Some(other) => {
                debug!(
                    attempt,
                    blocking_room = other.id.index(),
                    x = position.x,
                    z = position.z,
                    "placement collision"
                );
                if attempt < retries {
                    position += step;
                }
            }
        }
    }

    debug!(
        retries,
        x = position.x,
        z = position.z,
        "placement budget exhausted, keeping last position"
    );
    Placement {
        position,
        attempts: retries + 1,
        clear: false,
    }
}

/// Best-effort position for a room, with the standard retry budget
pub fn resolve_position(
    candidate: Vec3,
    rooms: &[Room],
    footprint: f32,
    corridor_width: f32,
    direction: Vec3,
) -> Vec3 {
    resolve_with_budget(
        candidate,
        rooms,
        footprint,
        corridor_width,
        direction,
        PLACEMENT_RETRY_BUDGET,
    )
    .position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::room::{RoomId, RoomType};

    fn room_at(id: usize, x: f32, z: f32, size: f32) -> Room {
        Room::new(RoomId(id), Vec3::new(x, 0.0, z), size, RoomType::Normal)
    }

    #[test]
    fn test_collision_threshold() {
        let other = room_at(0, 0.0, 0.0, 10.0);
        // (10 + 10) / 2 + 3 = 13
        assert!(collides(Vec3::new(12.9, 0.0, 0.0), 10.0, &other, 3.0));
        assert!(!collides(Vec3::new(13.0, 0.0, 0.0), 10.0, &other, 3.0));
    }

    #[test]
    fn test_clear_candidate_untouched() {
        let rooms = vec![room_at(0, 0.0, 0.0, 10.0)];
        let candidate = Vec3::new(0.0, 0.0, 40.0);
        let placement = resolve_with_budget(candidate, &rooms, 10.0, 3.0, Vec3::Z, 10);
        assert_eq!(placement.position, candidate);
        assert_eq!(placement.attempts, 1);
        assert!(placement.clear);
    }

    #[test]
    fn test_pushes_along_direction() {
        let rooms = vec![room_at(0, 0.0, 0.0, 10.0)];
        // Needs 13 units of clearance; each retry moves 3 + 2 = 5
        let placement =
            resolve_with_budget(Vec3::new(0.0, 0.0, 5.0), &rooms, 10.0, 3.0, Vec3::Z, 10);
        assert!(placement.clear);
        assert_eq!(placement.attempts, 3);
        assert_eq!(placement.position, Vec3::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn test_exhausted_budget_returns_last_tested() {
        let rooms = vec![room_at(0, 0.0, 0.0, 200.0)];
        let placement = resolve_with_budget(Vec3::ZERO, &rooms, 10.0, 3.0, Vec3::X, 10);
        assert!(!placement.clear);
        assert_eq!(placement.attempts, 11);
        // Ten retries of 5 units each
        assert_eq!(placement.position, Vec3::new(50.0, 0.0, 0.0));
        assert_eq!(
            resolve_position(Vec3::ZERO, &rooms, 10.0, 3.0, Vec3::X),
            placement.position
        );
    }

    #[test]
    fn test_zero_budget_tests_once() {
        let rooms = vec![room_at(0, 0.0, 0.0, 10.0)];
        let placement =
            resolve_with_budget(Vec3::new(1.0, 0.0, 0.0), &rooms, 10.0, 3.0, Vec3::X, 0);
        assert!(!placement.clear);
        assert_eq!(placement.attempts, 1);
        assert_eq!(placement.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_no_rooms_is_clear() {
        let placement = resolve_with_budget(Vec3::ZERO, &[], 10.0, 3.0, Vec3::Z, 10);
        assert!(placement.clear);
    }
}
