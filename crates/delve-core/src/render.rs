//! ASCII map of a generated level
//!
//! One character cell per `cell_size` world units on the ground plane, north
//! (+Z) up and east (+X) right. Corridors are drawn first, then each room's
//! floor and built wall segments, then a marker at each room center.

use std::fmt;

use glam::Vec3;

use crate::consts::{
    S_BOSS, S_BRANCH, S_CORRIDOR, S_ENEMY, S_FLOOR, S_HWALL, S_START, S_STONE, S_TREASURE,
    S_VWALL,
};
use crate::dungeon::{Corridor, Room, RoomGeometry, RoomType, Wall};
use crate::level::GeneratedLevel;

/// World units per character cell
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Widest or tallest map in cells; smaller cell sizes are raised to fit
pub const MAX_MAP_SIDE: usize = 1024;

/// Marker drawn at a room's center
pub fn room_symbol(room: &Room) -> char {
    match room.room_type {
        RoomType::Start => S_START,
        RoomType::Treasure => S_TREASURE,
        RoomType::Branch => S_BRANCH,
        RoomType::Boss => S_BOSS,
        RoomType::Normal if !room.contents.enemies.is_empty() => S_ENEMY,
        RoomType::Normal => S_FLOOR,
    }
}

/// A rasterized level
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiMap {
    width: usize,
    height: usize,
    min_x: f32,
    max_z: f32,
    cell_size: f32,
    cells: Vec<char>,
}

impl AsciiMap {
    /// Blank map covering the ground-plane box `min..=max`
    fn blank(min: Vec3, max: Vec3, cell_size: f32) -> Self {
        let width = ((max.x - min.x) / cell_size).ceil() as usize + 1;
        let height = ((max.z - min.z) / cell_size).ceil() as usize + 1;
        Self {
            width,
            height,
            min_x: min.x,
            max_z: max.z,
            cell_size,
            cells: vec![S_STONE; width * height],
        }
    }

    /// Rasterize a finished level
    pub fn render(level: &GeneratedLevel, cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        let rooms = level.graph.rooms();
        let Some((min, max)) = bounds(rooms, &level.corridors) else {
            return Self::blank(Vec3::ZERO, Vec3::ZERO, cell_size);
        };
        // Margin and rounding add up to four cells per side
        let extent = max - min;
        let cell_size = cell_size.max(extent.x.max(extent.z) / (MAX_MAP_SIDE - 4) as f32);
        let margin = Vec3::new(cell_size, 0.0, cell_size);
        let mut map = Self::blank(min - margin, max + margin, cell_size);

        for corridor in &level.corridors {
            map.draw_corridor(corridor);
        }
        for (room, geometry) in rooms.iter().zip(&level.geometry) {
            map.draw_room(room, geometry);
        }
        for room in rooms {
            let (col, row) = map.cell_of(room.center);
            map.set(col, row, room_symbol(room));
        }
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col < self.width && row < self.height {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Character at a world position
    pub fn at(&self, position: Vec3) -> Option<char> {
        let (col, row) = self.cell_of(position);
        if col < 0 || row < 0 {
            return None;
        }
        self.get(col as usize, row as usize)
    }

    /// Occurrences of `symbol` on the map
    pub fn count(&self, symbol: char) -> usize {
        self.cells.iter().filter(|&&c| c == symbol).count()
    }

    fn set(&mut self, col: isize, row: isize, symbol: char) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = symbol;
        }
    }

    fn cell_of(&self, position: Vec3) -> (isize, isize) {
        let col = ((position.x - self.min_x) / self.cell_size).round() as isize;
        let row = ((self.max_z - position.z) / self.cell_size).round() as isize;
        (col, row)
    }

    fn position_of(&self, col: isize, row: isize) -> Vec3 {
        Vec3::new(
            self.min_x + col as f32 * self.cell_size,
            0.0,
            self.max_z - row as f32 * self.cell_size,
        )
    }

    fn draw_corridor(&mut self, corridor: &Corridor) {
        let half = corridor.size(0.0) / 2.0;
        let center = corridor.center();
        let (c0, r0) = self.cell_of(Vec3::new(center.x - half.x, 0.0, center.z + half.z));
        let (c1, r1) = self.cell_of(Vec3::new(center.x + half.x, 0.0, center.z - half.z));
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.set(col, row, S_CORRIDOR);
            }
        }
    }

    fn draw_room(&mut self, room: &Room, geometry: &RoomGeometry) {
        let h = room.half_extent();
        let (c0, r0) = self.cell_of(Vec3::new(room.center.x - h, 0.0, room.center.z + h));
        let (c1, r1) = self.cell_of(Vec3::new(room.center.x + h, 0.0, room.center.z - h));

        for row in r0..=r1 {
            for col in c0..=c1 {
                let mut walls = Vec::with_capacity(2);
                if row == r0 {
                    walls.push(Wall::North);
                }
                if row == r1 {
                    walls.push(Wall::South);
                }
                if col == c1 {
                    walls.push(Wall::East);
                }
                if col == c0 {
                    walls.push(Wall::West);
                }
                let position = self.position_of(col, row);
                let symbol = walls
                    .into_iter()
                    .find(|&wall| self.wall_covers(geometry, wall, room, position))
                    .map_or(S_FLOOR, wall_symbol);
                self.set(col, row, symbol);
            }
        }
    }

    /// Whether a built segment of `wall` covers the boundary cell at `position`
    fn wall_covers(
        &self,
        geometry: &RoomGeometry,
        wall: Wall,
        room: &Room,
        position: Vec3,
    ) -> bool {
        let along = (position - room.center).dot(wall.tangent());
        geometry.segments_on(wall).any(|segment| {
            let center = (segment.center - room.center).dot(wall.tangent());
            (along - center).abs() <= segment.length / 2.0 + self.cell_size / 2.0
        })
    }
}

fn wall_symbol(wall: Wall) -> char {
    match wall {
        Wall::North | Wall::South => S_HWALL,
        Wall::East | Wall::West => S_VWALL,
    }
}

/// Ground-plane bounding box of every room and corridor
fn bounds(rooms: &[Room], corridors: &[Corridor]) -> Option<(Vec3, Vec3)> {
    let room_boxes = rooms.iter().map(|r| {
        let h = Vec3::new(r.half_extent(), 0.0, r.half_extent());
        (r.center - h, r.center + h)
    });
    let corridor_boxes = corridors.iter().map(|c| {
        let half = c.size(0.0) / 2.0;
        (c.center() - half, c.center() + half)
    });
    room_boxes
        .chain(corridor_boxes)
        .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
        .map(|(min, max)| (min.with_y(0.0), max.with_y(0.0)))
}

impl fmt::Display for AsciiMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
