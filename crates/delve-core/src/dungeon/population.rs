//! Room population
//!
//! Spawns enemies, loot, the boss and decorations per room type. Every room
//! is populated on its own: a spawn failure is logged and skipped, never
//! propagated to the rest of the level.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::graph::RoomGraph;
use super::room::{Room, RoomType};
use crate::config::{GenerationConfig, LevelTemplates};
use crate::consts::SPAWN_INSET;
use crate::rng::GameRng;
use crate::spawn::{EntityHandle, EntitySpawner, TemplateId, Transform};

/// Floor weight for an archetype once it is unlocked
pub const MIN_UNLOCKED_WEIGHT: f32 = 0.5;

/// One enemy kind in the archetype table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub template: TemplateId,
    /// Weight at the room where the archetype unlocks
    pub weight: f32,
    /// Weight change per room past the unlock room
    pub growth: f32,
    /// First room index the archetype may appear in
    pub unlock_room: usize,
}

impl Archetype {
    pub fn new(template: &str, weight: f32, growth: f32, unlock_room: usize) -> Self {
        Self {
            template: TemplateId::new(template),
            weight,
            growth,
            unlock_room,
        }
    }

    /// Draw weight in room `room_index`
    pub fn weight_at(&self, room_index: usize) -> f32 {
        if room_index < self.unlock_room {
            return 0.0;
        }
        let steps = (room_index - self.unlock_room) as f32;
        (self.weight + self.growth * steps).max(MIN_UNLOCKED_WEIGHT)
    }
}

/// Enemy archetypes ordered from weakest to hardest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeTable {
    pub entries: Vec<Archetype>,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            entries: vec![
                Archetype::new("grunt", 10.0, -0.8, 0),
                Archetype::new("skirmisher", 4.0, 0.6, 2),
                Archetype::new("brute", 2.0, 0.8, 4),
                Archetype::new("elite", 1.0, 1.0, 7),
            ],
        }
    }
}

impl ArchetypeTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn weights_for(&self, room_index: usize) -> Vec<f32> {
        self.entries.iter().map(|a| a.weight_at(room_index)).collect()
    }

    /// Weighted draw for room `room_index`
    pub fn choose(&self, room_index: usize, rng: &mut GameRng) -> Option<&TemplateId> {
        let idx = rng.weighted_index(&self.weights_for(room_index))?;
        self.entries.get(idx).map(|a| &a.template)
    }
}

/// One loot kind with its draw weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub template: TemplateId,
    pub weight: f32,
}

/// Weighted loot kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LootTable {
    pub entries: Vec<LootEntry>,
}

impl Default for LootTable {
    fn default() -> Self {
        let entry = |name: &str, weight: f32| LootEntry {
            template: TemplateId::new(name),
            weight,
        };
        Self {
            entries: vec![
                entry("gold", 50.0),
                entry("potion", 25.0),
                entry("weapon", 15.0),
                entry("relic", 10.0),
            ],
        }
    }
}

impl LootTable {
    pub fn choose(&self, rng: &mut GameRng) -> Option<&TemplateId> {
        let weights: Vec<f32> = self.entries.iter().map(|e| e.weight).collect();
        let idx = rng.weighted_index(&weights)?;
        self.entries.get(idx).map(|e| &e.template)
    }
}

/// `round(starting_enemy_count * enemy_increase_per_room ^ exponent)`
pub fn enemy_cap(config: &GenerationConfig, exponent: i32) -> u32 {
    let cap = config.starting_enemy_count * config.enemy_increase_per_room.powi(exponent);
    cap.round().max(0.0) as u32
}

/// Enemies to spawn in room `room_index`
///
/// Drawn independently from the sizing-time estimate, with the exponent
/// lagging one room behind.
pub fn spawn_enemy_count(room_index: usize, config: &GenerationConfig, rng: &mut GameRng) -> u32 {
    let lo = room_index.max(1) as u32;
    let exponent = room_index.saturating_sub(1) as i32;
    let hi = enemy_cap(config, exponent).max(lo);
    rng.range_inclusive(lo, hi)
}

/// Decorations for a room: proportional to its floor area
pub fn decoration_count(room: &Room, config: &GenerationConfig) -> usize {
    (room.area() * config.decoration_density).floor().max(0.0) as usize
}

/// Uniform point on the room floor, kept away from the walls
pub fn random_floor_point(room: &Room, rng: &mut GameRng) -> Vec3 {
    let reach = (room.half_extent() - SPAWN_INSET).max(0.0);
    Vec3::new(
        room.center.x + rng.uniform(-reach, reach),
        room.center.y,
        room.center.z + rng.uniform(-reach, reach),
    )
}

/// What population produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationReport {
    pub enemies: usize,
    pub loot: usize,
    pub bosses: usize,
    pub placeholders: usize,
    pub decorations: usize,
    /// Spawns that failed and were skipped
    pub failures: usize,
}

impl PopulationReport {
    pub fn entities(&self) -> usize {
        self.enemies + self.loot + self.bosses + self.placeholders + self.decorations
    }

    fn merge(&mut self, other: PopulationReport) {
        self.enemies += other.enemies;
        self.loot += other.loot;
        self.bosses += other.bosses;
        self.placeholders += other.placeholders;
        self.decorations += other.decorations;
        self.failures += other.failures;
    }
}

/// Spawner, templates and config shared by every room
pub struct Populator<'a, S: EntitySpawner + ?Sized> {
    pub spawner: &'a mut S,
    pub config: &'a GenerationConfig,
    pub templates: &'a LevelTemplates,
    /// Parent for rooms without a geometry container
    pub root: Option<EntityHandle>,
}

impl<S: EntitySpawner + ?Sized> Populator<'_, S> {
    /// Populate every room of the graph in id order
    pub fn populate_all(&mut self, graph: &mut RoomGraph, rng: &mut GameRng) -> PopulationReport {
        let mut total = PopulationReport::default();
        for room in graph.rooms_mut() {
            total.merge(self.populate_room(room, rng));
        }
        total
    }

    /// Populate one room according to its type, then decorate it
    pub fn populate_room(&mut self, room: &mut Room, rng: &mut GameRng) -> PopulationReport {
        let mut report = PopulationReport::default();
        let parent = room.contents.geometry.or(self.root);

        match room.room_type {
            RoomType::Start => {}
            RoomType::Treasure => self.spawn_loot(room, parent, rng, &mut report),
            RoomType::Normal | RoomType::Branch => {
                self.spawn_enemies(room, parent, rng, &mut report)
            }
            RoomType::Boss => self.spawn_boss(room, parent, &mut report),
        }
        self.spawn_decorations(room, parent, rng, &mut report);

        debug!(
            room = room.id.index(),
            room_type = %room.room_type,
            enemies = report.enemies,
            loot = report.loot,
            decorations = report.decorations,
            failures = report.failures,
            "room populated"
        );
        report
    }

    fn spawn(
        &mut self,
        template: &TemplateId,
        transform: Transform,
        parent: Option<EntityHandle>,
        room: &Room,
        report: &mut PopulationReport,
    ) -> Option<EntityHandle> {
        match self.spawner.spawn(template, transform, parent) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(room = room.id.index(), %template, error = %e, "spawn failed, skipping");
                report.failures += 1;
                None
            }
        }
    }

    fn spawn_loot(
        &mut self,
        room: &mut Room,
        parent: Option<EntityHandle>,
        rng: &mut GameRng,
        report: &mut PopulationReport,
    ) {
        let templates = self.templates;
        for _ in 0..self.config.treasure_loot_count {
            let Some(template) = templates.loot.choose(rng).cloned() else {
                warn!(room = room.id.index(), "no loot configured for treasure room");
                return;
            };
            let position = random_floor_point(room, rng);
            if let Some(h) = self.spawn(&template, Transform::at(position), parent, room, report) {
                room.contents.loot.push(h);
                report.loot += 1;
            }
        }
    }

    fn spawn_enemies(
        &mut self,
        room: &mut Room,
        parent: Option<EntityHandle>,
        rng: &mut GameRng,
        report: &mut PopulationReport,
    ) {
        if self.templates.enemies.is_empty() {
            warn!(
                room = room.id.index(),
                "no enemy archetypes configured, room left empty"
            );
            return;
        }
        let count = spawn_enemy_count(room.progression, self.config, rng);
        for _ in 0..count {
            let Some(template) = self.templates.enemies.choose(room.progression, rng).cloned()
            else {
                warn!(
                    room = room.id.index(),
                    progression = room.progression,
                    "no archetype available for room, room left empty"
                );
                return;
            };
            let position = random_floor_point(room, rng);
            if let Some(h) = self.spawn(&template, Transform::at(position), parent, room, report) {
                room.contents.enemies.push(h);
                report.enemies += 1;
            }
        }
    }

    fn spawn_boss(
        &mut self,
        room: &mut Room,
        parent: Option<EntityHandle>,
        report: &mut PopulationReport,
    ) {
        let (template, is_boss) = match &self.templates.boss {
            Some(t) => (t.clone(), true),
            None => {
                warn!(room = room.id.index(), "no boss template, spawning placeholder");
                (self.templates.placeholder.clone(), false)
            }
        };
        if let Some(h) = self.spawn(&template, Transform::at(room.center), parent, room, report) {
            room.contents.boss = Some(h);
            if is_boss {
                report.bosses += 1;
            } else {
                report.placeholders += 1;
            }
        }
    }

    fn spawn_decorations(
        &mut self,
        room: &mut Room,
        parent: Option<EntityHandle>,
        rng: &mut GameRng,
        report: &mut PopulationReport,
    ) {
        let count = decoration_count(room, self.config);
        if count == 0 {
            return;
        }
        if self.templates.decorations.is_empty() {
            debug!(room = room.id.index(), "no decoration templates");
            return;
        }
        for _ in 0..count {
            let Some(template) = rng.choose(&self.templates.decorations).cloned() else {
                return;
            };
            let position = random_floor_point(room, rng);
            let transform = Transform::at(position).with_yaw(rng.uniform(0.0, 360.0));
            if let Some(h) = self.spawn(&template, transform, parent, room, report) {
                room.contents.decorations.push(h);
                report.decorations += 1;
            }
        }
    }
}
