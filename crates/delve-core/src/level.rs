//! Level generation driver
//!
//! Runs the full pipeline once per `generate` call and keeps the finished
//! level until the next call replaces it:
//! teardown, graph, boss room, corridors, walls and doors, navigation bake
//! request, population, player.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, DelveConfig, GenerationConfig, LevelTemplates};
use crate::consts::{FLOOR_THICKNESS, PLAYER_SPAWN_HEIGHT, WALL_THICKNESS};
use crate::dungeon::{
    append_boss_room, build_room_graph, build_room_geometry, synthesize_corridors, BuildReport,
    Corridor, PopulationReport, Populator, RoomGeometry, RoomGraph, RoomType,
};
use crate::rng::GameRng;
use crate::spawn::{EntityHandle, EntitySpawner, NavigationBaker, TemplateId, Transform};

/// Counts describing one generated level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    pub rooms: usize,
    pub chain_rooms: usize,
    /// Rooms hanging off the chain (branch and side treasure rooms)
    pub side_rooms: usize,
    pub treasure_rooms: usize,
    pub edges: usize,
    pub corridors: usize,
    pub wall_segments: usize,
    pub contested_placements: usize,
    pub rejected_branches: usize,
    pub population: PopulationReport,
    /// Entities spawned for this level that are still owned by it
    pub entities: usize,
    /// Spawns that failed across geometry, population and player
    pub spawn_failures: usize,
}

/// A finished level
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    /// Generation counter, starting at 1
    pub epoch: u64,
    pub seed: u64,
    pub graph: RoomGraph,
    pub corridors: Vec<Corridor>,
    /// Indexed by room id
    pub geometry: Vec<RoomGeometry>,
    pub root: Option<EntityHandle>,
    pub corridor_entities: Vec<EntityHandle>,
    pub player: Option<EntityHandle>,
    pub stats: LevelStats,
}

impl GeneratedLevel {
    /// Every handle this level spawned outside of room contents
    fn owned_handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.root
            .into_iter()
            .chain(self.corridor_entities.iter().copied())
            .chain(self.player)
    }
}

/// Counts successful spawns and logs failures
struct Spawns<'a, S: EntitySpawner + ?Sized> {
    spawner: &'a mut S,
    spawned: usize,
    failures: usize,
}

impl<S: EntitySpawner + ?Sized> Spawns<'_, S> {
    fn spawn(
        &mut self,
        template: &TemplateId,
        transform: Transform,
        parent: Option<EntityHandle>,
        what: &str,
    ) -> Option<EntityHandle> {
        match self.spawner.spawn(template, transform, parent) {
            Ok(h) => {
                self.spawned += 1;
                Some(h)
            }
            Err(e) => {
                warn!(%template, error = %e, "failed to spawn {}", what);
                self.failures += 1;
                None
            }
        }
    }
}

/// Owns the configuration, the RNG and the current level
#[derive(Debug)]
pub struct LevelGenerator {
    config: GenerationConfig,
    templates: LevelTemplates,
    rng: GameRng,
    level: Option<GeneratedLevel>,
    epoch: u64,
}

impl LevelGenerator {
    /// Create a generator; the configuration is validated up front
    pub fn new(config: DelveConfig, rng: GameRng) -> Result<Self, ConfigError> {
        config.generation.validate()?;
        Ok(Self {
            config: config.generation,
            templates: config.templates,
            rng,
            level: None,
            epoch: 0,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn templates(&self) -> &LevelTemplates {
        &self.templates
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// The current level, if one has been generated
    pub fn level(&self) -> Option<&GeneratedLevel> {
        self.level.as_ref()
    }

    /// Destroy every entity of the current level and forget it
    pub fn teardown<S: EntitySpawner + ?Sized>(&mut self, spawner: &mut S) {
        let Some(level) = self.level.take() else {
            return;
        };
        // Despawning the root removes its children; the rest covers entities
        // that ended up unparented after a failed root spawn.
        for handle in level.owned_handles() {
            spawner.despawn(handle);
        }
        for room in level.graph.rooms() {
            let c = &room.contents;
            for handle in c
                .geometry
                .into_iter()
                .chain(c.geometry_parts.iter().copied())
                .chain(c.enemies.iter().copied())
                .chain(c.loot.iter().copied())
                .chain(c.decorations.iter().copied())
                .chain(c.boss)
            {
                spawner.despawn(handle);
            }
        }
        debug!(epoch = level.epoch, "level torn down");
    }

    /// Alias of [`LevelGenerator::generate`] for tools that re-trigger generation
    pub fn regenerate<S, N>(&mut self, spawner: &mut S, baker: &mut N) -> &GeneratedLevel
    where
        S: EntitySpawner + ?Sized,
        N: NavigationBaker + ?Sized,
    {
        self.generate(spawner, baker)
    }

    /// Tear down the previous level and build a new one
    pub fn generate<S, N>(&mut self, spawner: &mut S, baker: &mut N) -> &GeneratedLevel
    where
        S: EntitySpawner + ?Sized,
        N: NavigationBaker + ?Sized,
    {
        self.teardown(&mut *spawner);
        self.epoch += 1;
        info!(epoch = self.epoch, seed = self.rng.seed(), "generating level");

        let config = &self.config;
        let templates = &self.templates;
        let rng = &mut self.rng;

        let (mut graph, report) = build_room_graph(config, rng);
        append_boss_room(&mut graph, config);

        let mut spawns = Spawns {
            spawner,
            spawned: 0,
            failures: 0,
        };
        let origin = Vec3::new(0.0, config.floor_height, 0.0);
        let root = spawns.spawn(&templates.root, Transform::at(origin), None, "level root");
        if root.is_none() {
            error!("level root could not be spawned, entities will be unparented");
        }

        let corridors = synthesize_corridors(&graph, config.corridor_width);
        let corridor_entities: Vec<_> = corridors
            .iter()
            .filter_map(|c| {
                let transform =
                    Transform::at(c.center()).with_scale(c.size(FLOOR_THICKNESS));
                spawns.spawn(&templates.corridor, transform, root, "corridor")
            })
            .collect();

        let geometry = build_geometry(&mut graph, config, templates, root, &mut spawns);

        match root {
            Some(scope) => baker.request_bake(scope),
            None => warn!("navigation bake skipped: no level root"),
        }

        let mut populator = Populator {
            spawner: &mut *spawns.spawner,
            config,
            templates,
            root,
        };
        let population = populator.populate_all(&mut graph, rng);

        let player = match graph.start() {
            Some(start) => {
                let position = start.center + Vec3::Y * PLAYER_SPAWN_HEIGHT;
                spawns.spawn(&templates.player, Transform::at(position), root, "player")
            }
            None => {
                error!("no start room, player not spawned");
                None
            }
        };

        let stats = LevelStats {
            rooms: graph.len(),
            chain_rooms: graph.chain().len(),
            side_rooms: graph
                .rooms()
                .iter()
                .filter(|r| r.room_type != RoomType::Boss && !graph.chain().contains(&r.id))
                .count(),
            treasure_rooms: graph.count_type(RoomType::Treasure),
            edges: graph.edge_count(),
            corridors: corridors.len(),
            wall_segments: geometry.iter().map(|g| g.segments.len()).sum(),
            contested_placements: report.contested_placements,
            rejected_branches: report.rejected_branches,
            population,
            entities: spawns.spawned + population.entities(),
            spawn_failures: spawns.failures + population.failures,
        };
        log_summary(&report, &stats);

        let level = GeneratedLevel {
            epoch: self.epoch,
            seed: self.rng.seed(),
            graph,
            corridors,
            geometry,
            root,
            corridor_entities,
            player,
            stats,
        };
        self.level.insert(level)
    }
}

/// Carve doors, then spawn each room's container, floor and wall segments
fn build_geometry<S: EntitySpawner + ?Sized>(
    graph: &mut RoomGraph,
    config: &GenerationConfig,
    templates: &LevelTemplates,
    root: Option<EntityHandle>,
    spawns: &mut Spawns<'_, S>,
) -> Vec<RoomGeometry> {
    let layout: &RoomGraph = graph;
    let geometry: Vec<RoomGeometry> = layout
        .rooms()
        .iter()
        .map(|room| build_room_geometry(layout, room, config.corridor_width))
        .collect();

    let wall_y = config.wall_height / 2.0;
    for (room, geo) in graph.rooms_mut().iter_mut().zip(&geometry) {
        debug!(
            room = room.id.index(),
            doors = ?geo.doors.walls(),
            segments = geo.segments.len(),
            "walls built"
        );
        let container = spawns.spawn(&templates.room, Transform::at(room.center), root, "room");
        room.contents.geometry = container;
        let parent = container.or(root);

        let floor = Transform::at(room.center).with_scale(Vec3::new(
            room.footprint,
            FLOOR_THICKNESS,
            room.footprint,
        ));
        let mut parts = Vec::new();
        parts.extend(spawns.spawn(&templates.floor, floor, parent, "floor"));

        for segment in &geo.segments {
            let transform = Transform::at(segment.center + Vec3::Y * wall_y)
                .with_scale(Vec3::new(segment.length, config.wall_height, WALL_THICKNESS))
                .with_yaw(segment.wall.yaw());
            parts.extend(spawns.spawn(&templates.wall, transform, parent, "wall"));
        }
        // Parented pieces go away with their owner
        if parent.is_none() {
            room.contents.geometry_parts = parts;
        }
    }
    geometry
}

fn log_summary(report: &BuildReport, stats: &LevelStats) {
    info!(
        rooms = stats.rooms,
        chain = report.chain_length,
        side_rooms = stats.side_rooms,
        treasure = stats.treasure_rooms,
        corridors = stats.corridors,
        enemies = stats.population.enemies,
        loot = stats.population.loot,
        entities = stats.entities,
        "level generated"
    );
    if stats.spawn_failures > 0 {
        warn!(failures = stats.spawn_failures, "some entities failed to spawn");
    }
}
