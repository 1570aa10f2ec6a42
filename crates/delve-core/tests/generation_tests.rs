use delve_core::dungeon::{doors_for_direction, DoorMask, RoomType, Wall};
use delve_core::scene::{BakeRecorder, SceneRecorder};
use delve_core::{DelveConfig, GameRng, GeneratedLevel, GenerationConfig, LevelGenerator};
use proptest::prelude::*;

fn generate(generation: GenerationConfig, seed: u64) -> (GeneratedLevel, SceneRecorder) {
    let config = DelveConfig {
        generation,
        ..Default::default()
    };
    let mut generator = LevelGenerator::new(config, GameRng::new(seed)).unwrap();
    let mut scene = SceneRecorder::new();
    let level = generator
        .generate(&mut scene, &mut BakeRecorder::default())
        .clone();
    (level, scene)
}

/// Structural checks every generated level must pass
fn check_level(level: &GeneratedLevel, config: &GenerationConfig) -> Result<(), String> {
    let graph = &level.graph;
    if !graph.is_tree() {
        return Err(format!(
            "not a tree: {} rooms, {} edges, {} reachable",
            graph.len(),
            graph.edge_count(),
            graph.reachable_from_start()
        ));
    }
    if level.corridors.len() != graph.edge_count() {
        return Err(format!(
            "{} corridors for {} edges",
            level.corridors.len(),
            graph.edge_count()
        ));
    }

    let branch = 0.8 * config.base_room_size;
    let boss = config.max_room_size * config.boss_room_size_multiplier;
    for room in graph.rooms() {
        let ok = match room.room_type {
            RoomType::Boss => room.footprint == boss,
            _ if !graph.chain().contains(&room.id) => room.footprint == branch,
            _ => room.footprint >= config.base_room_size && room.footprint <= config.max_room_size,
        };
        if !ok {
            return Err(format!(
                "room {:?} ({}) has footprint {}",
                room.id, room.room_type, room.footprint
            ));
        }

        let doors = level.geometry[room.id.index()].doors;
        if !room.neighbors.is_empty() && doors.is_empty() {
            return Err(format!("room {:?} is connected but has no door", room.id));
        }
        for &n in &room.neighbors {
            let other = graph.get(n).ok_or("dangling neighbor")?;
            if !other.neighbors.contains(&room.id) {
                return Err(format!("edge {:?}-{:?} is one-sided", room.id, n));
            }
            if room.center == other.center {
                continue;
            }
            let opened = doors_for_direction(room.direction_to(other));
            if opened.is_empty() {
                return Err(format!(
                    "edge {:?}-{:?} opens no wall of {:?}",
                    room.id, n, room.id
                ));
            }
            if !doors.contains(opened) {
                return Err(format!(
                    "room {:?} doors {:?} miss {:?} toward {:?}",
                    room.id, doors, opened, n
                ));
            }
        }
        if matches!(room.room_type, RoomType::Start | RoomType::Treasure)
            && !room.contents.enemies.is_empty()
        {
            return Err(format!("room {:?} ({}) has enemies", room.id, room.room_type));
        }
    }
    Ok(())
}

#[test]
fn test_every_direction_opens_a_wall() {
    for step in 0..360 {
        let angle = (step as f32).to_radians();
        let direction = glam::Vec3::new(angle.cos(), 0.0, angle.sin());
        let doors = doors_for_direction(direction);
        assert!(!doors.is_empty(), "no door for {} degrees", step);
        // The wall facing the dominant axis is always among them
        let dominant = if direction.x.abs() >= direction.z.abs() {
            if direction.x > 0.0 { Wall::East } else { Wall::West }
        } else if direction.z > 0.0 {
            Wall::North
        } else {
            Wall::South
        };
        assert!(doors.has_door(dominant), "{} degrees: {:?}", step, doors);
        assert!(doors.walls().len() <= 2);
    }
    assert_eq!(
        doors_for_direction(glam::Vec3::new(0.95, 0.0, 0.32)),
        DoorMask::EAST | DoorMask::NORTH
    );
}

#[test]
fn test_fixed_chain_without_branches_is_a_path() {
    let config = GenerationConfig {
        min_rooms: 5,
        max_rooms: 5,
        branch_chance: 0.0,
        ..Default::default()
    };
    let (level, _) = generate(config.clone(), 7);
    let graph = &level.graph;

    assert_eq!(graph.len(), 6);
    assert_eq!(graph.edge_count(), 5);
    assert_eq!(graph.start().unwrap().room_type, RoomType::Start);
    assert_eq!(graph.count_type(RoomType::Boss), 1);
    assert_eq!(graph.count_type(RoomType::Branch), 0);
    for room in graph.rooms() {
        assert!(room.neighbors.len() <= 2, "room {:?} forks", room.id);
    }
    assert_eq!(graph.start().unwrap().neighbors.len(), 1);
    assert_eq!(graph.boss().unwrap().neighbors.len(), 1);
    check_level(&level, &config).unwrap();
}

#[test]
fn test_all_treasure_chain() {
    let config = GenerationConfig {
        min_rooms: 7,
        max_rooms: 7,
        branch_chance: 0.0,
        empty_room_chance: 1.0,
        ..Default::default()
    };
    let (level, _) = generate(config.clone(), 3);
    for &id in level.graph.chain() {
        let room = level.graph.get(id).unwrap();
        match room.progression {
            0 => assert_eq!(room.room_type, RoomType::Start),
            1 => assert_eq!(room.room_type, RoomType::Normal),
            _ => {
                assert_eq!(room.room_type, RoomType::Treasure);
                assert_eq!(room.planned_enemies, 0);
                assert!(room.contents.enemies.is_empty());
                assert_eq!(room.contents.loot.len(), config.treasure_loot_count as usize);
            }
        }
    }
    check_level(&level, &config).unwrap();
}

#[test]
fn test_same_seed_same_level() {
    let (a, _) = generate(GenerationConfig::default(), 99);
    let (b, _) = generate(GenerationConfig::default(), 99);
    assert_eq!(a.summary(), b.summary());

    let (c, _) = generate(GenerationConfig::default(), 100);
    assert_ne!(a.summary(), c.summary());
}

#[test]
fn test_regenerate_leaves_no_stale_entities() {
    let mut generator = LevelGenerator::new(DelveConfig::default(), GameRng::new(5)).unwrap();
    let mut scene = SceneRecorder::new();
    let mut baker = BakeRecorder::default();

    let first = generator.generate(&mut scene, &mut baker).clone();
    for _ in 0..3 {
        let level = generator.regenerate(&mut scene, &mut baker);
        assert_eq!(scene.live_count(), level.stats.entities);
        assert_eq!(scene.count_template("player"), 1);
        assert_eq!(scene.count_template("level_root"), 1);
    }
    assert!(!scene.contains(first.root.unwrap()));
    assert!(!scene.contains(first.player.unwrap()));
    assert_eq!(generator.level().unwrap().epoch, 4);
    assert_eq!(baker.requests.len(), 4);
}

#[test]
fn test_everything_parented_under_root() {
    let (level, scene) = generate(GenerationConfig::default(), 17);
    let root = level.root.unwrap();
    assert!(scene.get(root).unwrap().parent.is_none());

    for room in level.graph.rooms() {
        let container = room.contents.geometry.unwrap();
        assert_eq!(scene.get(container).unwrap().parent, Some(root));
        for &enemy in &room.contents.enemies {
            assert_eq!(scene.get(enemy).unwrap().parent, Some(container));
        }
    }
    for &corridor in &level.corridor_entities {
        assert_eq!(scene.get(corridor).unwrap().parent, Some(root));
    }
}

#[test]
fn test_empty_graph() {
    let config = GenerationConfig {
        min_rooms: 0,
        max_rooms: 0,
        ..Default::default()
    };
    let (level, _) = generate(config, 1);
    assert!(level.graph.is_empty());
    assert!(level.graph.is_tree());
    assert!(level.player.is_none());
    assert_eq!(level.stats.population.entities(), 0);
}

#[test]
fn test_single_room_chain() {
    let config = GenerationConfig {
        min_rooms: 1,
        max_rooms: 1,
        ..Default::default()
    };
    let (level, scene) = generate(config.clone(), 2);
    assert_eq!(level.graph.len(), 2);
    let boss = level.graph.boss().unwrap();
    let start = level.graph.start().unwrap();
    // A lone start room sends the boss room along +Z
    assert!(boss.center.z > start.center.z);
    assert_eq!(boss.center.x, start.center.x);
    assert_eq!(scene.count_template("boss"), 1);
    check_level(&level, &config).unwrap();
}

#[test]
fn test_large_levels_stay_consistent() {
    let config = GenerationConfig {
        min_rooms: 20,
        max_rooms: 30,
        branch_chance: 0.8,
        ..Default::default()
    };
    for seed in 0..10 {
        let (level, scene) = generate(config.clone(), seed);
        check_level(&level, &config).unwrap();
        assert_eq!(scene.live_count(), level.stats.entities);
    }
}

fn arb_config() -> impl Strategy<Value = GenerationConfig> {
    (
        0u32..10,
        0u32..6,
        0.0f32..=1.0,
        0.0f32..=1.0,
        4.0f32..12.0,
        0.0f32..10.0,
        1.0f32..5.0,
    )
        .prop_map(|(min, extra, branch, empty, base, spread, corridor)| GenerationConfig {
            min_rooms: min,
            max_rooms: min + extra,
            branch_chance: branch,
            empty_room_chance: empty,
            base_room_size: base,
            max_room_size: base + spread,
            corridor_width: corridor,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_generated_levels_hold_invariants(config in arb_config(), seed in any::<u64>()) {
        let (level, scene) = generate(config.clone(), seed);
        if let Err(e) = check_level(&level, &config) {
            return Err(TestCaseError::fail(e));
        }
        prop_assert_eq!(scene.live_count(), level.stats.entities);
        prop_assert!(level.graph.len() as u32 <= config.max_rooms * 2 + 1);
        if config.min_rooms > 0 {
            prop_assert_eq!(level.graph.count_type(RoomType::Boss), 1);
            prop_assert!(level.player.is_some());
        }
    }
}
