//! delve: dungeon level generator
//!
//! Generates a level into an in-memory scene and prints it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use delve_core::dungeon::RoomType;
use delve_core::render::DEFAULT_CELL_SIZE;
use delve_core::scene::{BakeRecorder, SceneRecorder};
use delve_core::{AsciiMap, DelveConfig, GameRng, GeneratedLevel, LevelGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Room list and counts
    Summary,
    /// Full level export
    Json,
    /// Top-down map
    Ascii,
}

/// Generate a dungeon level
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "Delve - generate a dungeon level", long_about = None)]
struct Args {
    /// RNG seed (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Fewest main-chain rooms
    #[arg(long = "min-rooms")]
    min_rooms: Option<u32>,

    /// Most main-chain rooms
    #[arg(long = "max-rooms")]
    max_rooms: Option<u32>,

    /// Per-room branch probability
    #[arg(long = "branch-chance")]
    branch_chance: Option<f32>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Summary)]
    format: Format,

    /// Regenerate this many extra times in the same scene before printing
    #[arg(short = 'r', long = "regenerate", default_value_t = 0)]
    regenerate: u32,

    /// World units per character in ascii output
    #[arg(long = "cell-size", default_value_t = DEFAULT_CELL_SIZE)]
    cell_size: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delve=info,delve_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    info!(seed = rng.seed(), "starting generation");

    let mut generator = LevelGenerator::new(config, rng).context("invalid configuration")?;
    let mut scene = SceneRecorder::new();
    let mut baker = BakeRecorder::default();

    generator.generate(&mut scene, &mut baker);
    for _ in 0..args.regenerate {
        let level = generator.regenerate(&mut scene, &mut baker);
        debug!(epoch = level.epoch, live = scene.live_count(), "regenerated");
    }

    let Some(level) = generator.level() else {
        anyhow::bail!("no level was generated");
    };
    info!(
        live_entities = scene.live_count(),
        bake_requests = baker.requests.len(),
        "scene ready"
    );

    match args.format {
        Format::Summary => print_summary(level),
        Format::Json => println!("{}", level.summary().to_json()?),
        Format::Ascii => print!("{}", AsciiMap::render(level, args.cell_size)),
    }
    Ok(())
}

/// File configuration with command line overrides applied
fn load_config(args: &Args) -> Result<DelveConfig> {
    let mut config = match &args.config {
        Some(path) => DelveConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DelveConfig::default(),
    };
    let generation = &mut config.generation;
    if let Some(n) = args.min_rooms {
        generation.min_rooms = n;
    }
    if let Some(n) = args.max_rooms {
        generation.max_rooms = n;
    }
    if let Some(p) = args.branch_chance {
        generation.branch_chance = p;
    }
    generation.validate().context("invalid configuration")?;
    Ok(config)
}

fn print_summary(level: &GeneratedLevel) {
    let stats = &level.stats;
    println!("seed {}  generation {}", level.seed, level.epoch);
    println!(
        "{} rooms ({} on the main chain), {} corridors, {} wall segments",
        stats.rooms, stats.chain_rooms, stats.corridors, stats.wall_segments
    );
    for room_type in RoomType::iter() {
        let n = level.graph.count_type(room_type);
        if n > 0 {
            println!("  {:<9} {}", room_type.to_string(), n);
        }
    }
    println!(
        "{} enemies, {} loot, {} decorations, {} entities",
        stats.population.enemies,
        stats.population.loot,
        stats.population.decorations,
        stats.entities
    );
    if stats.spawn_failures > 0 {
        println!("{} spawns failed", stats.spawn_failures);
    }
    println!();

    for room in level.graph.rooms() {
        let neighbors: Vec<String> = room.neighbors.iter().map(|n| n.index().to_string()).collect();
        let doors: Vec<String> = level
            .geometry
            .get(room.id.index())
            .map(|g| g.doors.walls().iter().map(|w| w.to_string()).collect())
            .unwrap_or_default();
        println!(
            "#{:<3} {:<9} at ({:>7.1}, {:>7.1}) size {:>5.1}  enemies {:<2} -> [{}] doors [{}]",
            room.id.index(),
            room.room_type.to_string(),
            room.center.x,
            room.center.z,
            room.footprint,
            room.contents.enemies.len(),
            neighbors.join(", "),
            doors.join(", ")
        );
    }
}
