//! delve-core: Procedural dungeon level generation
//!
//! Grows a tree of rooms from a start room to a boss room, joins connected
//! rooms with straight corridors, carves door openings into room walls and
//! populates every room according to its type.
//!
//! The crate has no engine dependency. Entities are created through the
//! [`spawn::EntitySpawner`] trait and navigation data through
//! [`spawn::NavigationBaker`]; [`scene::SceneRecorder`] is an in-memory
//! implementation used by the `delve` tool and by tests.

pub mod config;
pub mod dungeon;
pub mod level;
pub mod render;
pub mod scene;
pub mod spawn;
pub mod summary;

mod consts;
mod rng;

pub use config::{ConfigError, DelveConfig, GenerationConfig, LevelTemplates};
pub use consts::*;
pub use level::{GeneratedLevel, LevelGenerator, LevelStats};
pub use render::AsciiMap;
pub use rng::GameRng;
pub use summary::LevelSummary;
