use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stage::{
    CharacterKind, Color, ContentDatabase, InputSnapshot, MissionCategory, MissionDef, Scene,
    SceneCommand, Stage, Transform, Vec3, VisualId, VisualKind,
};
use tracing::{debug, info, warn};

use super::config::GameConfig;

const HOP_PROGRESS_PER_TICK: f32 = 0.05;
const HOP_ARC_HEIGHT: f32 = 5.0;
const HOP_TUMBLE_PER_TICK: f32 = 0.2;
const TRAIL_EMIT_PROBABILITY: f64 = 0.3;
const LANDING_BURST_COUNT: u32 = 15;
const PLAYER_LATERAL_OFFSET: f32 = 1.5;
const DEFAULT_CHARACTER: CharacterKind = CharacterKind::Rabbit;

const PATH_ORIGIN_X: f32 = -30.0;
const TILE_SPACING_X: f32 = 4.0;
const PATH_WEAVE_FREQUENCY: f32 = 0.8;
const PATH_WEAVE_AMPLITUDE: f32 = 8.0;

const PARTICLE_GRAVITY_PER_TICK: f32 = 0.02;
const PARTICLE_SPAWN_JITTER: f32 = 0.75;
const PARTICLE_SPIN_PER_TICK: f32 = 0.1;
const PARTICLE_DECAY_MIN: f32 = 0.01;
const PARTICLE_DECAY_SPREAD: f32 = 0.02;

const CELEBRATION_PERIOD_SECONDS: f32 = 0.2;
const CELEBRATION_BURST_COUNT: u32 = 20;
const CELEBRATION_SPREAD: f32 = 20.0;

const COLOR_TILE_NORMAL: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
const COLOR_TILE_START: Color = Color { r: 0.0, g: 1.0, b: 0.533 };
const COLOR_TILE_GOAL: Color = Color { r: 1.0, g: 0.412, b: 0.706 };
const COLOR_TILE_BODY: Color = Color { r: 1.0, g: 0.0, b: 1.0 };
const COLOR_TILE_HANDS: Color = Color { r: 0.0, g: 1.0, b: 1.0 };
const COLOR_TILE_GROUP: Color = Color { r: 0.196, g: 0.804, b: 0.196 };

const COLOR_LANDING_SPARK: Color = COLOR_TILE_START;
const COLOR_LANDING_FLASH: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
const COLOR_CELEBRATION_GOLD: Color = Color { r: 1.0, g: 0.843, b: 0.0 };
const COLOR_CELEBRATION_PINK: Color = Color { r: 1.0, g: 0.412, b: 0.706 };
const COLOR_CELEBRATION_CYAN: Color = Color { r: 0.0, g: 1.0, b: 1.0 };

include!("types.rs");
include!("util.rs");
include!("particles.rs");
include!("movement.rs");
include!("mission.rs");
include!("scene_state.rs");
include!("scene_impl.rs");

pub(crate) fn build_scene(config: GameConfig) -> Box<dyn Scene> {
    Box::new(GameplayScene::new(config))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
