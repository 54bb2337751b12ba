mod input;
mod loop_runner;
mod metrics;
mod rig;
mod scene;

pub use input::{parse_command, Command, InputSnapshot, MAX_MOVE_STEPS};
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rig::{default_rig, CharacterKind, CharacterRig, PartDesc, PartShape, CHARACTER_KINDS};
pub use scene::{
    Color, Scene, SceneCommand, SceneHost, Stage, Transform, Vec3, Visual, VisualId, VisualKind,
};
