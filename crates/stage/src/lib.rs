use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;

pub use app::{
    default_rig, parse_command, run_app, run_app_with_metrics, AppError, CharacterKind,
    CharacterRig, Color, Command, InputSnapshot, LoopConfig, LoopMetricsSnapshot, MetricsHandle,
    PartDesc, PartShape, Scene, SceneCommand, SceneHost, Stage, Transform, Vec3, Visual, VisualId,
    VisualKind, CHARACTER_KINDS, MAX_MOVE_STEPS,
};
pub use content::{
    compile_content_database, load_content_database, CharacterDef, ContentCompileError,
    ContentDatabase, ContentErrorCode, MissionCategory, MissionDef, SourceLocation,
    MISSION_CATEGORIES,
};

pub const ROOT_ENV_VAR: &str = "TRAILHOP_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub defs_dir: PathBuf,
    pub config_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "TRAILHOP_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/trailhop\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let defs_dir = root.join("assets").join("defs");
    let config_path = root.join("assets").join("config").join("game.json");

    Ok(AppPaths {
        root,
        defs_dir,
        config_path,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_marker_requires_cargo_toml() {
        let cwd = env::current_dir().expect("cwd");
        assert!(!is_repo_marker(&cwd.join("definitely_not_a_marker")));
    }

    #[test]
    fn app_paths_hang_off_the_root() {
        let root = PathBuf::from("/tmp/trailhop-root");
        let defs = root.join("assets").join("defs");
        let config = root.join("assets").join("config").join("game.json");
        let paths = AppPaths {
            root: root.clone(),
            defs_dir: defs.clone(),
            config_path: config.clone(),
        };
        assert!(paths.defs_dir.starts_with(&paths.root));
        assert!(paths.config_path.starts_with(&paths.root));
        assert_eq!(paths.defs_dir, defs);
        assert_eq!(paths.config_path, config);
    }
}
