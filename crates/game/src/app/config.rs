use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct PlayerSetup {
    pub(crate) name: String,
    pub(crate) color: u32,
    pub(crate) character: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct GameConfig {
    #[serde(default = "default_tile_count")]
    pub(crate) tile_count: usize,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    #[serde(default = "default_target_tps")]
    pub(crate) target_tps: u32,
    #[serde(default = "default_players")]
    pub(crate) players: Vec<PlayerSetup>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: default_tile_count(),
            seed: None,
            target_tps: default_target_tps(),
            players: default_players(),
        }
    }
}

fn default_tile_count() -> usize {
    30
}

fn default_target_tps() -> u32 {
    60
}

fn default_players() -> Vec<PlayerSetup> {
    vec![
        PlayerSetup {
            name: "Class 1".to_string(),
            color: 0xFF4500,
            character: "trail.rabbit".to_string(),
        },
        PlayerSetup {
            name: "Class 2".to_string(),
            color: 0x1E90FF,
            character: "trail.frog".to_string(),
        },
    ]
}

/// Loads the game configuration. Any problem with the file is a recoverable
/// degradation: log it and play on the defaults.
pub(crate) fn load_game_config(path: &Path) -> GameConfig {
    if !path.is_file() {
        info!(path = %path.display(), "no game config file; using defaults");
        return GameConfig::default();
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "failed to read game config; using defaults"
            );
            return GameConfig::default();
        }
    };

    match parse_game_config(&raw) {
        Ok(config) => sanitize_game_config(config),
        Err(error) => {
            warn!(
                path = %path.display(),
                error = error.as_str(),
                "failed to parse game config; using defaults"
            );
            GameConfig::default()
        }
    }
}

fn parse_game_config(raw: &str) -> Result<GameConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse config json: {source}"))
            } else {
                Err(format!("parse config json at {path}: {source}"))
            }
        }
    }
}

/// The board needs a start and a goal tile and the game is strictly
/// two-player; out-of-shape values fall back rather than erroring.
fn sanitize_game_config(mut config: GameConfig) -> GameConfig {
    if config.tile_count < 2 {
        warn!(
            tile_count = config.tile_count,
            "tile_count below minimum; using default"
        );
        config.tile_count = default_tile_count();
    }
    if config.target_tps == 0 {
        warn!("target_tps must be positive; using default");
        config.target_tps = default_target_tps();
    }
    if config.players.len() != 2 {
        warn!(
            player_count = config.players.len(),
            "config must define exactly two players; using default players"
        );
        config.players = default_players();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let raw = r#"{
            "tile_count": 12,
            "seed": 99,
            "target_tps": 30,
            "players": [
                { "name": "Red", "color": 16729344, "character": "trail.bear" },
                { "name": "Blue", "color": 2003199, "character": "trail.cat" }
            ]
        }"#;
        let config = parse_game_config(raw).expect("parse");
        assert_eq!(config.tile_count, 12);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.target_tps, 30);
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.players[0].name, "Red");
        assert_eq!(config.players[1].character, "trail.cat");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = parse_game_config("{}").expect("parse");
        assert_eq!(config.tile_count, 30);
        assert_eq!(config.target_tps, 60);
        assert!(config.seed.is_none());
        assert_eq!(config.players.len(), 2);
    }

    #[test]
    fn parse_errors_name_the_offending_path() {
        let raw = r#"{ "players": [ { "name": "Red", "color": "orange", "character": "x" } ] }"#;
        let error = parse_game_config(raw).err().expect("error");
        assert!(error.contains("players[0].color"), "got: {error}");
    }

    #[test]
    fn sanitize_restores_playable_values() {
        let config = sanitize_game_config(GameConfig {
            tile_count: 1,
            seed: None,
            target_tps: 0,
            players: Vec::new(),
        });
        assert_eq!(config.tile_count, 30);
        assert_eq!(config.target_tps, 60);
        assert_eq!(config.players.len(), 2);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = load_game_config(&temp.path().join("absent.json"));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("game.json");
        fs::write(&path, "{ not json").expect("write");
        let config = load_game_config(&path);
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn valid_file_loads_and_sanitizes() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("game.json");
        fs::write(&path, r#"{ "tile_count": 10, "seed": 5 }"#).expect("write");
        let config = load_game_config(&path);
        assert_eq!(config.tile_count, 10);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.players.len(), 2);
    }
}
