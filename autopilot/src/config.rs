use std::env;
use std::path::PathBuf;

use asteroids_core::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

pub const DEFAULT_DT: f32 = 1.0 / 60.0;
pub const DEFAULT_MAX_FRAMES: u32 = 18_000;

/// Settings shared by every headless run. Environment variables provide the
/// defaults; command-line flags override them.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub width: f32,
    pub height: f32,
    pub dt: f32,
    pub max_frames: u32,
    pub high_score_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            dt: DEFAULT_DT,
            max_frames: DEFAULT_MAX_FRAMES,
            high_score_path: None,
        }
    }
}

impl RunConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            width: read_env_f32("ASTEROIDS_WIDTH", defaults.width),
            height: read_env_f32("ASTEROIDS_HEIGHT", defaults.height),
            dt: read_env_f32("ASTEROIDS_DT", defaults.dt),
            max_frames: read_env_u32("ASTEROIDS_MAX_FRAMES", defaults.max_frames),
            high_score_path: read_env_path("ASTEROIDS_HIGH_SCORE_PATH"),
        }
    }
}

pub(crate) fn read_env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<f32>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or(default)
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_path(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared
    // across test threads.

    #[test]
    fn missing_or_invalid_values_fall_back() {
        env::remove_var("ASTEROIDS_TEST_MISSING_F32");
        assert_eq!(read_env_f32("ASTEROIDS_TEST_MISSING_F32", 2.5), 2.5);

        env::set_var("ASTEROIDS_TEST_BAD_F32", "-3");
        assert_eq!(read_env_f32("ASTEROIDS_TEST_BAD_F32", 2.5), 2.5);

        env::set_var("ASTEROIDS_TEST_BAD_U32", "zero");
        assert_eq!(read_env_u32("ASTEROIDS_TEST_BAD_U32", 7), 7);

        env::set_var("ASTEROIDS_TEST_EMPTY_PATH", "  ");
        assert_eq!(read_env_path("ASTEROIDS_TEST_EMPTY_PATH"), None);
    }

    #[test]
    fn valid_values_are_read() {
        env::set_var("ASTEROIDS_TEST_GOOD_F32", " 1024 ");
        assert_eq!(read_env_f32("ASTEROIDS_TEST_GOOD_F32", 1.0), 1024.0);

        env::set_var("ASTEROIDS_TEST_GOOD_U32", "600");
        assert_eq!(read_env_u32("ASTEROIDS_TEST_GOOD_U32", 1), 600);

        env::set_var("ASTEROIDS_TEST_GOOD_PATH", "/tmp/hs.json");
        assert_eq!(
            read_env_path("ASTEROIDS_TEST_GOOD_PATH"),
            Some(PathBuf::from("/tmp/hs.json"))
        );
    }

    #[test]
    fn default_config_matches_playfield_defaults() {
        let config = RunConfig::default();
        assert_eq!((config.width, config.height), (800.0, 600.0));
        assert_eq!(config.max_frames, DEFAULT_MAX_FRAMES);
        assert!(config.high_score_path.is_none());
    }
}
