use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use asteroids_core::{HighScoreStore, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// High score kept in a small JSON document on disk.
#[derive(Clone, Debug)]
pub struct JsonFileHighScoreStore {
    path: PathBuf,
}

impl JsonFileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileHighScoreStore {
    fn load_high_score(&mut self) -> u32 {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return 0,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "high score unreadable");
                return 0;
            }
        };

        match serde_json::from_slice::<HighScoreFile>(&bytes) {
            Ok(file) => file.high_score,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "high score file malformed");
                0
            }
        }
    }

    fn save_high_score(&mut self, high_score: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let encoded = serde_json::to_vec_pretty(&HighScoreFile { high_score })
            .map_err(|err| StoreError::Encode(err.to_string()))?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }
}

/// Either a file-backed store or nothing at all, picked from configuration.
#[derive(Clone, Debug)]
pub enum ConfiguredStore {
    File(JsonFileHighScoreStore),
    Disabled,
}

impl ConfiguredStore {
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::File(JsonFileHighScoreStore::new(path)),
            None => Self::Disabled,
        }
    }
}

impl HighScoreStore for ConfiguredStore {
    fn load_high_score(&mut self) -> u32 {
        match self {
            Self::File(store) => store.load_high_score(),
            Self::Disabled => 0,
        }
    }

    fn save_high_score(&mut self, high_score: u32) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.save_high_score(high_score),
            Self::Disabled => Ok(()),
        }
    }
}
