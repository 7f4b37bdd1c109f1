//! JSON file key-value store for data that outlives a run
//!
//! Holds the best brain found so far and the traffic layout it was found on,
//! so the next run can start from them instead of from scratch.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::network::LevelData;
use super::types::Point;

pub const BEST_BRAIN_KEY: &str = "bestBrain";
pub const TRAFFIC_KEY: &str = "traffic";

/// A single JSON object on disk, read and rewritten as a whole on every access
#[derive(Debug, Clone)]
pub struct SimStore {
    path: PathBuf,
}

impl SimStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read store {}", self.path.display()));
            }
        };

        serde_json::from_str(&contents)
            .with_context(|| format!("Store {} is not a JSON object", self.path.display()))
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_string_pretty(entries).context("Failed to encode store")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write store {}", self.path.display()))
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut entries = self.read_all()?;
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to encode value for key {}", key))?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)?;
        debug!("Saved {} to {}", key, self.path.display());
        Ok(())
    }

    /// Value stored under `key`, or `None` if the key (or the whole file) is missing
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut entries = self.read_all()?;
        entries
            .remove(key)
            .map(|value| {
                serde_json::from_value(value)
                    .with_context(|| format!("Stored value for key {} has the wrong shape", key))
            })
            .transpose()
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    pub fn save_best_brain(&self, levels: &[LevelData]) -> Result<()> {
        self.save(BEST_BRAIN_KEY, &levels)
    }

    pub fn load_best_brain(&self) -> Result<Option<Vec<LevelData>>> {
        self.load(BEST_BRAIN_KEY)
    }

    pub fn save_traffic(&self, positions: &[Point]) -> Result<()> {
        self.save(TRAFFIC_KEY, &positions)
    }

    pub fn load_traffic(&self) -> Result<Option<Vec<Point>>> {
        self.load(TRAFFIC_KEY)
    }
}
