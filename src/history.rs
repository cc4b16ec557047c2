//! File-backed generation-history store.
//!
//! One JSON object keyed by generator id, each value an ordered list of
//! generated-image metadata records. The whole file is read and rewritten
//! on every mutation, and a generator's list is replaced wholesale per
//! generation — this is not an append-only log.
//!
//! Known limitation: concurrent writers for the same generator id can lose
//! updates (read-modify-write over the whole file, no locking). The store
//! is explicitly owned and passed in so callers can see that lifecycle.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Metadata for one generated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub prompt: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_id: Option<i64>,
    pub created_at: String,
}

/// Full contents of the history file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryFile {
    #[serde(flatten)]
    pub generators: BTreeMap<String, Vec<GenerationRecord>>,
}

/// Owns the path to the on-disk history file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole file; a missing file is an empty history.
    pub fn load(&self) -> Result<HistoryFile, ToolError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HistoryFile::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Rewrite the whole file.
    pub fn save(&self, history: &HistoryFile) -> Result<(), ToolError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(history)?;
        tracing::debug!(
            path = %self.path.display(),
            generators = history.generators.len(),
            "writing history file"
        );
        fs::write(&self.path, text)?;
        Ok(())
    }

    /// Replace one generator's record list wholesale.
    pub fn replace(
        &self,
        generator_id: &str,
        records: Vec<GenerationRecord>,
    ) -> Result<(), ToolError> {
        let mut history = self.load()?;
        history.generators.insert(generator_id.to_string(), records);
        self.save(&history)
    }

    /// Records for one generator; unknown ids yield an empty list.
    pub fn get(&self, generator_id: &str) -> Result<Vec<GenerationRecord>, ToolError> {
        Ok(self
            .load()?
            .generators
            .get(generator_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prompt: &str, file_name: &str) -> GenerationRecord {
        GenerationRecord {
            prompt: prompt.into(),
            file_name: file_name.into(),
            media_id: None,
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        assert!(store.load().unwrap().generators.is_empty());
        assert!(store.get("gen-1").unwrap().is_empty());
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        store
            .replace("gen-1", vec![record("a beach", "beach.png")])
            .unwrap();

        let loaded = store.get("gen-1").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].prompt, "a beach");
    }

    #[test]
    fn replace_overwrites_per_generator_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        store
            .replace(
                "gen-1",
                vec![record("v1", "one.png"), record("v2", "two.png")],
            )
            .unwrap();
        store
            .replace("gen-1", vec![record("v3", "three.png")])
            .unwrap();

        let loaded = store.get("gen-1").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].file_name, "three.png");
    }

    #[test]
    fn replace_keeps_other_generators() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        store.replace("gen-1", vec![record("a", "a.png")]).unwrap();
        store.replace("gen-2", vec![record("b", "b.png")]).unwrap();

        assert_eq!(store.get("gen-1").unwrap()[0].file_name, "a.png");
        assert_eq!(store.get("gen-2").unwrap()[0].file_name, "b.png");
    }

    #[test]
    fn file_is_keyed_by_generator_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = HistoryStore::new(&path);
        store.replace("gen-9", vec![record("x", "x.png")]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("gen-9").is_some());
        assert_eq!(raw["gen-9"][0]["fileName"], "x.png");
    }
}
