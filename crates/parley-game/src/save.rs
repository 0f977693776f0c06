//! JSON save files for narrator sessions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::GameState;

/// Errors that can occur reading or writing a save file.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Filesystem read/write failed.
    #[error("save file io error: {0}")]
    Io(#[from] std::io::Error),

    /// The save file is not valid JSON for this version of the game.
    #[error("save file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A snapshot of a session, written as one pretty-printed JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSave {
    /// RFC 3339 timestamp of when the save was written.
    pub saved_at: String,
    pub state: GameState,
}

impl GameSave {
    /// Snapshots `state` with the current time.
    pub fn now(state: &GameState) -> Self {
        Self {
            saved_at: chrono::Utc::now().to_rfc3339(),
            state: state.clone(),
        }
    }

    /// Writes the save into `dir`, returning the created path.
    ///
    /// File names carry a timestamp (`game_save_20251103_021400.json`) so
    /// repeated saves never clobber each other.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, SaveError> {
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("game_save_{stamp}.json"));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), "game saved");
        Ok(path)
    }

    /// Reads a save file back.
    pub fn read(path: &Path) -> Result<Self, SaveError> {
        let contents = std::fs::read_to_string(path)?;
        let save: GameSave = serde_json::from_str(&contents)?;
        tracing::info!(path = %path.display(), "game loaded");
        Ok(save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Scenario;

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().expect("should create temp dir");

        let mut state = GameState::default();
        state.player.name = "Tamsin".to_string();
        state.player.hp = 72;
        state.selected_scenario = Some(Scenario::Fantasy);
        state.active_quests.push("Recover the heirloom".to_string());
        state.story_progress.push("Met the blacksmith".to_string());

        let path = GameSave::now(&state)
            .write_to_dir(dir.path())
            .expect("save should write");

        let loaded = GameSave::read(&path).expect("save should read back");
        assert_eq!(loaded.state, state);
        assert!(!loaded.saved_at.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameSave::read(Path::new("/nonexistent/save.json"))
            .expect_err("missing file should fail");
        assert!(matches!(err, SaveError::Io(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").expect("should write file");

        let err = GameSave::read(&path).expect_err("malformed file should fail");
        assert!(matches!(err, SaveError::Parse(_)));
    }
}
