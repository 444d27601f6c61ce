/// High-score persistence: a single integer in a text file.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.oops_i_missed_score`, or the working directory without a HOME.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".oops_i_missed_score")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored score, or 0 when the file is missing or unreadable.
    pub fn load(&self) -> i32 {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::info!(path = %self.path.display(), error = %e, "no high score yet");
                return 0;
            }
        };
        match text.trim().parse() {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "high score file is corrupt, starting from 0"
                );
                0
            }
        }
    }

    pub fn save(&self, score: i32) -> io::Result<()> {
        std::fs::write(&self.path, score.to_string())?;
        tracing::info!(path = %self.path.display(), score, "saved high score");
        Ok(())
    }
}
