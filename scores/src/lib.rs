//! Durable top-N leaderboard of won games.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use peeksweep_core::GameStat;
use thiserror::Error;

/// How many stats the leaderboard keeps.
pub const MAX_SCORES: usize = 10;

pub const SCORES_FILE: &str = "highscores.json";

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Could not determine a data directory for the score file")]
    NoDataDir,
    #[error("Score file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ScoreError>;

/// Alternative orderings for displaying the leaderboard.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Higher score first, then faster game, then most recent.
    #[default]
    Score,
    /// Name ascending, then higher score first.
    Name,
    /// Most recent first, then higher score first.
    Date,
}

/// High-score list backed by a JSON file.
///
/// Reading never fails: a missing, blank or corrupt file yields an empty list.
#[derive(Debug)]
pub struct HighScoreStore {
    path: PathBuf,
    scores: Vec<GameStat>,
}

impl HighScoreStore {
    /// Platform data location, e.g. `~/.local/share/peeksweep/highscores.json`.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "peeksweep").ok_or(ScoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(SCORES_FILE))
    }

    /// Opens the store at the platform data location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(Self::default_path()?))
    }

    /// Opens the store at `path` and loads whatever it holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            scores: Vec::new(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reloads from disk, writing back an empty list when the file is missing or blank.
    pub fn load(&mut self) {
        self.scores = match fs::read_to_string(&self.path) {
            Ok(json) if !json.trim().is_empty() => {
                serde_json::from_str(&json).unwrap_or_else(|err| {
                    log::error!("Could not parse score file {}: {}", self.path.display(), err);
                    Vec::new()
                })
            }
            Ok(_) => {
                log::debug!("Score file {} is blank, starting fresh", self.path.display());
                self.reset_file();
                Vec::new()
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No score file at {}, creating it", self.path.display());
                self.reset_file();
                Vec::new()
            }
            Err(err) => {
                log::error!("Could not read score file {}: {}", self.path.display(), err);
                Vec::new()
            }
        };
        self.scores.sort_by(GameStat::rank_cmp);
    }

    fn reset_file(&mut self) {
        self.scores.clear();
        if let Err(err) = self.save() {
            log::error!("Could not save score file {}: {}", self.path.display(), err);
        }
    }

    /// Writes the current list to disk as pretty JSON.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.scores)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Merges `stat` into the list on disk, keeping the best [`MAX_SCORES`].
    pub fn add(&mut self, stat: GameStat) -> Result<()> {
        self.load();
        log::debug!("Adding score {} for {}", stat.score, stat.name);
        self.scores.push(stat);
        self.scores.sort_by(GameStat::rank_cmp);
        self.scores.truncate(MAX_SCORES);
        self.save()
    }

    /// The leaderboard in rank order.
    pub fn scores(&self) -> &[GameStat] {
        &self.scores
    }

    /// The leaderboard in the given display order.
    pub fn sorted(&self, order: SortOrder) -> Vec<GameStat> {
        let mut scores = self.scores.clone();
        match order {
            SortOrder::Score => scores.sort_by(GameStat::rank_cmp),
            SortOrder::Name => {
                scores.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| b.score.cmp(&a.score)))
            }
            SortOrder::Date => {
                scores.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.score.cmp(&a.score)))
            }
        }
        scores
    }

    pub fn average_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|s| s.score as f64).sum::<f64>() / self.scores.len() as f64
    }

    pub fn average_game_time(&self) -> Duration {
        if self.scores.is_empty() {
            return Duration::ZERO;
        }
        let total: f64 = self.scores.iter().map(|s| s.game_duration.as_secs_f64()).sum();
        Duration::from_secs_f64(total / self.scores.len() as f64)
    }
}
