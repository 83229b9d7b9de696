use chrono::prelude::*;
use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use generator::*;
pub use outcome::*;
pub use stat::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod outcome;
pub mod serde_duration;
mod stat;
mod types;

/// Board side length preselected by the setup screen.
pub const DEFAULT_SIZE: Coord = 10;

/// Side lengths offered by the setup screen.
pub const SETUP_SIZES: core::ops::RangeInclusive<Coord> = 6..=24;

/// Hazard probability presets offered by the setup screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub const fn difficulty(self) -> f64 {
        match self {
            Self::Easy => 0.12,
            Self::Medium => 0.18,
            Self::Hard => 0.24,
        }
    }

    /// Maps the 1-based slider value, anything above 2 counts as hard.
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 | 1 => Self::Easy,
            2 => Self::Medium,
            _ => Self::Hard,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub difficulty: f64,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(size: Coord, difficulty: f64) -> Self {
        Self { size, difficulty }
    }

    pub fn new(size: Coord, difficulty: f64) -> Self {
        let size = size.clamp(1, Coord::MAX);
        let difficulty = if difficulty.is_nan() {
            0.0
        } else {
            difficulty.clamp(0.0, 1.0)
        };
        Self::new_unchecked(size, difficulty)
    }

    pub fn try_new(size: Coord, difficulty: f64) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize);
        }
        if !(0.0..=1.0).contains(&difficulty) {
            return Err(GameError::InvalidDifficulty);
        }
        Ok(Self::new_unchecked(size, difficulty))
    }

    pub fn with_level(size: Coord, level: Level) -> Self {
        Self::new(size, level.difficulty())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::with_level(DEFAULT_SIZE, Level::default())
    }
}

/// Valid transitions:
/// - StillPlaying -> Won
/// - StillPlaying -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    StillPlaying,
    Won,
    Lost,
}

impl GameState {
    /// Indicates the game has ended
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Square grid of cells plus the metadata of one game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    difficulty: f64,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    game_state: GameState,
    rewards_remaining: CellCount,
}

impl Board {
    /// Blank board without hazards or rewards, call [`Board::initialize`] to deal one.
    ///
    /// The config is clamped like [`GameConfig::new`], so the board always has at least one
    /// cell.
    pub fn new(config: GameConfig) -> Self {
        let config = GameConfig::new(config.size, config.difficulty);
        let size = config.size as usize;
        Self {
            cells: Array2::default((size, size)),
            difficulty: config.difficulty,
            start_time: Utc::now(),
            end_time: None,
            game_state: GameState::StillPlaying,
            rewards_remaining: 0,
        }
    }

    /// Builds a board with a known layout, every reward granting one peek up front.
    pub fn from_layout(config: GameConfig, hazards: &[Coord2], rewards: &[Coord2]) -> Result<Self> {
        let mut board = Self::new(config);

        for &coords in hazards {
            let coords = board.validate_coords(coords)?;
            board.cells[coords.to_nd_index()].is_hazard = true;
        }

        for &coords in rewards {
            let coords = board.validate_coords(coords)?;
            let cell = &mut board.cells[coords.to_nd_index()];
            if cell.is_hazard || cell.has_reward {
                return Err(GameError::InvalidCoords);
            }
            cell.has_reward = true;
            board.rewards_remaining += 1;
        }

        board.recount_neighbors();
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.difficulty)
    }

    pub fn size(&self) -> Coord {
        self.cells.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn rewards_remaining(&self) -> CellCount {
        self.rewards_remaining
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        let size = self.size();
        row < size && col < size
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.contains(coords)
            .then(|| self.cells[coords.to_nd_index()])
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn hazard_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_hazard)
    }

    pub fn reward_count(&self) -> CellCount {
        self.count_cells(|cell| cell.has_reward)
    }

    pub fn flag_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_flagged)
    }

    /// Hazards not yet covered by a flag, may go negative with stray flags.
    pub fn hazards_left(&self) -> i64 {
        i64::from(self.hazard_count()) - i64::from(self.flag_count())
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|&cell| predicate(cell))
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    /// Time spent so far, frozen once the end of the game was detected.
    pub fn elapsed(&self) -> chrono::TimeDelta {
        self.end_time.unwrap_or_else(Utc::now) - self.start_time
    }

    /// Player-facing rendition of the whole grid, hidden hazards exposed once the game is over.
    pub fn view(&self) -> Array2<CellView> {
        match self.game_state {
            GameState::StillPlaying => self.cells.map(|cell| cell.view()),
            GameState::Won => self.cells.map(|cell| cell.final_view(true)),
            GameState::Lost => self.cells.map(|cell| cell.final_view(false)),
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// Outcome of toggling a flag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of revealing a cell
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Safe,
    HitHazard,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Safe => true,
            HitHazard => true,
        }
    }
}

/// Used to merge outcomes when revealing several cells
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitHazard, _) => HitHazard,
            (_, HitHazard) => HitHazard,
            (Safe, _) => Safe,
            (_, Safe) => Safe,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Result of spending a reward to probe a cell
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeekOutcome {
    NoRewardAvailable,
    OutOfBounds,
    Hazard,
    Safe,
}

impl PeekOutcome {
    /// Whether a reward was spent
    pub const fn consumed_reward(self) -> bool {
        matches!(self, Self::Hazard | Self::Safe)
    }
}

impl core::fmt::Display for PeekOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::NoRewardAvailable => "No reward available.",
            Self::OutOfBounds => "That position is out of bounds.",
            Self::Hazard => "Peek result: This cell IS a bomb.",
            Self::Safe => "Peek result: This cell is safe.",
        })
    }
}
