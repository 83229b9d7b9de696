use chrono::prelude::*;

use crate::*;

/// Points per cell of the board.
pub const SCORE_PER_CELL: f64 = 20.0;

/// Points per unit of hazard probability.
pub const SCORE_PER_DIFFICULTY: f64 = 5000.0;

/// Speed bonus for an instant win, shrinking by [`SPEED_PENALTY_PER_SEC`] every second.
pub const SPEED_BONUS: f64 = 3000.0;

pub const SPEED_PENALTY_PER_SEC: f64 = 10.0;

impl Board {
    /// Scans the grid to detect a loss (any visited hazard) or a win (every safe cell
    /// visited), stamping the end time the first time either is seen.
    ///
    /// Once the board is `Won` or `Lost` that state is kept until the next
    /// [`Board::initialize`].
    pub fn evaluate_state(&mut self) -> GameState {
        if self.game_state.is_final() {
            return self.game_state;
        }

        let mut all_safe_visited = true;
        for cell in self.cells.iter() {
            match (cell.is_hazard, cell.is_visited) {
                (true, true) => return self.end_game(GameState::Lost),
                (false, false) => all_safe_visited = false,
                _ => {}
            }
        }

        if all_safe_visited {
            self.end_game(GameState::Won)
        } else {
            self.game_state = GameState::StillPlaying;
            self.game_state
        }
    }

    fn end_game(&mut self, state: GameState) -> GameState {
        let now = Utc::now();
        self.game_state = state;
        self.end_time.get_or_insert(now);
        log::debug!("{:?} at {}", state, now);
        state
    }

    /// Size, difficulty and speed weighted score of a won game, 0 for any other state.
    pub fn final_score(&self) -> u64 {
        let Some(end_time) = self.won_at() else {
            return 0;
        };

        let elapsed_secs = (end_time - self.start_time).num_milliseconds() as f64 / 1000.0;
        let size = f64::from(self.size());
        let base = size * size * SCORE_PER_CELL;
        let difficulty_bonus = self.difficulty * SCORE_PER_DIFFICULTY;
        let speed_bonus = (SPEED_BONUS - elapsed_secs * SPEED_PENALTY_PER_SEC).max(0.0);

        (base + difficulty_bonus + speed_bonus) as u64
    }

    /// Builds the stat record for a won game.
    ///
    /// Fails with [`GameError::GameNotWon`] unless [`Board::evaluate_state`] already
    /// reported a win.
    pub fn build_stat(&self, player_name: impl Into<String>) -> Result<GameStat> {
        let end_time = self.won_at().ok_or(GameError::GameNotWon)?;
        let game_duration = (end_time - self.start_time).to_std().unwrap_or_default();

        Ok(GameStat::new(player_name, self.final_score(), game_duration, end_time))
    }

    fn won_at(&self) -> Option<DateTime<Utc>> {
        match self.game_state {
            GameState::Won => self.end_time,
            _ => None,
        }
    }
}
