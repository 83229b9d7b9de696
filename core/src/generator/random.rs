use chrono::Utc;

use super::*;

impl Board {
    /// Deals a fresh layout onto the board, keeping its size and difficulty.
    ///
    /// Every cell is independently made a hazard with probability `difficulty`, so the
    /// realized hazard count is random and may be zero or the whole board. Up to
    /// [`MAX_REWARDS`] safe cells then receive a reward and the player starts with one peek
    /// per reward placed.
    pub fn initialize<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.start_time = Utc::now();
        self.end_time = None;
        self.game_state = GameState::StillPlaying;
        self.rewards_remaining = 0;

        let difficulty = self.difficulty;
        for cell in self.cells.iter_mut() {
            cell.reset();
            cell.is_hazard = rng.next_unit() < difficulty;
        }

        self.place_rewards(rng, MAX_REWARDS);
        self.recount_neighbors();

        log::debug!(
            "dealt {0}x{0} board at difficulty {1}: {2} hazards, {3} rewards",
            self.size(),
            difficulty,
            self.hazard_count(),
            self.rewards_remaining
        );
    }

    /// Marks up to `reward_count` distinct safe cells as rewards, drawn without replacement.
    fn place_rewards<R: RandomSource + ?Sized>(&mut self, rng: &mut R, reward_count: usize) {
        let mut safe_cells = self.coords_where(|_, cell| !cell.is_hazard);
        if safe_cells.is_empty() {
            log::warn!("No safe cells left, board dealt without rewards");
            return;
        }

        let to_place = reward_count.min(safe_cells.len());
        for _ in 0..to_place {
            let coords = safe_cells.remove(rng.next_below(safe_cells.len()));
            self.cells[coords.to_nd_index()].has_reward = true;
        }

        self.rewards_remaining = to_place.try_into().unwrap_or(CellCount::MAX);
    }

    /// Moves the hazard at `coords` onto a random cell that is safe, reward-free and not
    /// `coords` itself, then recounts neighbors. Returns where it went, if anywhere.
    pub(crate) fn relocate_hazard<R: RandomSource + ?Sized>(
        &mut self,
        coords: Coord2,
        rng: &mut R,
    ) -> Option<Coord2> {
        let candidates =
            self.coords_where(|pos, cell| !cell.is_hazard && !cell.has_reward && pos != coords);

        if candidates.is_empty() {
            log::warn!("Cannot make first reveal at {:?} safe, no free cell left", coords);
            return None;
        }

        let target = candidates[rng.next_below(candidates.len())];
        self.cells[target.to_nd_index()].is_hazard = true;
        self.cells[coords.to_nd_index()].is_hazard = false;
        self.recount_neighbors();

        log::debug!("Moved hazard from {:?} to {:?}", coords, target);
        Some(target)
    }
}
