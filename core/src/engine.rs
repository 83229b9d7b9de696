use std::collections::VecDeque;

use crate::*;

impl Board {
    /// Reveals a cell, moving a hazard away on the very first reveal and flood filling from
    /// zero-count cells.
    ///
    /// Out of bounds coordinates, already visited cells and flagged cells are ignored. The
    /// call does not refuse to act on a finished game, callers check
    /// [`Board::evaluate_state`] after each reveal.
    pub fn reveal<R: RandomSource + ?Sized>(
        &mut self,
        coords: Coord2,
        rng: &mut R,
    ) -> RevealOutcome {
        use RevealOutcome::*;

        let Some(cell) = self.get(coords) else {
            return NoChange;
        };
        if cell.is_visited || cell.is_flagged {
            return NoChange;
        }

        if cell.is_hazard && self.is_untouched() {
            self.relocate_hazard(coords, rng);
        }

        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.has_reward {
            cell.has_reward = false;
            self.rewards_remaining += 1;
            log::debug!(
                "Collected reward at {:?}, {} peeks left",
                coords,
                self.rewards_remaining
            );
        }

        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_hazard {
            cell.is_visited = true;
            log::debug!("Revealed hazard at {:?}", coords);
            return HitHazard;
        }

        if cell.neighbor_hazard_count > 0 {
            cell.is_visited = true;
            log::debug!(
                "Revealed cell at {:?}, hazard count: {}",
                coords,
                cell.neighbor_hazard_count
            );
            return Safe;
        }

        let opened = self.flood_fill(coords);
        log::debug!("Flood fill from {:?} opened {} cells", coords, opened);
        Safe
    }

    /// Whether no cell has been visited yet this session.
    pub fn is_untouched(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_visited)
    }

    /// Opens the connected zero-count region around `start` plus its numbered border.
    ///
    /// Uses an explicit queue, so the depth of the region never reaches the call stack.
    fn flood_fill(&mut self, start: Coord2) -> usize {
        let mut opened = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = &mut self.cells[visit_coords.to_nd_index()];

            // skip visited, flagged or mined cells
            if cell.is_visited || cell.is_flagged || cell.is_hazard {
                continue;
            }

            cell.is_visited = true;
            opened += 1;
            let count = cell.neighbor_hazard_count;
            if cell.has_reward {
                cell.has_reward = false;
                self.rewards_remaining += 1;
                log::debug!("Flood collected reward at {:?}", visit_coords);
            }
            log::trace!("Flood opened cell at {:?}, hazard count: {}", visit_coords, count);

            // if this is also zero we visit the neighbors
            if count == 0 {
                to_visit.extend(self.iter_neighbors(visit_coords).filter(|&pos| {
                    let neighbor = self.cells[pos.to_nd_index()];
                    !(neighbor.is_visited || neighbor.is_flagged || neighbor.is_hazard)
                }));
            }
        }

        opened
    }

    /// Places or removes the player's flag on an unvisited cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        use FlagOutcome::*;

        if !self.contains(coords) {
            return NoChange;
        }

        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_visited {
            return NoChange;
        }

        cell.is_flagged = !cell.is_flagged;
        log::debug!("Flag at {:?} set to {}", coords, cell.is_flagged);
        Changed
    }

    /// Spends one reward to learn whether a cell holds a hazard, without revealing it.
    pub fn peek(&mut self, coords: Coord2) -> PeekOutcome {
        if self.rewards_remaining == 0 {
            return PeekOutcome::NoRewardAvailable;
        }

        let Some(cell) = self.get(coords) else {
            return PeekOutcome::OutOfBounds;
        };

        self.rewards_remaining -= 1;
        log::debug!("Peeked at {:?}, {} peeks left", coords, self.rewards_remaining);

        if cell.is_hazard {
            PeekOutcome::Hazard
        } else {
            PeekOutcome::Safe
        }
    }

    /// Visits a single cell with no first-reveal protection and no flood fill.
    ///
    /// Collects a reward if present and returns whether the cell was a hazard, or `None` when
    /// the cell is out of bounds, already visited or flagged.
    pub fn visit_cell(&mut self, coords: Coord2) -> Option<bool> {
        let cell = self.get(coords)?;
        if cell.is_visited || cell.is_flagged {
            return None;
        }

        let cell = &mut self.cells[coords.to_nd_index()];
        cell.is_visited = true;

        if cell.has_reward {
            cell.has_reward = false;
            self.rewards_remaining += 1;
        }

        Some(self.cells[coords.to_nd_index()].is_hazard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord, hazards: &[Coord2], rewards: &[Coord2]) -> Board {
        Board::from_layout(GameConfig::new(size, 0.2), hazards, rewards).unwrap()
    }

    fn visited(board: &Board) -> Vec<Coord2> {
        board.coords_where(|_, cell| cell.is_visited)
    }

    #[test]
    fn reveal_numbered_cell_opens_only_itself() {
        let mut board = layout(3, &[(0, 0)], &[]);

        let outcome = board.reveal((1, 1), &mut ScriptedSource::default());

        assert_eq!(outcome, RevealOutcome::Safe);
        assert_eq!(visited(&board), vec![(1, 1)]);
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region_and_border() {
        let mut board = layout(4, &[(0, 3), (3, 0)], &[]);

        board.reveal((0, 0), &mut ScriptedSource::default());

        let expected: Vec<Coord2> = (0..4)
            .flat_map(|row| (0..4).map(move |col| (row, col)))
            .filter(|&pos| pos != (0, 3) && pos != (3, 0))
            .collect();
        assert_eq!(visited(&board), expected);
        assert_eq!(board.view()[[1, 2]], CellView::Open(1));
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut board = layout(3, &[], &[]);
        board.toggle_flag((2, 2));

        board.reveal((0, 0), &mut ScriptedSource::default());

        assert!(!board[(2, 2)].is_visited());
        assert!(board[(2, 2)].is_flagged());
        assert_eq!(visited(&board).len(), 8);
    }

    #[test]
    fn flood_fill_is_bounded_in_depth() {
        let mut board = layout(600, &[], &[]);

        board.reveal((0, 0), &mut ScriptedSource::default());

        assert!(board.cells().iter().all(|cell| cell.is_visited()));
    }

    #[test]
    fn reveal_ignores_flagged_visited_and_out_of_bounds() {
        let mut board = layout(3, &[(0, 0)], &[]);
        let mut rng = ScriptedSource::default();

        assert_eq!(board.toggle_flag((1, 1)), FlagOutcome::Changed);
        assert_eq!(board.reveal((1, 1), &mut rng), RevealOutcome::NoChange);
        assert_eq!(board.reveal((3, 0), &mut rng), RevealOutcome::NoChange);

        assert_eq!(board.toggle_flag((1, 1)), FlagOutcome::Changed);
        assert_eq!(board.reveal((1, 1), &mut rng), RevealOutcome::Safe);
        assert_eq!(board.reveal((1, 1), &mut rng), RevealOutcome::NoChange);
    }

    #[test]
    fn first_reveal_moves_hazard_away() {
        let mut board = layout(3, &[(1, 1)], &[(0, 0)]);
        // free cells in row-major order skip the reward at (0, 0) and the click at (1, 1)
        let mut rng = ScriptedSource::new(vec![], vec![1]);

        let outcome = board.reveal((1, 1), &mut rng);

        assert_eq!(outcome, RevealOutcome::Safe);
        assert!(!board[(1, 1)].is_hazard());
        assert!(board[(0, 2)].is_hazard());
        assert_eq!(board.hazard_count(), 1);
        assert_eq!(board[(1, 1)].neighbor_hazard_count(), 1);
        assert_eq!(board[(0, 2)].neighbor_hazard_count(), HAZARD_SENTINEL);
    }

    #[test]
    fn later_reveal_of_hazard_is_a_loss() {
        let mut board = layout(3, &[(2, 2)], &[]);
        let mut rng = ScriptedSource::default();

        assert_eq!(board.reveal((0, 2), &mut rng), RevealOutcome::Safe);
        assert_eq!(board.reveal((2, 2), &mut rng), RevealOutcome::HitHazard);
        assert!(board[(2, 2)].is_hazard());
        assert!(board[(2, 2)].is_visited());
    }

    #[test]
    fn first_reveal_on_saturated_board_can_lose() {
        let hazards: Vec<Coord2> = (0..2)
            .flat_map(|row| (0..2).map(move |col| (row, col)))
            .collect();
        let mut board = layout(2, &hazards, &[]);

        assert_eq!(
            board.reveal((0, 0), &mut ScriptedSource::default()),
            RevealOutcome::HitHazard
        );
    }

    #[test]
    fn reveal_collects_reward() {
        let mut board = layout(3, &[(0, 0)], &[(2, 2)]);
        assert_eq!(board.rewards_remaining(), 1);

        board.reveal((2, 2), &mut ScriptedSource::default());

        assert!(!board[(2, 2)].has_reward());
        assert_eq!(board.rewards_remaining(), 2);
    }

    #[test]
    fn flood_fill_collects_rewards_it_opens() {
        let mut board = layout(3, &[], &[(2, 2), (1, 1)]);

        board.reveal((0, 0), &mut ScriptedSource::default());

        assert!(board[(2, 2)].is_visited());
        assert_eq!(board.reward_count(), 0);
        assert_eq!(board.rewards_remaining(), 4);
    }

    #[test]
    fn toggle_flag_ignores_visited_and_out_of_bounds() {
        let mut board = layout(2, &[(0, 0)], &[]);
        board.reveal((1, 1), &mut ScriptedSource::default());

        assert_eq!(board.toggle_flag((1, 1)), FlagOutcome::NoChange);
        assert_eq!(board.toggle_flag((0, 2)), FlagOutcome::NoChange);
        assert_eq!(board.toggle_flag((0, 0)), FlagOutcome::Changed);
        assert!(board[(0, 0)].is_flagged());
        assert_eq!(board.hazards_left(), 0);
    }

    #[test]
    fn peek_without_rewards_changes_nothing() {
        let mut board = layout(3, &[(0, 0)], &[]);
        let before = board.clone();

        assert_eq!(board.peek((0, 0)), PeekOutcome::NoRewardAvailable);
        assert_eq!(board, before);
    }

    #[test]
    fn peek_out_of_bounds_keeps_reward() {
        let mut board = layout(3, &[(0, 0)], &[(1, 1)]);

        assert_eq!(board.peek((5, 5)), PeekOutcome::OutOfBounds);
        assert_eq!(board.rewards_remaining(), 1);
    }

    #[test]
    fn peek_spends_reward_without_revealing() {
        let mut board = layout(3, &[(0, 0)], &[(1, 1), (2, 2)]);

        assert_eq!(board.peek((0, 0)), PeekOutcome::Hazard);
        assert_eq!(board.peek((2, 1)), PeekOutcome::Safe);
        assert_eq!(board.peek((2, 1)), PeekOutcome::NoRewardAvailable);
        assert_eq!(board.rewards_remaining(), 0);
        assert!(board.is_untouched());
    }

    #[test]
    fn visit_cell_reports_hazard_without_cascade() {
        let mut board = layout(3, &[(0, 0)], &[(2, 2)]);

        assert_eq!(board.visit_cell((2, 2)), Some(false));
        assert_eq!(visited(&board), vec![(2, 2)]);
        assert_eq!(board.rewards_remaining(), 2);
        assert_eq!(board.visit_cell((2, 2)), None);
        assert_eq!(board.visit_cell((0, 0)), Some(true));
        assert_eq!(board.visit_cell((3, 3)), None);
    }
}
