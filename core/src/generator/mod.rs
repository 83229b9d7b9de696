use ndarray::Array2;

use crate::*;

mod random;

/// Upper bound on the number of reward cells dealt onto a fresh board.
pub const MAX_REWARDS: usize = 5;

/// Source of randomness for hazard placement, reward placement and first-click relocation.
///
/// Implemented for every [`rand::Rng`], tests can swap in a [`ScriptedSource`] to pin the
/// exact layout.
pub trait RandomSource {
    /// Draws a float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Draws an integer in `[0, bound)`, `bound` must be positive.
    fn next_below(&mut self, bound: usize) -> usize;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn next_below(&mut self, bound: usize) -> usize {
        self.random_range(0..bound)
    }
}

/// Replays a fixed sequence of draws, cycling when it runs out.
///
/// Units and picks are kept on separate tracks so a test can describe the hazard mask
/// independently from the reward and relocation choices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptedSource {
    units: Vec<f64>,
    picks: Vec<usize>,
    unit_pos: usize,
    pick_pos: usize,
}

impl ScriptedSource {
    pub fn new(units: Vec<f64>, picks: Vec<usize>) -> Self {
        Self {
            units,
            picks,
            unit_pos: 0,
            pick_pos: 0,
        }
    }

    /// Units that make every cell of `mask` (row-major) a hazard and every other cell safe,
    /// for any difficulty in `(0, 0.999999]`.
    pub fn from_hazard_mask(mask: &[bool], picks: Vec<usize>) -> Self {
        let units = mask
            .iter()
            .map(|&hazard| if hazard { 0.0 } else { 0.999_999 })
            .collect();
        Self::new(units, picks)
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let Some(&unit) = self.units.get(self.unit_pos % self.units.len().max(1)) else {
            return 0.0;
        };
        self.unit_pos += 1;
        unit
    }

    fn next_below(&mut self, bound: usize) -> usize {
        let Some(&pick) = self.picks.get(self.pick_pos % self.picks.len().max(1)) else {
            return 0;
        };
        self.pick_pos += 1;
        pick % bound.max(1)
    }
}

impl Board {
    /// Neighbor counter: recomputes every cell's count from the current hazard layout.
    ///
    /// Hazard cells get [`HAZARD_SENTINEL`], every other cell the number of hazards in its
    /// Moore neighborhood.
    pub fn recount_neighbors(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            if self.cells[coords.to_nd_index()].is_hazard {
                HAZARD_SENTINEL
            } else {
                self.adjacent_hazard_count(coords)
            }
        });

        for (cell, &count) in self.cells.iter_mut().zip(counts.iter()) {
            cell.neighbor_hazard_count = count;
        }
    }

    pub fn adjacent_hazard_count(&self, coords: Coord2) -> u8 {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_hazard)
            .count()
            .try_into()
            .unwrap_or(HAZARD_SENTINEL)
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Row-major coordinates of every cell matching `predicate`.
    pub(crate) fn coords_where(&self, predicate: impl Fn(Coord2, &Cell) -> bool) -> Vec<Coord2> {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), cell))
            .filter(|&(coords, cell)| predicate(coords, cell))
            .map(|(coords, _)| coords)
            .collect()
    }
}
