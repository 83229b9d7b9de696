use serde::{Deserialize, Serialize};

/// Neighbor count reported by hazard cells, meaning the cell is itself the hazard.
pub const HAZARD_SENTINEL: u8 = 9;

/// A single square of the board, owned by its [`Board`](crate::Board).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) is_hazard: bool,
    pub(crate) is_visited: bool,
    pub(crate) is_flagged: bool,
    pub(crate) has_reward: bool,
    pub(crate) neighbor_hazard_count: u8,
}

impl Cell {
    pub const fn is_hazard(self) -> bool {
        self.is_hazard
    }

    pub const fn is_visited(self) -> bool {
        self.is_visited
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    pub const fn has_reward(self) -> bool {
        self.has_reward
    }

    /// Hazards in the 8-neighborhood, or [`HAZARD_SENTINEL`] for a hazard cell.
    pub const fn neighbor_hazard_count(self) -> u8 {
        self.neighbor_hazard_count
    }

    /// Clears every flag and the count, leaving a blank safe cell.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// What the player is allowed to see of this cell while the game is running.
    pub const fn view(self) -> CellView {
        use CellView::*;
        match (self.is_visited, self.is_hazard, self.is_flagged) {
            (true, true, _) => Exploded,
            (true, false, _) => Open(self.neighbor_hazard_count),
            (false, _, true) => Flag,
            (false, _, false) => Closed,
        }
    }

    /// What the player sees once the game has ended, hidden hazards included.
    pub const fn final_view(self, won: bool) -> CellView {
        use CellView::*;
        match self.view() {
            Closed if self.is_hazard && won => Flag,
            Closed if self.is_hazard => Hazard,
            Flag if !self.is_hazard => IncorrectFlag,
            view => view,
        }
    }
}

/// Presentation-facing state of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Closed,
    Open(u8),
    Flag,
    Exploded,
    Hazard,
    IncorrectFlag,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        use CellView::*;
        match self {
            Closed => true,
            Open(_) => false,
            Flag => true,
            Exploded => false,
            Hazard => false,
            IncorrectFlag => true,
        }
    }
}
