use std::io::{self, Write};

use peeksweep_core::{Board, CellView};
use peeksweep_scores::{HighScoreStore, SortOrder};

fn cell_glyph(view: CellView) -> char {
    use CellView::*;
    match view {
        Closed => '#',
        Open(0) => '.',
        Open(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        Flag => 'F',
        Exploded => '*',
        Hazard => 'x',
        IncorrectFlag => '!',
    }
}

/// Grid with row/column labels followed by a status line.
pub(crate) fn write_board(output: &mut impl Write, board: &Board) -> io::Result<()> {
    let view = board.view();
    let width = board.size().saturating_sub(1).to_string().len();

    write!(output, "{:width$} ", "")?;
    for col in 0..board.size() {
        write!(output, " {:>width$}", col)?;
    }
    writeln!(output)?;

    for (row, cells) in view.rows().into_iter().enumerate() {
        write!(output, "{:>width$} ", row)?;
        for &cell in cells {
            write!(output, " {:>width$}", cell_glyph(cell))?;
        }
        writeln!(output)?;
    }

    writeln!(
        output,
        "Peeks: {}  Bombs left: {}  Time: {}s",
        board.rewards_remaining(),
        board.hazards_left(),
        board.elapsed().num_seconds().max(0)
    )
}

/// High score table followed by the averages.
pub(crate) fn write_scores(
    output: &mut impl Write,
    store: &HighScoreStore,
    order: SortOrder,
) -> io::Result<()> {
    let scores = store.sorted(order);
    if scores.is_empty() {
        return writeln!(output, "No high scores yet");
    }

    writeln!(output, "{:>3}  {:<16} {:>7} {:>7}  {}", "#", "Name", "Score", "Time", "Date")?;
    for (rank, stat) in scores.iter().enumerate() {
        writeln!(
            output,
            "{:>3}  {:<16} {:>7} {:>6}s  {}",
            rank + 1,
            stat.name,
            stat.score,
            stat.game_duration.as_secs(),
            stat.date.format("%Y-%m-%d %H:%M")
        )?;
    }
    writeln!(
        output,
        "Average score: {:.0}  Average time: {}s",
        store.average_score(),
        store.average_game_time().as_secs()
    )
}
