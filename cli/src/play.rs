use std::io::{BufRead, Write};

use peeksweep_core::{Board, Coord, Coord2, GameConfig, GameState, RandomSource};
use peeksweep_scores::HighScoreStore;

use crate::render;

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Reveal(Coord2),
    Flag(Coord2),
    Peek(Coord2),
    NewGame,
    Help,
    Quit,
}

pub(crate) fn parse_input(line: &str) -> Result<Input, String> {
    let mut parts = line.split_whitespace();
    let Some(action) = parts.next() else {
        return Err("Empty command".to_string());
    };

    let mut coords = || -> Result<Coord2, String> {
        let mut next = |axis: &str| -> Result<Coord, String> {
            parts
                .next()
                .ok_or_else(|| format!("Missing {axis}"))?
                .parse::<Coord>()
                .map_err(|_| format!("Invalid {axis}"))
        };
        Ok((next("row")?, next("column")?))
    };

    match action.to_ascii_lowercase().as_str() {
        "r" | "reveal" => coords().map(Input::Reveal),
        "f" | "flag" => coords().map(Input::Flag),
        "p" | "peek" => coords().map(Input::Peek),
        "n" | "new" => Ok(Input::NewGame),
        "h" | "help" | "?" => Ok(Input::Help),
        "q" | "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("Unknown command {other:?}, type h for help")),
    }
}

const HELP: &str = "\
Commands:
  r ROW COL   reveal a cell
  f ROW COL   toggle a flag
  p ROW COL   spend a peek to learn whether a cell is a bomb
  n           deal a new board
  q           quit";

/// A terminal game: the board, its random source and the winner's name.
pub(crate) struct Session<'r, R: ?Sized> {
    board: Board,
    rng: &'r mut R,
    name: Option<String>,
}

impl<'r, R: RandomSource + ?Sized> Session<'r, R> {
    pub(crate) fn new(config: GameConfig, rng: &'r mut R, name: Option<String>) -> Self {
        let mut board = Board::new(config);
        board.initialize(&mut *rng);
        Self { board, rng, name }
    }

    #[cfg(test)]
    pub(crate) fn with_board(board: Board, rng: &'r mut R, name: Option<String>) -> Self {
        Self { board, rng, name }
    }

    /// Plays until the game ends, the player quits or input runs out.
    pub(crate) fn run(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
        store: &mut HighScoreStore,
    ) -> anyhow::Result<GameState> {
        writeln!(output, "{HELP}")?;

        loop {
            render::write_board(output, &self.board)?;
            write!(output, "> ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(self.board.game_state());
            }

            let command = match parse_input(&line) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(output, "{message}")?;
                    continue;
                }
            };
            log::debug!("input: {:?}", command);

            match command {
                Input::Reveal(coords) => {
                    let rewards_before = self.board.rewards_remaining();
                    if !self.board.reveal(coords, &mut *self.rng).has_update() {
                        writeln!(output, "Nothing to reveal there")?;
                        continue;
                    }
                    if self.board.rewards_remaining() > rewards_before {
                        writeln!(output, "You found a special reward! You can now use a peek.")?;
                    }

                    match self.board.evaluate_state() {
                        GameState::StillPlaying => {}
                        GameState::Lost => {
                            render::write_board(output, &self.board)?;
                            writeln!(output, "Game over!")?;
                            return Ok(GameState::Lost);
                        }
                        GameState::Won => {
                            render::write_board(output, &self.board)?;
                            self.record_win(input, output, store)?;
                            return Ok(GameState::Won);
                        }
                    }
                }
                Input::Flag(coords) => {
                    if !self.board.toggle_flag(coords).has_update() {
                        writeln!(output, "Cannot flag that cell")?;
                    }
                }
                Input::Peek(coords) => {
                    writeln!(output, "{}", self.board.peek(coords))?;
                }
                Input::NewGame => {
                    self.board.initialize(&mut *self.rng);
                }
                Input::Help => {
                    writeln!(output, "{HELP}")?;
                }
                Input::Quit => return Ok(self.board.game_state()),
            }
        }
    }

    fn record_win(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
        store: &mut HighScoreStore,
    ) -> anyhow::Result<()> {
        writeln!(output, "You won! Score: {}", self.board.final_score())?;

        let name = match self.name.take() {
            Some(name) => name,
            None => {
                write!(output, "Your name: ")?;
                output.flush()?;
                let mut line = String::new();
                input.read_line(&mut line)?;
                match line.trim() {
                    "" => "Anonymous".to_string(),
                    name => name.to_string(),
                }
            }
        };

        let stat = self.board.build_stat(name)?;
        if let Err(err) = store.add(stat) {
            log::error!("Could not record score: {}", err);
            writeln!(output, "Could not save your score: {err}")?;
        } else {
            render::write_scores(output, store, Default::default())?;
        }
        Ok(())
    }
}
