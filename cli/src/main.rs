use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use peeksweep_core::{Coord, DEFAULT_SIZE, GameConfig, Level, SETUP_SIZES};
use peeksweep_scores::{HighScoreStore, SortOrder};
use rand::{SeedableRng, rngs::SmallRng};

mod play;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Score file to use instead of the platform data directory
    #[arg(long, global = true)]
    scores_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal
    Play {
        /// Board side length
        #[arg(short, long, default_value_t = DEFAULT_SIZE, value_parser = parse_size)]
        size: Coord,

        /// Difficulty level, 1 to 3
        #[arg(
            short,
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u8).range(1..=3)
        )]
        level: u8,

        /// Hazard probability between 0 and 1, overrides the level
        #[arg(short, long)]
        difficulty: Option<f64>,

        /// Force a seed instead of random
        #[arg(long)]
        seed: Option<u64>,

        /// Name recorded with a winning score, asked for when missing
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the high score list
    Scores {
        #[arg(long, value_enum, default_value_t = SortArg::Score)]
        sort: SortArg,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Score,
    Name,
    Date,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Score => SortOrder::Score,
            SortArg::Name => SortOrder::Name,
            SortArg::Date => SortOrder::Date,
        }
    }
}

fn parse_size(value: &str) -> Result<Coord, String> {
    let size: Coord = value.parse().map_err(|err| format!("{err}"))?;
    if SETUP_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(format!(
            "size must be between {} and {}",
            SETUP_SIZES.start(),
            SETUP_SIZES.end()
        ))
    }
}

fn open_store(path: Option<PathBuf>) -> anyhow::Result<HighScoreStore> {
    match path {
        Some(path) => Ok(HighScoreStore::open(path)),
        None => HighScoreStore::open_default().context("Could not locate the score file"),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("{:?}", args);

    match args.command {
        Command::Play {
            size,
            level,
            difficulty,
            seed,
            name,
        } => {
            let config = match difficulty {
                Some(difficulty) => GameConfig::try_new(size, difficulty)?,
                None => GameConfig::with_level(size, Level::from_index(level)),
            };
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };
            let mut store = open_store(args.scores_file)?;

            let stdin = io::stdin();
            let mut session = play::Session::new(config, &mut rng, name);
            session.run(&mut stdin.lock(), &mut io::stdout(), &mut store)?;
        }
        Command::Scores { sort } => {
            let store = open_store(args.scores_file)?;
            render::write_scores(&mut io::stdout(), &store, sort.into())?;
        }
    }

    Ok(())
}
