use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use sapper_core::{
    GridConfig, LayoutGenerator, RandomLayoutGenerator, Session, SessionState,
};

/// Plays generated hazard grids with the inference agent and reports how
/// many boards it cleared.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Grid height in cells
    #[arg(long, default_value_t = 8)]
    height: u8,

    /// Grid width in cells
    #[arg(long, default_value_t = 8)]
    width: u8,

    /// Number of hazards to place
    #[arg(long, default_value_t = 8)]
    hazards: u16,

    /// Base seed for board generation and the agent's random guesses;
    /// drawn randomly when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of boards to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let config = GridConfig::new((cli.height, cli.width), cli.hazards)?;
    let base_seed = cli.seed.unwrap_or_else(rand::random);
    log::info!(
        "playing {} game(s) on {}x{} with {} hazards, base seed {base_seed}",
        cli.games,
        cli.height,
        cli.width,
        cli.hazards
    );

    let mut cleared = 0u32;
    for game in 0..cli.games {
        let seed = base_seed.wrapping_add(u64::from(game));
        let field = RandomLayoutGenerator::new(seed).generate(config);
        let mut session = Session::new(field, seed.rotate_left(32));

        let state = session.run()?;
        let stats = session.agent().knowledge().stats();
        match state {
            SessionState::Won => {
                cleared += 1;
                log::info!(
                    "game {game}: cleared after {} reveals, {} hazards proven",
                    stats.revealed_count,
                    stats.hazard_count
                );
            }
            SessionState::Lost => {
                log::info!(
                    "game {game}: hit a hazard at {:?} after {} reveals",
                    session.triggered_hazard(),
                    stats.revealed_count
                );
            }
            SessionState::Active => unreachable!("run returns a terminal state"),
        }
    }

    println!("{cleared}/{} game(s) cleared (base seed {base_seed})", cli.games);
    Ok(())
}
