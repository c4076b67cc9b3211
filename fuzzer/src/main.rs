use color_eyre::eyre::{Result, WrapErr};
use flood_filler::{options::env_or, MoveSelector, SessionRegistry, SnakeOptions};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod fuzz;

fn install_tracing() {
    // Every decision logs at info, keep the selector quiet unless asked
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,fuzzer=info"));

    if std::env::var("JSON_LOGS").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    install_tracing();

    let rounds: u64 = env_or("FUZZ_ROUNDS", 10_000);
    let seed: Option<u64> = match std::env::var("FUZZ_SEED").map(|x| x.parse()) {
        Ok(Ok(x)) => Some(x),
        _ => None,
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let selector = MoveSelector::new(SnakeOptions::from_env());
    let registry = SessionRegistry::new();

    info!(rounds, ?seed, options = ?selector.options(), "fuzzing");

    for round in 1..=rounds {
        if let Some(game) = fuzz::random_game(&mut rng, &format!("fuzz-{}", round)) {
            fuzz::play_out(&game, &selector, &registry, &mut rng)
                .wrap_err_with(|| format!("Round {} broke an invariant", round))?;
        }

        if round % 1_000 == 0 {
            let stats = registry.stats();
            info!(
                round,
                games = stats.games,
                wins = stats.wins,
                average_turns = stats.average_turns().unwrap_or_default(),
                "Rounds"
            );
        }
    }

    let stats = registry.stats();
    info!(
        games = stats.games,
        wins = stats.wins,
        losses = stats.losses,
        average_size = stats.average_size().unwrap_or_default(),
        average_turns = stats.average_turns().unwrap_or_default(),
        "done"
    );

    Ok(())
}
