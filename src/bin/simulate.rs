use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skyjobot::{Bot, Game, GameBuilder, GameConfig, RandomBot, RowBot, RowConfig, RowGame};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    /// Multi-player game on a rows x cols grid.
    Grid,
    /// Single-player row with the sorted action space.
    Row,
}

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    about = "Play seeded Skyjo rounds with random bots and report average totals."
)]
struct Args {
    /// Number of rounds to simulate
    #[arg(short = 'g', long = "games", default_value_t = 100)]
    games: usize,

    /// Base RNG seed (pile + bot RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Which game to run
    #[arg(long = "variant", value_enum, default_value_t = Variant::Grid)]
    variant: Variant,

    /// JSON file holding a GameConfig (grid) or RowConfig (row)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Number of players (grid only, overrides the config file)
    #[arg(short = 'p', long = "players")]
    players: Option<usize>,

    /// Safety cap on actions per round; rounds exceeding this are aborted
    #[arg(long = "max-turns", default_value_t = 5000)]
    max_turns: usize,
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skyjobot=info,warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("failed to install log subscriber");
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.games == 0 {
        return Err("games must be positive".into());
    }
    match args.variant {
        Variant::Grid => run_grid(&args),
        Variant::Row => run_row(&args),
    }
}

fn load_config<T: serde::de::DeserializeOwned + Default>(
    path: Option<&PathBuf>,
) -> Result<T, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(T::default()),
    }
}

fn run_grid(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut config: GameConfig = load_config(args.config.as_ref())?;
    if let Some(players) = args.players {
        config.num_players = players;
    }
    let num_players = config.num_players;

    let mut totals = vec![0i64; num_players];
    let mut rewards = vec![0.0f64; num_players];
    let mut finished = 0usize;
    for game_idx in 0..args.games {
        config.seed = mix_seed(args.seed, game_idx as u64, 0x5EED_15);
        let mut game = GameBuilder::from_config(config).build()?;
        let mut bots: Vec<Box<dyn Bot>> = (0..num_players)
            .map(|seat| {
                let rng = StdRng::seed_from_u64(mix_seed(args.seed, game_idx as u64, seat as u64));
                Box::new(RandomBot::new(rng)) as Box<dyn Bot>
            })
            .collect();

        let mut round_rewards = vec![0.0f64; num_players];
        if play_grid_round(&mut game, &mut bots, &mut round_rewards, args.max_turns)? {
            for (sum, reward) in rewards.iter_mut().zip(&round_rewards) {
                *sum += reward;
            }
            if let Some(round) = game.round_result() {
                for (total, face) in totals.iter_mut().zip(&round.face_totals) {
                    *total += *face as i64;
                }
                debug!(game = game_idx, leaders = ?round.leaders(), "round finished");
            }
            finished += 1;
        } else {
            warn!(game = game_idx, "round aborted after {} actions", args.max_turns);
        }
    }

    info!(finished, aborted = args.games - finished, "simulation complete");
    println!("Rounds finished: {finished}/{}", args.games);
    for (seat, (face, reward)) in seat_means(&totals, &rewards, finished).into_iter().enumerate() {
        println!("  Player {seat}: mean face total {face:.2}, mean step reward sum {reward:.2}");
    }
    Ok(())
}

/// Per-seat means over the finished rounds only.
fn seat_means(totals: &[i64], rewards: &[f64], finished: usize) -> Vec<(f64, f64)> {
    let denom = finished.max(1) as f64;
    totals
        .iter()
        .zip(rewards)
        .map(|(&total, &reward)| (total as f64 / denom, reward / denom))
        .collect()
}

/// Plays until the round ends or `max_turns` actions were taken. Returns whether it ended.
fn play_grid_round(
    game: &mut Game,
    bots: &mut [Box<dyn Bot>],
    rewards: &mut [f64],
    max_turns: usize,
) -> Result<bool, Box<dyn Error>> {
    for _ in 0..max_turns {
        if game.is_done() {
            return Ok(true);
        }
        let current = game.current_player();
        let observation = game.current_observation();
        let legal = game.legal_actions(current)?;
        let action = bots[current].select_action(&observation, &legal);
        let outcome = game.step(current, action)?;
        rewards[current] += outcome.reward;
    }
    Ok(game.is_done())
}

fn run_row(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut config: RowConfig = load_config(args.config.as_ref())?;
    let mut terminal_total = 0.0f64;
    let mut rounds_total = 0usize;
    for game_idx in 0..args.games {
        config.seed = mix_seed(args.seed, game_idx as u64, 0x5EED_15);
        let mut game = RowGame::new(config)?;
        let mut bot = RandomBot::new(StdRng::seed_from_u64(mix_seed(args.seed, game_idx as u64, 1)));
        let mut last_reward = 0.0;
        while !game.is_done() {
            let action = bot.select_row_action(&game.observation(), &game.legal_actions());
            last_reward = game.step(action)?.reward;
        }
        terminal_total += last_reward;
        rounds_total += game.round();
    }

    info!(games = args.games, "simulation complete");
    println!(
        "Row games: {}  mean terminal reward {:.3}  mean length {:.2}",
        args.games,
        terminal_total / args.games as f64,
        rounds_total as f64 / args.games as f64
    );
    Ok(())
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    // Simple reversible mixer (xorshift-like mix).
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
