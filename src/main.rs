use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use gomoku_ai::engine::Board;
use gomoku_ai::selfplay::{final_positions, play_game, SelfPlayOptions};
use gomoku_ai::{EngineError, HeuristicConfig};

/// Plays one engine-vs-engine game on a growing board and prints the result.
#[derive(Parser, Debug)]
#[command(name = "gomoku_ai")]
#[command(about = "Self-play a heuristic five-in-a-row game on a growing board", long_about = None)]
struct Cli {
  /// Heuristic config JSON (catalogue, attack bias, seed)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Starting board size (odd)
  #[arg(long, default_value_t = SelfPlayOptions::default().start_size)]
  size: usize,

  /// Board stops growing at this size
  #[arg(long, default_value_t = SelfPlayOptions::default().max_size)]
  max_size: usize,

  /// Seed for X; O uses the next value. Overrides the config seed
  #[arg(long)]
  seed: Option<u64>,
}

/// X keeps `config`; O gets the following seed so the two engines do not
/// break ties identically.
fn engine_configs(mut config: HeuristicConfig, seed: Option<u64>) -> (HeuristicConfig, HeuristicConfig) {
  if let Some(seed) = seed {
    config.seed = Some(seed);
  }
  let o_config = match config.seed {
    Some(seed) => config.clone().with_seed(seed.wrapping_add(1)),
    None => config.clone(),
  };
  (config, o_config)
}

fn run(cli: Cli) -> Result<(), EngineError> {
  let config = match &cli.config {
    Some(path) => HeuristicConfig::load(path)?,
    None => HeuristicConfig::default(),
  };
  let (x_config, o_config) = engine_configs(config, cli.seed);
  let options = SelfPlayOptions {
    start_size: cli.size,
    max_size: cli.max_size,
    ..SelfPlayOptions::default()
  };
  log::info!("self-play from {}x{} up to {}x{}", options.start_size, options.start_size, options.max_size, options.max_size);

  let report = play_game(&x_config, &o_config, options)?;

  let mut board = Board::new(report.final_size);
  for (coord, mark) in final_positions(&report) {
    board.set(coord, mark);
  }
  println!("{}", board.render());
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}

/// Growth, win and draw messages show by default; `RUST_LOG=debug` adds the move trace.
fn init_logging() {
  let env = env_logger::Env::default().default_filter_or("info");
  if let Err(err) = env_logger::Builder::from_env(env).try_init() {
    eprintln!("logger already installed: {}", err);
  }
}

fn main() -> ExitCode {
  init_logging();
  match run(Cli::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("{}", err);
      ExitCode::FAILURE
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_default_to_self_play_options() {
    let cli = Cli::parse_from(["gomoku_ai"]);
    assert_eq!(cli.size, 5);
    assert_eq!(cli.max_size, 19);
    assert!(cli.config.is_none());
    assert!(cli.seed.is_none());

    let cli = Cli::parse_from(["gomoku_ai", "--size", "9", "--max-size", "15", "--seed", "4"]);
    assert_eq!((cli.size, cli.max_size, cli.seed), (9, 15, Some(4)));
  }

  #[test]
  fn logging_reports_engine_events_by_default() {
    std::env::remove_var("RUST_LOG");
    init_logging();
    assert!(log::log_enabled!(log::Level::Info));
    assert!(!log::log_enabled!(log::Level::Debug));
  }

  #[test]
  fn config_seed_is_offset_for_the_second_engine() {
    let (x, o) = engine_configs(HeuristicConfig::default().with_seed(10), None);
    assert_eq!(x.seed, Some(10));
    assert_eq!(o.seed, Some(11));

    let (x, o) = engine_configs(HeuristicConfig::default().with_seed(10), Some(u64::MAX));
    assert_eq!(x.seed, Some(u64::MAX));
    assert_eq!(o.seed, Some(0));

    let (x, o) = engine_configs(HeuristicConfig::default(), None);
    assert!(x.seed.is_none() && o.seed.is_none());
  }
}
