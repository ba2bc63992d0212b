//! Static, single-ply five-in-a-row opponent for a board that grows during play.
//!
//! The host drives an [`AiPlayer`] with turn, move and growth notifications:
//!
//! ```
//! use gomoku_ai::{AiPlayer, Coord, HeuristicConfig, Mark, TurnReply};
//!
//! let mut ai = AiPlayer::new(15, Mark::O, &HeuristicConfig::default().with_seed(1)).unwrap();
//! ai.apply_external_move(Coord::new(7, 7), Mark::X).unwrap();
//! if let TurnReply::Played { coord, .. } = ai.notify_turn_changed(Mark::O).unwrap() {
//!   println!("engine plays ({}, {})", coord.row, coord.col);
//! }
//! ai.notify_grid_grown();
//! assert_eq!(ai.board_size(), 17);
//! ```

pub mod ai;
pub mod config;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod player;
pub mod rules;
pub mod selfplay;
pub mod types;

pub use config::{HeuristicConfig, PatternWeight, NEARLY_FILLED_THRESHOLD};
pub use error::EngineError;
pub use player::AiPlayer;
pub use types::{Coord, GameResult, Mark, MoveOutcome, ScoreRecord, TurnReply, WinLine};
