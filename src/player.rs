//! The engine as its host sees it.
//!
//! Every stone, whether the engine chose it or the host reports it, goes
//! through [`AiPlayer::apply_external_move`] or the engine's own turn, so the
//! internal grid and the candidate map always describe the host's board.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ai::{CandidateMap, Scorer};
use crate::config::HeuristicConfig;
use crate::engine::Board;
use crate::error::EngineError;
use crate::rules::{RuleSet, StandardRuleSet};
use crate::types::{Coord, EngineSnapshot, Mark, MoveOutcome, ScoreRecord, TurnReply, WinLine};

pub struct AiPlayer {
  mark: Mark,
  board: Board,
  candidates: CandidateMap,
  scorer: Scorer,
  rules: Box<dyn RuleSet>,
  rng: StdRng,
  win_line: Option<WinLine>,
  steps: usize,
}

impl AiPlayer {
  /// Builds the grid, seeds the centre candidate and compiles the catalogue.
  /// The size must be odd so that a single centre cell exists.
  pub fn new(board_size: usize, mark: Mark, config: &HeuristicConfig) -> Result<Self, EngineError> {
    if board_size == 0 || board_size % 2 == 0 {
      return Err(EngineError::Configuration(format!(
        "board size must be a positive odd number, got {}",
        board_size
      )));
    }
    let scorer = Scorer::new(config)?;
    let board = Board::new(board_size);
    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    log::debug!(
      "engine for {:?} ready on {}x{} with {} templates",
      mark,
      board_size,
      board_size,
      scorer.patterns().len()
    );

    Ok(Self {
      mark,
      candidates: CandidateMap::seeded(board.center()),
      board,
      scorer,
      rules: Box::new(StandardRuleSet::new()),
      rng,
      win_line: None,
      steps: 0,
    })
  }

  pub fn mark(&self) -> Mark {
    self.mark
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  pub fn board_size(&self) -> usize {
    self.board.size()
  }

  pub fn steps(&self) -> usize {
    self.steps
  }

  pub fn fill_ratio(&self) -> f64 {
    self.board.fill_ratio()
  }

  pub fn is_finished(&self) -> bool {
    self.win_line.is_some()
  }

  /// Endpoints of the winning run, once one exists.
  pub fn win_line(&self) -> Option<WinLine> {
    self.win_line
  }

  pub fn candidate(&self, coord: Coord) -> Option<&ScoreRecord> {
    self.candidates.get(coord)
  }

  pub fn candidates(&self) -> impl Iterator<Item = (&Coord, &ScoreRecord)> {
    self.candidates.iter()
  }

  pub fn candidate_count(&self) -> usize {
    self.candidates.len()
  }

  /// Plays a stone when `current` is this engine's mark.
  pub fn notify_turn_changed(&mut self, current: Mark) -> Result<TurnReply, EngineError> {
    if current != self.mark {
      return Ok(TurnReply::Idle);
    }
    if self.is_finished() {
      return Err(EngineError::GameFinished);
    }

    self.recompute_pattern_scores();
    let coord = match self.candidates.select_best(&mut self.rng) {
      Ok(coord) => coord,
      Err(EngineError::OutOfCandidates) => {
        log::info!("{:?} has no candidate left, declaring a draw", self.mark);
        return Ok(TurnReply::Draw);
      }
      Err(err) => return Err(err),
    };
    let outcome = self.apply_move(coord, self.mark);
    Ok(TurnReply::Played { coord, outcome })
  }

  /// Records a stone reported by the host. Reporting the same stone twice
  /// changes nothing.
  pub fn apply_external_move(&mut self, coord: Coord, mark: Mark) -> Result<MoveOutcome, EngineError> {
    if !self.board.in_bounds(coord) {
      log::warn!("refusing off-board move ({}, {})", coord.row, coord.col);
      return Err(EngineError::InvalidMove {
        row: coord.row,
        col: coord.col,
        reason: "outside the board",
      });
    }
    match self.board.get(coord) {
      Some(existing) if existing == mark => return Ok(MoveOutcome::Unchanged),
      Some(_) => {
        log::warn!("refusing move on occupied cell ({}, {})", coord.row, coord.col);
        return Err(EngineError::InvalidMove {
          row: coord.row,
          col: coord.col,
          reason: "cell already occupied",
        });
      }
      None => {}
    }
    if self.is_finished() {
      return Err(EngineError::GameFinished);
    }
    Ok(self.apply_move(coord, mark))
  }

  /// Shifts the grid, the candidate map and the win line after the host's
  /// board gained one ring of cells.
  pub fn notify_grid_grown(&mut self) {
    self.board.grow();
    self.candidates.shift_by_ring();
    self.win_line = self.win_line.map(WinLine::shifted_by_ring);
    log::info!("{:?} engine grid grown to {}x{}", self.mark, self.board.size(), self.board.size());
  }

  /// Pattern scoring over all candidates; normally run by the engine's own turn.
  pub fn recompute_pattern_scores(&mut self) {
    self.scorer.recompute(&self.board, &mut self.candidates, self.mark);
  }

  pub fn snapshot(&self) -> EngineSnapshot {
    EngineSnapshot {
      board_size: self.board.size(),
      own_mark: self.mark,
      cells: self.board.cells(),
      candidate_count: self.candidates.len(),
      steps: self.steps,
      win_line: self.win_line,
    }
  }

  fn apply_move(&mut self, coord: Coord, mark: Mark) -> MoveOutcome {
    self.candidates.remove(coord);
    self.board.set(coord, mark);
    self.steps += 1;
    log::debug!(
      "[{}] row {}, col {}, {:?}, own move: {}",
      self.steps,
      coord.row,
      coord.col,
      mark,
      mark == self.mark
    );

    if let Some(line) = self.rules.check_win(&self.board, coord, mark) {
      log::info!("{:?} wins from ({}, {}) to ({}, {})", mark, line.from.row, line.from.col, line.to.row, line.to.col);
      self.win_line = Some(line);
      return MoveOutcome::Win { mark, line };
    }

    self.candidates.refresh_directional(&self.board, coord, mark == self.mark);
    MoveOutcome::Continue
  }
}
