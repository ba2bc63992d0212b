use serde::{Deserialize, Serialize};

use crate::config::{HeuristicConfig, NEARLY_FILLED_THRESHOLD};
use crate::engine::Board;
use crate::error::EngineError;
use crate::player::AiPlayer;
use crate::types::{Coord, GameResult, Mark, MoveOutcome, TurnReply, WinLine};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfPlayOptions {
  pub start_size: usize,
  /// The host board stops growing at this size.
  pub max_size: usize,
  pub growth_threshold: f64,
}

impl Default for SelfPlayOptions {
  fn default() -> Self {
    Self {
      start_size: 5,
      max_size: 19,
      growth_threshold: NEARLY_FILLED_THRESHOLD,
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedMove {
  pub row: usize,
  pub col: usize,
  pub mark: Mark,
  /// Board size when the move was played.
  pub board_size: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfPlayReport {
  pub result: GameResult,
  pub moves: Vec<PlayedMove>,
  pub final_size: usize,
  pub growths: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub win_line: Option<WinLine>,
}

/// One engine per mark plus the host's own board. The host alternates
/// turns, mirrors every move into the other engine and grows the board
/// (host first, then both engines) once it is nearly filled.
pub struct Match {
  board: Board,
  x: AiPlayer,
  o: AiPlayer,
  to_move: Mark,
  options: SelfPlayOptions,
  moves: Vec<PlayedMove>,
  growths: u32,
}

impl Match {
  pub fn new(
    x_config: &HeuristicConfig,
    o_config: &HeuristicConfig,
    options: SelfPlayOptions,
  ) -> Result<Self, EngineError> {
    if options.max_size < options.start_size {
      return Err(EngineError::Configuration(format!(
        "max size {} is below start size {}",
        options.max_size, options.start_size
      )));
    }
    Ok(Self {
      board: Board::new(options.start_size),
      x: AiPlayer::new(options.start_size, Mark::X, x_config)?,
      o: AiPlayer::new(options.start_size, Mark::O, o_config)?,
      to_move: Mark::X,
      options,
      moves: Vec::new(),
      growths: 0,
    })
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  pub fn engine(&self, mark: Mark) -> &AiPlayer {
    match mark {
      Mark::X => &self.x,
      Mark::O => &self.o,
    }
  }

  /// Runs one turn. Returns the result once the game is over.
  pub fn step(&mut self) -> Result<Option<GameResult>, EngineError> {
    let mark = self.to_move;
    let size = self.board.size();
    let (mover, watcher) = match mark {
      Mark::X => (&mut self.x, &mut self.o),
      Mark::O => (&mut self.o, &mut self.x),
    };
    // Both engines hear every turn change; only the mover answers.
    watcher.notify_turn_changed(mark)?;
    let reply = mover.notify_turn_changed(mark)?;

    let (coord, outcome) = match reply {
      TurnReply::Played { coord, outcome } => (coord, outcome),
      TurnReply::Draw => return Ok(Some(GameResult::Draw)),
      TurnReply::Idle => {
        return Err(EngineError::Configuration(format!(
          "engine for {:?} ignored its own turn",
          mark
        )))
      }
    };
    if !self.board.is_empty(coord) {
      return Err(EngineError::InvalidMove {
        row: coord.row,
        col: coord.col,
        reason: "engine chose a cell the host board has filled",
      });
    }
    self.board.set(coord, mark);
    let mirrored = watcher.apply_external_move(coord, mark)?;
    debug_assert_eq!(mirrored, outcome);
    self.moves.push(PlayedMove {
      row: coord.row,
      col: coord.col,
      mark,
      board_size: size,
    });

    if let MoveOutcome::Win { mark, .. } = outcome {
      return Ok(Some(GameResult::win_for(mark)));
    }
    if self.board.is_full() && self.board.size() >= self.options.max_size {
      return Ok(Some(GameResult::Draw));
    }

    self.grow_if_needed();
    self.to_move = mark.other();
    Ok(None)
  }

  fn grow_if_needed(&mut self) {
    if self.board.fill_ratio() < self.options.growth_threshold || self.board.size() >= self.options.max_size {
      return;
    }
    self.board.grow();
    self.x.notify_grid_grown();
    self.o.notify_grid_grown();
    self.growths += 1;
    log::info!("host board grown to {}x{}", self.board.size(), self.board.size());
  }

  pub fn play(mut self) -> Result<SelfPlayReport, EngineError> {
    let result = loop {
      if let Some(result) = self.step()? {
        break result;
      }
    };
    Ok(SelfPlayReport {
      result,
      final_size: self.board.size(),
      growths: self.growths,
      win_line: self.x.win_line().or(self.o.win_line()),
      moves: self.moves,
    })
  }
}

pub fn play_game(
  x_config: &HeuristicConfig,
  o_config: &HeuristicConfig,
  options: SelfPlayOptions,
) -> Result<SelfPlayReport, EngineError> {
  Match::new(x_config, o_config, options)?.play()
}

/// Coordinates of `moves` translated to the final board, for replay displays.
pub fn final_positions(report: &SelfPlayReport) -> Vec<(Coord, Mark)> {
  report
    .moves
    .iter()
    .map(|mv| {
      let rings = (report.final_size - mv.board_size) / 2;
      (Coord::new(mv.row + rings, mv.col + rings), mv.mark)
    })
    .collect()
}
