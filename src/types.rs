use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mark {
  X,
  O,
}

impl Mark {
  pub fn other(self) -> Self {
    match self {
      Mark::X => Mark::O,
      Mark::O => Mark::X,
    }
  }

  pub fn symbol(self) -> char {
    match self {
      Mark::X => 'X',
      Mark::O => 'O',
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coord {
  pub row: usize,
  pub col: usize,
}

impl Coord {
  pub fn new(row: usize, col: usize) -> Self {
    Self { row, col }
  }

  /// Moves the coordinate by a signed offset, `None` if it would leave the first quadrant.
  pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
    let row = self.row as i64 + d_row as i64;
    let col = self.col as i64 + d_col as i64;
    if row < 0 || col < 0 {
      return None;
    }
    Some(Self::new(row as usize, col as usize))
  }

  /// The same cell after the board gained one ring on every side.
  pub fn shifted_by_ring(self) -> Self {
    Self::new(self.row + 1, self.col + 1)
  }
}

/// Endpoints of a confirmed five-in-a-row, in scan order along its axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinLine {
  pub from: Coord,
  pub to: Coord,
}

impl WinLine {
  pub fn shifted_by_ring(self) -> Self {
    Self {
      from: self.from.shifted_by_ring(),
      to: self.to.shifted_by_ring(),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
  XWin,
  OWin,
  Draw,
}

impl GameResult {
  pub fn win_for(mark: Mark) -> Self {
    match mark {
      Mark::X => GameResult::XWin,
      Mark::O => GameResult::OWin,
    }
  }
}

/// What happened after a mark went through the move executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
  Continue,
  Win { mark: Mark, line: WinLine },
  /// The same mark was already recorded on that cell; nothing changed.
  Unchanged,
}

/// Reply to a turn notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnReply {
  /// It is not this engine's turn.
  Idle,
  Played { coord: Coord, outcome: MoveOutcome },
  /// No candidate cell is left and nobody has won.
  Draw,
}

/// Per-candidate desirability accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
  pub sum: f64,
  pub attack_directional: u32,
  pub defence_directional: u32,
  pub attack_pattern: u64,
  pub defence_pattern: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
  pub board_size: usize,
  pub own_mark: Mark,
  pub cells: Vec<Option<Mark>>,
  pub candidate_count: usize,
  pub steps: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub win_line: Option<WinLine>,
}
