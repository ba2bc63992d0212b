use crate::engine::{Axis, Board};
use crate::patterns::{WinMatchers, WIN_LENGTH};
use crate::types::{Coord, Mark, WinLine};

pub trait RuleSet {
  fn check_win(&self, board: &Board, coord: Coord, mark: Mark) -> Option<WinLine>;
}

/// Plain five-in-a-row; overlines count as wins.
pub struct StandardRuleSet {
  matchers: WinMatchers,
}

impl StandardRuleSet {
  pub fn new() -> Self {
    Self {
      matchers: WinMatchers::new(),
    }
  }
}

impl Default for StandardRuleSet {
  fn default() -> Self {
    Self::new()
  }
}

impl RuleSet for StandardRuleSet {
  /// Scans column, row, `\` and `/` through `coord` in that order and
  /// reports the first five-run of `mark`.
  fn check_win(&self, board: &Board, coord: Coord, mark: Mark) -> Option<WinLine> {
    let five = self.matchers.five(mark);
    Axis::ALL.iter().find_map(|&axis| {
      let window = board.window(coord, axis, false);
      if window.symbols.len() < WIN_LENGTH {
        return None;
      }
      five.find(&window.symbols).map(|k| WinLine {
        from: window.coord_at(k),
        to: window.coord_at(k + WIN_LENGTH - 1),
      })
    })
  }
}
