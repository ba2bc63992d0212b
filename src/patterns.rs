//! Shape matchers compiled from the template catalogue.
//!
//! Every template describes a local formation around one own stone. The
//! compiler replaces, one at a time, each own slot of the template with a
//! focus slot (the candidate cell being scored) and merges the results into
//! a single matcher per mark. A matcher hits when any of its alternatives
//! occurs as a contiguous run inside a scanned window.

use crate::config::PatternWeight;
use crate::error::EngineError;
use crate::types::Mark;

/// Length of a winning run.
pub const WIN_LENGTH: usize = 5;
/// Cells scanned on each side of the centre of an axis window.
pub const SCAN_RADIUS: usize = 4;

const OWN_CHAR: char = 'x';
const EMPTY_CHAR: char = '_';

/// One cell of a scanned window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
  Empty,
  Stone(Mark),
  Focus,
}

impl Symbol {
  pub fn from_cell(cell: Option<Mark>) -> Self {
    match cell {
      Some(mark) => Symbol::Stone(mark),
      None => Symbol::Empty,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
  Own,
  Empty,
}

fn parse_template(text: &str) -> Result<Vec<Slot>, EngineError> {
  let slots = text
    .chars()
    .map(|c| match c {
      OWN_CHAR => Ok(Slot::Own),
      EMPTY_CHAR => Ok(Slot::Empty),
      other => Err(EngineError::Configuration(format!(
        "template {:?} contains {:?}, expected '{}' or '{}'",
        text, other, OWN_CHAR, EMPTY_CHAR
      ))),
    })
    .collect::<Result<Vec<_>, _>>()?;

  if slots.is_empty() || slots.len() > 2 * SCAN_RADIUS + 1 {
    return Err(EngineError::Configuration(format!(
      "template {:?} must hold between 1 and {} cells",
      text,
      2 * SCAN_RADIUS + 1
    )));
  }
  if !slots.contains(&Slot::Own) {
    return Err(EngineError::Configuration(format!(
      "template {:?} has no own slot to focus on",
      text
    )));
  }
  Ok(slots)
}

/// Union of fixed symbol sequences, each matched as a contiguous run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeMatcher {
  alternatives: Vec<Vec<Symbol>>,
}

impl ShapeMatcher {
  /// Matcher for `WIN_LENGTH` consecutive stones of `mark`.
  pub fn run_of(mark: Mark, len: usize) -> Self {
    Self {
      alternatives: vec![vec![Symbol::Stone(mark); len]],
    }
  }

  fn focused(slots: &[Slot], mark: Mark) -> Self {
    let alternatives = slots
      .iter()
      .enumerate()
      .filter(|(_, slot)| **slot == Slot::Own)
      .map(|(focus, _)| {
        slots
          .iter()
          .enumerate()
          .map(|(i, slot)| match slot {
            _ if i == focus => Symbol::Focus,
            Slot::Own => Symbol::Stone(mark),
            Slot::Empty => Symbol::Empty,
          })
          .collect()
      })
      .collect();
    Self { alternatives }
  }

  pub fn alternatives(&self) -> usize {
    self.alternatives.len()
  }

  /// Leftmost window offset where any alternative starts.
  pub fn find(&self, window: &[Symbol]) -> Option<usize> {
    (0..window.len()).find(|&start| {
      self.alternatives.iter().any(|alt| {
        window.len() - start >= alt.len() && window[start..start + alt.len()] == alt[..]
      })
    })
  }

  pub fn matches(&self, window: &[Symbol]) -> bool {
    self.find(window).is_some()
  }
}

/// Relaxed matcher: the stretch around the focus not blocked by the opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtendMatcher {
  mark: Mark,
}

impl ExtendMatcher {
  pub fn new(mark: Mark) -> Self {
    Self { mark }
  }

  fn passable(&self, symbol: Symbol) -> bool {
    match symbol {
      Symbol::Empty => true,
      Symbol::Stone(m) => m == self.mark,
      Symbol::Focus => false,
    }
  }

  /// Length of the maximal opponent-free run containing the focus slot.
  pub fn span(&self, window: &[Symbol]) -> Option<usize> {
    let focus = window.iter().position(|s| *s == Symbol::Focus)?;
    let left = window[..focus]
      .iter()
      .rev()
      .take_while(|s| self.passable(**s))
      .count();
    let right = window[focus + 1..]
      .iter()
      .take_while(|s| self.passable(**s))
      .count();
    Some(left + 1 + right)
  }

  /// Whether a five-run could ever be completed through the focus.
  pub fn can_extend(&self, window: &[Symbol]) -> bool {
    self.span(window).map_or(false, |len| len >= WIN_LENGTH)
  }
}

/// Compiled catalogue. The three sequences are index-aligned: entry `i` of
/// `weights` belongs to entry `i` of both matcher lists.
#[derive(Clone, Debug)]
pub struct PatternSet {
  weights: Vec<u32>,
  x_matchers: Vec<ShapeMatcher>,
  o_matchers: Vec<ShapeMatcher>,
}

impl PatternSet {
  pub fn compile(catalogue: &[PatternWeight]) -> Result<Self, EngineError> {
    let mut set = PatternSet {
      weights: Vec::with_capacity(catalogue.len()),
      x_matchers: Vec::with_capacity(catalogue.len()),
      o_matchers: Vec::with_capacity(catalogue.len()),
    };
    for entry in catalogue {
      let slots = parse_template(&entry.template)?;
      set.weights.push(entry.weight);
      set.x_matchers.push(ShapeMatcher::focused(&slots, Mark::X));
      set.o_matchers.push(ShapeMatcher::focused(&slots, Mark::O));
    }
    Ok(set)
  }

  pub fn len(&self) -> usize {
    self.weights.len()
  }

  pub fn is_empty(&self) -> bool {
    self.weights.is_empty()
  }

  pub fn weights(&self) -> &[u32] {
    &self.weights
  }

  pub fn matchers(&self, mark: Mark) -> &[ShapeMatcher] {
    match mark {
      Mark::X => &self.x_matchers,
      Mark::O => &self.o_matchers,
    }
  }

  /// Sum of the weights of every template matching `window` for `mark`.
  pub fn score(&self, mark: Mark, window: &[Symbol]) -> u64 {
    self
      .weights
      .iter()
      .zip(self.matchers(mark))
      .filter(|(_, matcher)| matcher.matches(window))
      .map(|(weight, _)| u64::from(*weight))
      .sum()
  }
}

/// Five-run and extendable matchers for both marks.
#[derive(Clone, Debug)]
pub struct WinMatchers {
  five: [ShapeMatcher; 2],
  extend: [ExtendMatcher; 2],
}

impl WinMatchers {
  pub fn new() -> Self {
    Self {
      five: [
        ShapeMatcher::run_of(Mark::X, WIN_LENGTH),
        ShapeMatcher::run_of(Mark::O, WIN_LENGTH),
      ],
      extend: [ExtendMatcher::new(Mark::X), ExtendMatcher::new(Mark::O)],
    }
  }

  fn index(mark: Mark) -> usize {
    match mark {
      Mark::X => 0,
      Mark::O => 1,
    }
  }

  pub fn five(&self, mark: Mark) -> &ShapeMatcher {
    &self.five[Self::index(mark)]
  }

  pub fn extend(&self, mark: Mark) -> &ExtendMatcher {
    &self.extend[Self::index(mark)]
  }
}

impl Default for WinMatchers {
  fn default() -> Self {
    Self::new()
  }
}
