use std::collections::HashMap;

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::HeuristicConfig;
use crate::engine::{Axis, Board};
use crate::error::EngineError;
use crate::patterns::{PatternSet, WinMatchers};
use crate::types::{Coord, Mark, ScoreRecord};

const DIRECTION_RADIUS: i32 = 2;

/// Relative neighbour offset and the weight it adds to a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Direction {
  pub d_row: i32,
  pub d_col: i32,
  pub weight: u32,
}

// Offsets are relative, so one table serves every board size.
lazy_static! {
  pub static ref DIRECTIONS: Vec<Direction> = {
    let mut table = Vec::with_capacity(24);
    for d_row in -DIRECTION_RADIUS..=DIRECTION_RADIUS {
      for d_col in -DIRECTION_RADIUS..=DIRECTION_RADIUS {
        if d_row == 0 && d_col == 0 {
          continue;
        }
        let weight = if d_row.abs() <= 1 && d_col.abs() <= 1 {
          3
        } else if d_row.abs() == d_col.abs() || d_row * d_col == 0 {
          2
        } else {
          1
        };
        table.push(Direction { d_row, d_col, weight });
      }
    }
    table
  };
}

/// Sparse scores for the empty cells near played stones.
#[derive(Clone, Debug, Default)]
pub struct CandidateMap {
  entries: HashMap<Coord, ScoreRecord>,
}

impl CandidateMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Single entry at `center`, leaning towards attack so an opening engine plays there.
  pub fn seeded(center: Coord) -> Self {
    let mut map = Self::new();
    map.entries.insert(
      center,
      ScoreRecord {
        attack_directional: 1,
        ..ScoreRecord::default()
      },
    );
    map
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, coord: Coord) -> Option<&ScoreRecord> {
    self.entries.get(&coord)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Coord, &ScoreRecord)> {
    self.entries.iter()
  }

  pub fn insert(&mut self, coord: Coord, record: ScoreRecord) {
    self.entries.insert(coord, record);
  }

  pub fn remove(&mut self, coord: Coord) -> Option<ScoreRecord> {
    self.entries.remove(&coord)
  }

  /// Adds the direction weights around `center` to every empty neighbour,
  /// creating entries as needed.
  pub fn refresh_directional(&mut self, board: &Board, center: Coord, own_move: bool) {
    for dir in DIRECTIONS.iter() {
      let Some(target) = center.offset(dir.d_row, dir.d_col) else {
        continue;
      };
      if !board.is_empty(target) {
        continue;
      }
      let record = self.entries.entry(target).or_default();
      if own_move {
        record.attack_directional += dir.weight;
      } else {
        record.defence_directional += dir.weight;
      }
    }
  }

  /// Re-keys every entry after the board gained one ring.
  pub fn shift_by_ring(&mut self) {
    self.entries = self
      .entries
      .drain()
      .map(|(coord, record)| (coord.shifted_by_ring(), record))
      .collect();
  }

  /// Highest `sum`, ties broken uniformly at random.
  pub fn select_best<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Coord, EngineError> {
    let max = self
      .entries
      .values()
      .map(|record| record.sum)
      .fold(f64::NEG_INFINITY, f64::max);

    let mut best: Vec<Coord> = self
      .entries
      .iter()
      .filter(|(_, record)| record.sum == max)
      .map(|(coord, _)| *coord)
      .collect();
    // HashMap order is not stable between runs; sort so a seeded rng replays.
    best.sort();
    best.choose(rng).copied().ok_or(EngineError::OutOfCandidates)
  }
}

/// Pattern-based half of the heuristic.
#[derive(Clone, Debug)]
pub struct Scorer {
  patterns: PatternSet,
  wins: WinMatchers,
  attack_bias: f64,
}

impl Scorer {
  pub fn new(config: &HeuristicConfig) -> Result<Self, EngineError> {
    config.validate()?;
    Ok(Self {
      patterns: PatternSet::compile(&config.patterns)?,
      wins: WinMatchers::new(),
      attack_bias: config.attack_bias,
    })
  }

  pub fn patterns(&self) -> &PatternSet {
    &self.patterns
  }

  /// Pattern weight `mark` would gain by playing `coord`, over all four axes.
  fn pattern_score(&self, board: &Board, coord: Coord, mark: Mark) -> u64 {
    let extend = self.wins.extend(mark);
    Axis::ALL
      .iter()
      .map(|&axis| board.window(coord, axis, true))
      .filter(|window| extend.can_extend(&window.symbols))
      .map(|window| self.patterns.score(mark, &window.symbols))
      .sum()
  }

  /// Recomputes pattern scores and sums of every candidate from scratch.
  pub fn recompute(&self, board: &Board, candidates: &mut CandidateMap, ai_mark: Mark) {
    for (coord, record) in candidates.entries.iter_mut() {
      assert!(
        board.is_empty(*coord),
        "candidate ({}, {}) is out of sync with a {}x{} grid",
        coord.row,
        coord.col,
        board.size(),
        board.size()
      );
      record.attack_pattern = self.pattern_score(board, *coord, ai_mark);
      record.defence_pattern = self.pattern_score(board, *coord, ai_mark.other());
      record.sum = record.attack_directional as f64
        + record.defence_directional as f64
        + self.attack_bias * record.attack_pattern as f64
        + record.defence_pattern as f64;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::PatternWeight;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn record(sum: f64) -> ScoreRecord {
    ScoreRecord {
      sum,
      ..ScoreRecord::default()
    }
  }

  #[test]
  fn direction_table_has_three_weight_bands() {
    assert_eq!(DIRECTIONS.len(), 24);
    let weight_of = |d_row, d_col| {
      DIRECTIONS
        .iter()
        .find(|d| d.d_row == d_row && d.d_col == d_col)
        .map(|d| d.weight)
    };
    assert_eq!(weight_of(1, -1), Some(3));
    assert_eq!(weight_of(0, 2), Some(2));
    assert_eq!(weight_of(-2, -2), Some(2));
    assert_eq!(weight_of(2, 1), Some(1));
    assert_eq!(weight_of(0, 0), None);
    assert_eq!(DIRECTIONS.iter().filter(|d| d.weight == 3).count(), 8);
    assert_eq!(DIRECTIONS.iter().filter(|d| d.weight == 2).count(), 8);
    assert_eq!(DIRECTIONS.iter().filter(|d| d.weight == 1).count(), 8);
  }

  #[test]
  fn refresh_stays_inside_the_board_and_skips_stones() {
    let mut board = Board::new(15);
    board.set(Coord::new(0, 0), Mark::X);
    board.set(Coord::new(1, 1), Mark::O);
    let mut map = CandidateMap::new();
    map.refresh_directional(&board, Coord::new(0, 0), true);

    // Quarter of the 5x5 block is on the board, minus the centre and one stone.
    assert_eq!(map.len(), 7);
    assert!(map.get(Coord::new(1, 1)).is_none());
    assert_eq!(map.get(Coord::new(0, 1)).unwrap().attack_directional, 3);
    assert_eq!(map.get(Coord::new(2, 1)).unwrap().attack_directional, 1);
    assert_eq!(map.get(Coord::new(2, 2)).unwrap().defence_directional, 0);
  }

  #[test]
  fn refresh_accumulates_attack_and_defence_separately() {
    let board = Board::new(15);
    let mut map = CandidateMap::new();
    map.refresh_directional(&board, Coord::new(7, 7), true);
    map.refresh_directional(&board, Coord::new(7, 9), false);
    let shared = map.get(Coord::new(7, 8)).unwrap();
    assert_eq!(shared.attack_directional, 3);
    assert_eq!(shared.defence_directional, 3);
  }

  #[test]
  fn shift_moves_every_key_diagonally() {
    let mut map = CandidateMap::new();
    map.insert(Coord::new(0, 0), record(1.0));
    map.insert(Coord::new(1, 1), record(2.0));
    map.insert(Coord::new(2, 2), record(3.0));
    map.shift_by_ring();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(Coord::new(1, 1)).unwrap().sum, 1.0);
    assert_eq!(map.get(Coord::new(2, 2)).unwrap().sum, 2.0);
    assert_eq!(map.get(Coord::new(3, 3)).unwrap().sum, 3.0);
    assert!(map.get(Coord::new(0, 0)).is_none());
  }

  #[test]
  fn empty_map_has_no_best_move() {
    let mut rng = StdRng::seed_from_u64(1);
    let result = CandidateMap::new().select_best(&mut rng);
    assert!(matches!(result, Err(EngineError::OutOfCandidates)));
  }

  #[test]
  fn picks_the_single_maximum() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut map = CandidateMap::new();
    map.insert(Coord::new(3, 3), record(10.0));
    map.insert(Coord::new(4, 4), record(12.5));
    map.insert(Coord::new(5, 5), record(-1.0));
    for _ in 0..20 {
      assert_eq!(map.select_best(&mut rng).unwrap(), Coord::new(4, 4));
    }
  }

  #[test]
  fn ties_are_broken_evenly() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut map = CandidateMap::new();
    map.insert(Coord::new(1, 2), record(50.0));
    map.insert(Coord::new(6, 3), record(50.0));
    map.insert(Coord::new(4, 4), record(49.0));

    let trials = 4000;
    let first = (0..trials)
      .filter(|_| map.select_best(&mut rng).unwrap() == Coord::new(1, 2))
      .count();
    assert!(first > 1700 && first < 2300, "first candidate picked {} of {}", first, trials);
  }

  #[test]
  fn recompute_scores_an_open_three_extension() {
    let scorer = Scorer::new(&HeuristicConfig::default()).unwrap();
    let mut board = Board::new(15);
    for col in 6..=8 {
      board.set(Coord::new(7, col), Mark::X);
    }
    let mut map = CandidateMap::new();
    map.insert(Coord::new(7, 9), ScoreRecord::default());
    map.insert(Coord::new(0, 0), ScoreRecord::default());
    scorer.recompute(&board, &mut map, Mark::O);

    let next_to_three = map.get(Coord::new(7, 9)).unwrap();
    assert_eq!(next_to_three.attack_pattern, 0);
    assert!(next_to_three.defence_pattern >= 7000);
    assert_eq!(next_to_three.sum, next_to_three.defence_pattern as f64);
    assert_eq!(map.get(Coord::new(0, 0)).unwrap().sum, 0.0);
  }

  #[test]
  fn attack_outweighs_equal_defence() {
    let scorer = Scorer::new(&HeuristicConfig::default()).unwrap();
    let mut board = Board::new(15);
    board.set(Coord::new(3, 3), Mark::X);
    board.set(Coord::new(3, 4), Mark::X);
    board.set(Coord::new(10, 3), Mark::O);
    board.set(Coord::new(10, 4), Mark::O);
    let mut map = CandidateMap::new();
    map.insert(Coord::new(3, 5), ScoreRecord::default());
    map.insert(Coord::new(10, 5), ScoreRecord::default());
    scorer.recompute(&board, &mut map, Mark::X);

    let attack = map.get(Coord::new(3, 5)).unwrap();
    let defence = map.get(Coord::new(10, 5)).unwrap();
    assert_eq!(attack.attack_pattern, defence.defence_pattern);
    assert!(attack.sum > defence.sum);
    assert!((attack.sum - 1.1 * defence.sum).abs() < 1e-6);
  }

  #[test]
  fn large_weights_accumulate_without_overflow() {
    let config = HeuristicConfig {
      patterns: vec![PatternWeight::new("_xx_", 3_000_000_000), PatternWeight::new("xx__", 3_000_000_000)],
      ..HeuristicConfig::default()
    };
    let scorer = Scorer::new(&config).unwrap();
    let mut board = Board::new(15);
    board.set(Coord::new(7, 7), Mark::X);
    board.set(Coord::new(6, 8), Mark::X);
    let mut map = CandidateMap::new();
    map.insert(Coord::new(7, 8), ScoreRecord::default());
    scorer.recompute(&board, &mut map, Mark::X);

    let record = map.get(Coord::new(7, 8)).unwrap();
    assert_eq!(record.attack_pattern, 12_000_000_000);
    assert_eq!(record.defence_pattern, 0);
    assert!((record.sum - 1.1 * 12e9).abs() < 1.0);
  }

  #[test]
  #[should_panic(expected = "out of sync")]
  fn occupied_candidate_fails_loudly() {
    let scorer = Scorer::new(&HeuristicConfig::default()).unwrap();
    let mut board = Board::new(5);
    board.set(Coord::new(2, 2), Mark::X);
    let mut map = CandidateMap::new();
    map.insert(Coord::new(2, 2), ScoreRecord::default());
    scorer.recompute(&board, &mut map, Mark::O);
  }
}
