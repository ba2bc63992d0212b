use crate::patterns::{Symbol, SCAN_RADIUS};
use crate::types::{Coord, Mark};

/// The four scan directions through a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
  /// Column, top to bottom.
  Vertical,
  /// Row, left to right.
  Horizontal,
  /// `\` diagonal, top-left to bottom-right.
  Diagonal,
  /// `/` diagonal, bottom-left to top-right.
  AntiDiagonal,
}

impl Axis {
  pub const ALL: [Axis; 4] = [Axis::Vertical, Axis::Horizontal, Axis::Diagonal, Axis::AntiDiagonal];

  /// Step (row, col) taken when walking forward along the axis.
  pub fn step(self) -> (i32, i32) {
    match self {
      Axis::Vertical => (1, 0),
      Axis::Horizontal => (0, 1),
      Axis::Diagonal => (1, 1),
      Axis::AntiDiagonal => (-1, 1),
    }
  }
}

/// Cells along one axis through a centre, clipped at the board edges.
#[derive(Clone, Debug)]
pub struct AxisWindow {
  pub axis: Axis,
  pub symbols: Vec<Symbol>,
  /// First cell of the window.
  pub start: Coord,
}

impl AxisWindow {
  /// Board coordinate of the window slot at `index`.
  pub fn coord_at(&self, index: usize) -> Coord {
    let (dr, dc) = self.axis.step();
    let i = index as i64;
    Coord::new(
      (self.start.row as i64 + dr as i64 * i) as usize,
      (self.start.col as i64 + dc as i64 * i) as usize,
    )
  }
}

/// Square grid owned by the engine; grows by one ring per growth event.
#[derive(Clone, Debug)]
pub struct Board {
  size: usize,
  cells: Vec<Option<Mark>>,
  occupied: usize,
}

impl Board {
  pub fn new(size: usize) -> Self {
    Self {
      size,
      cells: vec![None; size * size],
      occupied: 0,
    }
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn center(&self) -> Coord {
    Coord::new(self.size / 2, self.size / 2)
  }

  pub fn in_bounds(&self, coord: Coord) -> bool {
    coord.row < self.size && coord.col < self.size
  }

  fn index(&self, coord: Coord) -> usize {
    coord.row * self.size + coord.col
  }

  pub fn get(&self, coord: Coord) -> Option<Mark> {
    if !self.in_bounds(coord) {
      return None;
    }
    self.cells[self.index(coord)]
  }

  /// Caller checks bounds and emptiness first.
  pub fn set(&mut self, coord: Coord, mark: Mark) {
    let idx = self.index(coord);
    if self.cells[idx].is_none() {
      self.occupied += 1;
    }
    self.cells[idx] = Some(mark);
  }

  pub fn is_empty(&self, coord: Coord) -> bool {
    self.in_bounds(coord) && self.get(coord).is_none()
  }

  pub fn is_full(&self) -> bool {
    self.occupied == self.cells.len()
  }

  pub fn occupied(&self) -> usize {
    self.occupied
  }

  pub fn fill_ratio(&self) -> f64 {
    if self.cells.is_empty() {
      return 0.0;
    }
    self.occupied as f64 / self.cells.len() as f64
  }

  pub fn cells(&self) -> Vec<Option<Mark>> {
    self.cells.clone()
  }

  /// Adds one empty row above and below and one empty cell on both ends of
  /// every row. Every existing cell moves to (row + 1, col + 1).
  pub fn grow(&mut self) {
    let new_size = self.size + 2;
    let mut cells = vec![None; new_size * new_size];
    for row in 0..self.size {
      let from = row * self.size;
      let to = (row + 1) * new_size + 1;
      cells[to..to + self.size].copy_from_slice(&self.cells[from..from + self.size]);
    }
    self.size = new_size;
    self.cells = cells;
  }

  /// Up to `SCAN_RADIUS` cells on each side of `center` along `axis`. With
  /// `focus` set, the centre slot reads as `Symbol::Focus`.
  pub fn window(&self, center: Coord, axis: Axis, focus: bool) -> AxisWindow {
    let (dr, dc) = axis.step();
    let reach = |sign: i32| {
      (1..=SCAN_RADIUS as i32)
        .take_while(|&i| {
          center
            .offset(sign * dr * i, sign * dc * i)
            .map_or(false, |c| self.in_bounds(c))
        })
        .count() as i32
    };
    let back = reach(-1);
    let ahead = reach(1);

    let symbols = (-back..=ahead)
      .filter_map(|i| center.offset(dr * i, dc * i))
      .map(|c| {
        if focus && c == center {
          Symbol::Focus
        } else {
          Symbol::from_cell(self.get(c))
        }
      })
      .collect();

    AxisWindow {
      axis,
      symbols,
      start: center.offset(-dr * back, -dc * back).unwrap_or(center),
    }
  }

  /// Text rendering used by the demo binary and test failure messages.
  pub fn render(&self) -> String {
    let mut out = String::with_capacity(self.size * (self.size + 1));
    for row in 0..self.size {
      for col in 0..self.size {
        out.push(self.get(Coord::new(row, col)).map_or('.', Mark::symbol));
      }
      out.push('\n');
    }
    out
  }
}
