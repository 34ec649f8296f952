use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::AXES;

pub type Point = (usize, usize);

/// Read-only view of a square grid of optional marks.
///
/// The rule engines are written against this trait so a computer player can
/// ask "what if I played here?" through an [`Overlay`] without touching the
/// live board.
pub trait Grid {
    fn size(&self) -> usize;
    /// Mark at `(row, col)`, or `None` when empty or off the board.
    fn cell(&self, row: usize, col: usize) -> Option<u32>;
}

/// An NxN board of optional marks. A filled cell is never overwritten.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vec<Vec<Option<u32>>>,
}

#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Vec<Option<u32>>>,
}

impl TryFrom<RawBoard> for Board {
    type Error = String;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.size == 0 {
            return Err("board size must be positive".to_string());
        }
        if raw.cells.len() != raw.size || raw.cells.iter().any(|row| row.len() != raw.size) {
            return Err(format!("board cells are not a {0}x{0} grid", raw.size));
        }
        Ok(Board {
            size: raw.size,
            cells: raw.cells,
        })
    }
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![None; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.cells[row][col]
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    /// In bounds and empty.
    pub fn is_valid_move(&self, row: usize, col: usize) -> bool {
        self.in_bounds(row, col) && self.cells[row][col].is_none()
    }

    /// Place `value` if the move is valid. Returns whether the board changed.
    pub fn place(&mut self, row: usize, col: usize, value: u32) -> bool {
        if !self.is_valid_move(row, col) {
            return false;
        }
        self.cells[row][col] = Some(value);
        true
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.size)
            .flat_map(move |row| (0..self.size).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cells[row][col].is_none())
    }

    /// View of this board with one extra mark placed at `(row, col)`.
    pub fn with(&self, row: usize, col: usize, value: u32) -> Overlay<'_> {
        Overlay {
            board: self,
            point: (row, col),
            value,
        }
    }

    /// Render the grid, asking `label` for the text of every cell.
    pub fn render_with<F>(&self, label: F) -> String
    where
        F: Fn(Point, Option<u32>) -> String,
    {
        let labels: Vec<Vec<String>> = (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| label((row, col), self.cells[row][col]))
                    .collect()
            })
            .collect();
        let width = labels.iter().flatten().map(String::len).max().unwrap_or(1).max(1);
        let rule = "-".repeat(self.size * (width + 3) - 1);

        let mut out = String::new();
        for (row, cells) in labels.iter().enumerate() {
            let line: Vec<String> = cells.iter().map(|c| format!(" {c:>width$} ")).collect();
            out.push_str(&line.join("|"));
            out.push('\n');
            if row + 1 < self.size {
                out.push_str(&rule);
                out.push('\n');
            }
        }
        out
    }
}

impl Grid for Board {
    fn size(&self) -> usize {
        self.size
    }

    fn cell(&self, row: usize, col: usize) -> Option<u32> {
        self.get(row, col)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render_with(|_, value| value.map(|v| v.to_string()).unwrap_or_default());
        f.write_str(&text)
    }
}

/// A board plus one hypothetical mark. Borrowing only, so the board stays
/// untouched while heuristics evaluate candidates.
#[derive(Clone, Copy, Debug)]
pub struct Overlay<'a> {
    board: &'a Board,
    point: Point,
    value: u32,
}

impl Grid for Overlay<'_> {
    fn size(&self) -> usize {
        self.board.size
    }

    fn cell(&self, row: usize, col: usize) -> Option<u32> {
        if (row, col) == self.point && self.board.in_bounds(row, col) {
            Some(self.value)
        } else {
            self.board.get(row, col)
        }
    }
}

// =============================================================================
// Line Geometry
// =============================================================================

/// Every full line of an NxN grid: rows, columns, then the main diagonal and
/// the anti-diagonal.
pub fn lines(size: usize) -> Vec<Vec<Point>> {
    let mut out = Vec::with_capacity(2 * size + 2);
    for i in 0..size {
        out.push((0..size).map(|j| (i, j)).collect());
    }
    for j in 0..size {
        out.push((0..size).map(|i| (i, j)).collect());
    }
    out.push((0..size).map(|i| (i, i)).collect());
    out.push((0..size).map(|i| (i, size - 1 - i)).collect());
    out
}

/// Values of a line, or `None` if any of its cells is empty.
pub fn filled_line<G: Grid>(grid: &G, line: &[Point]) -> Option<Vec<u32>> {
    line.iter().map(|&(row, col)| grid.cell(row, col)).collect()
}

/// Count cells equal to `value` walking from `(row, col)` along `(dr, dc)`,
/// not counting the start cell.
fn count_direction<G: Grid>(grid: &G, (row, col): Point, value: u32, (dr, dc): (isize, isize)) -> usize {
    let size = grid.size() as isize;
    let (mut r, mut c) = (row as isize + dr, col as isize + dc);
    let mut count = 0;
    while r >= 0 && r < size && c >= 0 && c < size && grid.cell(r as usize, c as usize) == Some(value) {
        count += 1;
        r += dr;
        c += dc;
    }
    count
}

/// Length of the contiguous run of `value` through `point` along one axis,
/// the point itself included.
pub fn run_length<G: Grid>(grid: &G, point: Point, value: u32, axis: (isize, isize)) -> usize {
    1 + count_direction(grid, point, value, axis) + count_direction(grid, point, value, (-axis.0, -axis.1))
}

/// Longest run of `value` through `point` over the four axes.
pub fn longest_run<G: Grid>(grid: &G, point: Point, value: u32) -> usize {
    AXES.iter()
        .map(|&axis| run_length(grid, point, value, axis))
        .max()
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_occupancy() {
        let mut board = Board::new(3);
        assert!(board.place(1, 1, 5));
        assert_eq!(board.get(1, 1), Some(5));
        assert!(!board.place(1, 1, 7), "occupied cell must not be overwritten");
        assert_eq!(board.get(1, 1), Some(5));
    }

    #[test]
    fn test_out_of_bounds_is_invalid_not_panic() {
        let mut board = Board::new(3);
        assert!(!board.is_valid_move(3, 0));
        assert!(!board.is_valid_move(0, 99));
        assert!(!board.place(5, 5, 1));
        assert_eq!(board.get(5, 5), None);
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::new(2);
        for (i, (r, c)) in [(0, 0), (0, 1), (1, 0)].into_iter().enumerate() {
            board.place(r, c, i as u32 + 1);
        }
        assert!(!board.is_full());
        board.place(1, 1, 4);
        assert!(board.is_full());
    }

    #[test]
    fn test_empty_cells_row_major() {
        let mut board = Board::new(2);
        board.place(0, 1, 1);
        let empty: Vec<Point> = board.empty_cells().collect();
        assert_eq!(empty, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_overlay_does_not_mutate() {
        let board = Board::new(3);
        let view = board.with(2, 2, 9);
        assert_eq!(view.cell(2, 2), Some(9));
        assert_eq!(board.get(2, 2), None);
    }

    #[test]
    fn test_lines_cover_rows_columns_diagonals() {
        let all = lines(3);
        assert_eq!(all.len(), 8);
        assert!(all.contains(&vec![(0, 2), (1, 1), (2, 0)]));
        assert!(all.contains(&vec![(0, 1), (1, 1), (2, 1)]));
    }

    #[test]
    fn test_run_length_counts_both_directions() {
        let mut board = Board::new(7);
        for col in [1, 2, 4, 5] {
            board.place(3, col, 1);
        }
        assert_eq!(run_length(&board.with(3, 3, 1), (3, 3), 1, (0, 1)), 5);
        assert_eq!(longest_run(&board.with(3, 3, 1), (3, 3), 1), 5);
        assert_eq!(longest_run(&board.with(0, 0, 1), (0, 0), 1), 1);
    }

    #[test]
    fn test_deserialize_rejects_ragged_grid() {
        let json = r#"{"size":2,"cells":[[null,null],[null]]}"#;
        assert!(serde_json::from_str::<Board>(json).is_err());
        let ok = r#"{"size":2,"cells":[[1,null],[null,2]]}"#;
        let board: Board = serde_json::from_str(ok).unwrap();
        assert_eq!(board.get(1, 1), Some(2));
    }

    #[test]
    fn test_display_grid() {
        let mut board = Board::new(2);
        board.place(0, 0, 3);
        let text = board.to_string();
        assert_eq!(text, " 3 |   \n-------\n   |   \n");
    }
}
