//! Property-based tests for the rule engines.
//!
//! These tests use proptest to check the line rules hold across board
//! sizes, positions and directions.

use boardgames::board::{Board, Grid, lines, longest_run};
use boardgames::constants::{AXES, GOMOKU_WIN_LENGTH};
use boardgames::gomoku::{Stone, completes_five};
use boardgames::notakto::has_full_line;
use boardgames::numeric::{has_magic_line, magic_sum};
use proptest::prelude::*;

/// Values 1..=N² laid out as the Siamese magic square for odd N.
fn siamese(n: usize) -> Board {
    let mut board = Board::new(n);
    let (mut row, mut col) = (0, n / 2);
    for value in 1..=(n * n) as u32 {
        board.place(row, col, value);
        let (next_row, next_col) = ((row + n - 1) % n, (col + 1) % n);
        if board.get(next_row, next_col).is_some() {
            row = (row + 1) % n;
        } else {
            row = next_row;
            col = next_col;
        }
    }
    board
}

fn cell_on_board() -> impl Strategy<Value = (usize, usize, usize)> {
    (2usize..=10).prop_flat_map(|n| (Just(n), 0..n, 0..n))
}

prop_compose! {
    fn odd_size()(half in 1usize..5) -> usize {
        2 * half + 1
    }
}

proptest! {
    #[test]
    fn magic_square_lines_hit_the_magic_sum(n in odd_size()) {
        let board = siamese(n);
        prop_assert!(board.is_full());
        for line in lines(n) {
            let sum: u64 = line.iter().map(|&(r, c)| u64::from(board.cell(r, c).unwrap())).sum();
            prop_assert_eq!(sum, magic_sum(n));
        }
        prop_assert!(has_magic_line(&board));
    }

    #[test]
    fn partial_line_never_wins((n, row, col) in cell_on_board()) {
        // A lone cell holding the full target is still an incomplete line.
        let mut board = Board::new(n);
        board.place(row, col, magic_sum(n) as u32);
        prop_assert!(!has_magic_line(&board));
    }

    #[test]
    fn gomoku_run_wins_from_five(
        size in 5usize..=15,
        len in 1usize..=8,
        axis in 0usize..4,
        start_row in 0usize..15,
        start_col in 0usize..15,
    ) {
        let (dr, dc) = AXES[axis];
        let end_row = start_row as isize + dr * (len as isize - 1);
        let end_col = start_col as isize + dc * (len as isize - 1);
        prop_assume!(start_row < size && start_col < size);
        prop_assume!(end_row >= 0 && end_row < size as isize && end_col >= 0 && end_col < size as isize);

        let mut board = Board::new(size);
        let cells: Vec<(usize, usize)> = (0..len as isize)
            .map(|i| ((start_row as isize + dr * i) as usize, (start_col as isize + dc * i) as usize))
            .collect();
        for &(r, c) in &cells {
            board.place(r, c, Stone::O.value());
        }

        for &point in &cells {
            prop_assert_eq!(longest_run(&board, point, Stone::O.value()), len);
            prop_assert_eq!(completes_five(&board, point, Stone::O), len >= GOMOKU_WIN_LENGTH);
            prop_assert!(!completes_five(&board, point, Stone::X));
        }
    }

    #[test]
    fn notakto_board_with_two_marks_is_alive(a in 0usize..9, b in 0usize..9) {
        let mut board = Board::new(3);
        board.place(a / 3, a % 3, 1);
        board.place(b / 3, b % 3, 1);
        prop_assert!(!has_full_line(&board));
    }
}
