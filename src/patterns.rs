//! Pattern-based position evaluation.
//!
//! Every line of the board (rows, columns, and both diagonal families) is
//! scanned for runs of same-colored stones. A run is classified by its length
//! and by how many of its ends touch an empty cell:
//!
//! - `_XXXX_` open four (two open ends)
//! - `OXXXX_` blocked four (one open end)
//! - `OXXXXO` dead (no open ends, worthless unless it is already five)
//!
//! The score of each class comes from a [`PatternTable`]. The numbers are
//! tuning values, only their ordering matters, and [`PatternTable::validate`]
//! enforces it.

use crate::board::{Board, Move, Player};
use crate::config::ConfigError;
use crate::constants::{
    SCORE_BLOCKED_FOUR, SCORE_BLOCKED_ONE, SCORE_BLOCKED_THREE, SCORE_BLOCKED_TWO, SCORE_FIVE,
    SCORE_OPEN_FOUR, SCORE_OPEN_ONE, SCORE_OPEN_THREE, SCORE_OPEN_TWO, WIN_LENGTH,
};

/// Scores for each (run length, open ends) class.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTable {
    pub five: f64,
    pub open_four: f64,
    pub blocked_four: f64,
    pub open_three: f64,
    pub blocked_three: f64,
    pub open_two: f64,
    pub blocked_two: f64,
    pub open_one: f64,
    pub blocked_one: f64,
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            five: SCORE_FIVE,
            open_four: SCORE_OPEN_FOUR,
            blocked_four: SCORE_BLOCKED_FOUR,
            open_three: SCORE_OPEN_THREE,
            blocked_three: SCORE_BLOCKED_THREE,
            open_two: SCORE_OPEN_TWO,
            blocked_two: SCORE_BLOCKED_TWO,
            open_one: SCORE_OPEN_ONE,
            blocked_one: SCORE_BLOCKED_ONE,
        }
    }
}

impl PatternTable {
    /// Score of a run of `len` stones with `open_ends` (0, 1 or 2) open ends.
    #[inline]
    pub fn lookup(&self, len: usize, open_ends: u8) -> f64 {
        if len >= WIN_LENGTH {
            return self.five;
        }
        match (len, open_ends) {
            (4, 2) => self.open_four,
            (4, 1) => self.blocked_four,
            (3, 2) => self.open_three,
            (3, 1) => self.blocked_three,
            (2, 2) => self.open_two,
            (2, 1) => self.blocked_two,
            (1, 2) => self.open_one,
            (1, 1) => self.blocked_one,
            _ => 0.0,
        }
    }

    /// Check that every class outranks the next weaker one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ladder = [
            ("five", self.five),
            ("open_four", self.open_four),
            ("blocked_four", self.blocked_four),
            ("open_three", self.open_three),
            ("blocked_three", self.blocked_three),
            ("open_two", self.open_two),
            ("blocked_two", self.blocked_two),
            ("open_one", self.open_one),
            ("blocked_one", self.blocked_one),
            ("dead", 0.0),
        ];
        for pair in ladder.windows(2) {
            let (stronger, s) = pair[0];
            let (weaker, w) = pair[1];
            if !s.is_finite() || s <= w {
                return Err(ConfigError::PatternOrder { stronger, weaker });
            }
        }
        Ok(())
    }
}

/// Per-player totals for one line, indexed by [`slot`].
type LineScores = [f64; 2];

#[inline]
fn slot(player: Player) -> usize {
    match player {
        Player::Black => 0,
        Player::White => 1,
    }
}

/// Score one line starting at `(row, col)` and stepping by `(dr, dc)`.
fn score_line(
    board: &Board,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    table: &PatternTable,
) -> LineScores {
    let mut scores = [0.0; 2];
    let at = |i: usize| {
        board.get_signed(row as isize + dr * i as isize, col as isize + dc * i as isize)
    };
    let in_line = |i: usize| {
        let r = row as isize + dr * i as isize;
        let c = col as isize + dc * i as isize;
        r >= 0 && c >= 0 && board.contains(Move::new(r as usize, c as usize))
    };

    let mut i = 0;
    while in_line(i) {
        let Some(player) = at(i) else {
            i += 1;
            continue;
        };
        let start = i;
        while in_line(i) && at(i) == Some(player) {
            i += 1;
        }
        let mut open_ends = 0u8;
        if start > 0 && at(start - 1).is_none() {
            open_ends += 1;
        }
        if in_line(i) && at(i).is_none() {
            open_ends += 1;
        }
        scores[slot(player)] += table.lookup(i - start, open_ends);
    }
    scores
}

/// Length of the line starting at `(row, col)` in direction `(dr, dc)`.
fn line_len(size: usize, row: usize, col: usize, dr: isize, dc: isize) -> usize {
    let mut len = 0;
    let (mut r, mut c) = (row as isize, col as isize);
    while r >= 0 && c >= 0 && (r as usize) < size && (c as usize) < size {
        len += 1;
        r += dr;
        c += dc;
    }
    len
}

/// Sum the pattern scores of every qualifying line for both players.
fn line_totals(board: &Board, table: &PatternTable) -> LineScores {
    let size = board.size();
    let mut starts: Vec<(usize, usize, isize, isize)> = Vec::with_capacity(6 * size);
    for i in 0..size {
        starts.push((i, 0, 0, 1));
        starts.push((0, i, 1, 0));
        starts.push((0, i, 1, 1));
        starts.push((0, i, 1, -1));
        if i > 0 {
            starts.push((i, 0, 1, 1));
            starts.push((i, size - 1, 1, -1));
        }
    }

    let mut totals = [0.0; 2];
    for (row, col, dr, dc) in starts {
        // Short diagonals can never hold a five.
        if line_len(size, row, col, dr, dc) < WIN_LENGTH {
            continue;
        }
        let s = score_line(board, row, col, dr, dc, table);
        totals[0] += s[0];
        totals[1] += s[1];
    }
    totals
}

/// Raw pattern score of `player`'s stones, ignoring the opponent.
pub fn player_score(board: &Board, player: Player, table: &PatternTable) -> f64 {
    line_totals(board, table)[slot(player)]
}

/// Evaluate the board for `player`: own patterns minus `defense_weight`
/// times the opponent's patterns.
pub fn evaluate(board: &Board, player: Player, table: &PatternTable, defense_weight: f64) -> f64 {
    let totals = line_totals(board, table);
    totals[slot(player)] - defense_weight * totals[slot(player.opponent())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        PatternTable::default()
    }

    #[test]
    fn test_default_table_is_ordered() {
        assert!(table().validate().is_ok());
    }

    #[test]
    fn test_misordered_table_is_rejected() {
        let bad = PatternTable {
            open_three: 20_000.0,
            ..PatternTable::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigError::PatternOrder {
                stronger: "blocked_four",
                weaker: "open_three"
            })
        );
    }

    #[test]
    fn test_lookup_five_ignores_ends() {
        let t = table();
        assert_eq!(t.lookup(5, 0), t.five);
        assert_eq!(t.lookup(6, 2), t.five);
        assert_eq!(t.lookup(4, 0), 0.0);
    }

    #[test]
    fn test_open_and_blocked_runs() {
        let t = table();
        let open = Board::from_rows(&[
            ".......",
            ".......",
            ".XXX...",
            ".......",
            ".......",
            ".......",
            ".......",
        ])
        .unwrap();
        let open_score = player_score(&open, Player::Black, &t);
        assert!(open_score >= t.open_three);

        let blocked = Board::from_rows(&[
            ".......",
            ".......",
            "OXXX...",
            ".......",
            ".......",
            ".......",
            ".......",
        ])
        .unwrap();
        assert!(player_score(&blocked, Player::Black, &t) < open_score);
    }

    #[test]
    fn test_edge_counts_as_closed() {
        let t = table();
        let board = Board::from_rows(&[
            "XXXX.",
            ".....",
            ".....",
            ".....",
            ".....",
        ])
        .unwrap();
        let s = player_score(&board, Player::Black, &t);
        assert!(s >= t.blocked_four && s < t.open_four);
    }

    #[test]
    fn test_short_diagonals_are_skipped() {
        let t = table();
        let mut board = Board::new(7);
        board.apply(Move::new(0, 6), Player::White);
        let s = player_score(&board, Player::White, &t);
        // row: blocked one, column: blocked one, main anti-diagonal of
        // length 7: blocked one. The (1,1) diagonal through (0,6) has length 1.
        assert_eq!(s, 3.0 * t.blocked_one);
    }

    #[test]
    fn test_defense_weight_biases_towards_opponent() {
        let t = table();
        let board = Board::from_rows(&[
            ".......",
            ".XX....",
            ".......",
            ".......",
            ".......",
            "....OO.",
            ".......",
        ])
        .unwrap();
        // Point-symmetric material: the side evaluating comes out behind.
        assert!(evaluate(&board, Player::Black, &t, 1.5) < 0.0);
        assert!(evaluate(&board, Player::White, &t, 1.5) < 0.0);
        assert_eq!(evaluate(&board, Player::Black, &t, 1.0), 0.0);
    }
}
