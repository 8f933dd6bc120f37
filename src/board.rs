//! Gomoku board representation and win detection.
//!
//! The board is a row-major grid of `Option<Player>` cells. Searches mutate a
//! single board in place through [`Board::apply`] / [`Board::undo`] pairs, so
//! these are kept cheap and allocation-free. [`Board::win_at`] only inspects
//! the four lines through the last move and is the primitive used inside
//! search; [`Board::winner`] rescans everything and is meant for validating
//! positions handed in from outside.

use std::fmt;

use thiserror::Error;

use crate::constants::{DIRECTIONS, MAX_SIZE, MIN_SIZE, WIN_LENGTH};

/// A side in the game. Black always moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Diagram character for a stone of this player.
    pub fn symbol(self) -> char {
        match self {
            Player::Black => 'X',
            Player::White => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

/// A board coordinate. Row 0 is the top row of the diagram.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// State of a game as seen from the board alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress,
    Win(Player),
    Draw,
}

impl GameOutcome {
    pub fn is_over(self) -> bool {
        self != GameOutcome::InProgress
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "in progress"),
            GameOutcome::Win(p) => write!(f, "{p} wins"),
            GameOutcome::Draw => write!(f, "draw"),
        }
    }
}

/// Errors raised while building a board from external input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("unsupported board size {0} (must be between {MIN_SIZE} and {MAX_SIZE})")]
    UnsupportedSize(usize),

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell '{ch}' at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, ch: char },
}

/// An NxN Gomoku board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Player>>,
    stones: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SIZE)
    }
}

impl Board {
    /// Create an empty board. Panics on sizes outside the supported range;
    /// use [`Board::with_size`] for sizes coming from outside the program.
    pub fn new(size: usize) -> Self {
        match Self::with_size(size) {
            Ok(board) => board,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create an empty board, rejecting unsupported sizes.
    pub fn with_size(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::UnsupportedSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
            stones: 0,
        })
    }

    /// Parse a diagram with one string per row: `.` empty, `X` black, `O` white.
    /// Whitespace inside a row is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let mut board = Self::with_size(rows.len())?;
        for (r, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != board.size {
                return Err(BoardError::RaggedRow {
                    row: r,
                    expected: board.size,
                    found: cells.len(),
                });
            }
            for (c, ch) in cells.into_iter().enumerate() {
                let player = match ch {
                    '.' => continue,
                    'X' | 'x' => Player::Black,
                    'O' | 'o' => Player::White,
                    _ => return Err(BoardError::UnknownCell { row: r, col: c, ch }),
                };
                board.apply(Move::new(r, c), player);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, mv: Move) -> usize {
        mv.row * self.size + mv.col
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        mv.row < self.size && mv.col < self.size
    }

    /// Cell contents, or `None` for empty and out-of-range cells.
    #[inline]
    pub fn get(&self, mv: Move) -> Option<Player> {
        if !self.contains(mv) {
            return None;
        }
        self.cells[self.idx(mv)]
    }

    /// True if the move is in range and the cell is empty.
    #[inline]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.contains(mv) && self.cells[self.idx(mv)].is_none()
    }

    /// The middle cell, where the first stone goes.
    pub fn center(&self) -> Move {
        Move::new(self.size / 2, self.size / 2)
    }

    /// Place a stone. Returns false without touching the board if the cell
    /// is occupied or out of range.
    pub fn apply(&mut self, mv: Move, player: Player) -> bool {
        if !self.is_legal(mv) {
            return false;
        }
        let i = self.idx(mv);
        self.cells[i] = Some(player);
        self.stones += 1;
        true
    }

    /// Remove the stone placed by a successful [`Board::apply`].
    pub fn undo(&mut self, mv: Move) {
        debug_assert!(self.get(mv).is_some(), "undo of empty cell {mv}");
        if !self.contains(mv) {
            return;
        }
        let i = self.idx(mv);
        if self.cells[i].take().is_some() {
            self.stones -= 1;
        }
    }

    /// Length of the run of `player` stones through `mv` along `(dr, dc)`.
    fn run_through(&self, mv: Move, player: Player, dr: isize, dc: isize) -> usize {
        let mut count = 1;
        for sign in [1isize, -1] {
            let mut r = mv.row as isize + dr * sign;
            let mut c = mv.col as isize + dc * sign;
            while self.get_signed(r, c) == Some(player) {
                count += 1;
                r += dr * sign;
                c += dc * sign;
            }
        }
        count
    }

    #[inline]
    pub(crate) fn get_signed(&self, r: isize, c: isize) -> Option<Player> {
        if r < 0 || c < 0 {
            return None;
        }
        self.get(Move::new(r as usize, c as usize))
    }

    /// True if `player` has five or more in a row through `mv`.
    ///
    /// Only the four lines crossing `mv` are examined, so this should be
    /// called with the move just played.
    pub fn win_at(&self, mv: Move, player: Player) -> bool {
        if self.get(mv) != Some(player) {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&(dr, dc)| self.run_through(mv, player, dr, dc) >= WIN_LENGTH)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stones == self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stones == 0
    }

    pub fn stone_count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }

    /// Side to move judged from stone counts: equal counts mean Black.
    ///
    /// Callers that track turns should pass the side explicitly instead.
    pub fn infer_turn(&self) -> Player {
        if self.stone_count(Player::Black) <= self.stone_count(Player::White) {
            Player::Black
        } else {
            Player::White
        }
    }

    /// Full-board scan for a five. Not for use inside search.
    pub fn winner(&self) -> Option<Player> {
        self.stones().find_map(|(mv, player)| {
            DIRECTIONS.iter().any(|&(dr, dc)| {
                // Only start counting at the first stone of a run.
                let before = self.get_signed(mv.row as isize - dr, mv.col as isize - dc);
                before != Some(player) && self.run_through(mv, player, dr, dc) >= WIN_LENGTH
            })
            .then_some(player)
        })
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.winner() {
            Some(p) => GameOutcome::Win(p),
            None if self.is_full() => GameOutcome::Draw,
            None => GameOutcome::InProgress,
        }
    }

    /// Iterate over occupied cells in row-major order.
    pub fn stones(&self) -> impl Iterator<Item = (Move, Player)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.map(|p| (Move::new(i / size, i % size), p)))
    }

    /// Iterate over empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Move> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(move |(i, _)| Move::new(i / size, i % size))
    }

    /// Clear every stone, keeping the size.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.stones = 0;
    }
}

/// Column letters, skipping `I` as on Go boards.
const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Parse a vertex such as `H8`. Row 1 is the bottom row of the diagram.
pub fn parse_vertex(s: &str, size: usize) -> Option<Move> {
    let s = s.trim().to_ascii_uppercase();
    let mut chars = s.chars();
    let letter = chars.next()?;
    let col = COLUMNS.iter().position(|&b| b as char == letter)?;
    let number: usize = chars.as_str().parse().ok()?;
    if col >= size || number == 0 || number > size {
        return None;
    }
    Some(Move::new(size - number, col))
}

/// Format a move as a vertex, the inverse of [`parse_vertex`].
pub fn vertex(mv: Move, size: usize) -> String {
    format!("{}{}", COLUMNS[mv.col] as char, size - mv.row)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            write!(f, "{:>2} ", self.size - r)?;
            for c in 0..self.size {
                let ch = match self.get(Move::new(r, c)) {
                    Some(p) => p.symbol(),
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for &letter in &COLUMNS[..self.size] {
            write!(f, "{} ", letter as char)?;
        }
        writeln!(f)
    }
}
