//! The logically infinite tape of a single-tape machine.
//!
//! The backing store is a `VecDeque`, so growth on either end is amortized O(1).
//! Offsets are signed: the head may be driven past either end by `move_head`,
//! and the next `read` or `write` fills the gap with blanks. Growth to the left
//! re-anchors the head at offset 0, so after any access the head is a valid,
//! non-negative index into `cells()`.

use crate::types::{Direction, Symbol, SNAPSHOT_BLANK_GLYPH};
use std::collections::VecDeque;
use std::iter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    head: isize,
}

impl Tape {
    /// Creates a tape holding `symbols`, with the head on the first cell.
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            cells: symbols.into_iter().collect(),
            head: 0,
        }
    }

    /// Loads an input string, one symbol per character. Characters equal to
    /// `blank` become `Symbol::Blank`.
    pub fn from_input(input: &str, blank: Option<char>) -> Self {
        Self::new(input.chars().map(|c| Symbol::from_input(c, blank)))
    }

    /// Returns the symbol under the head, growing the tape first if needed.
    pub fn read(&mut self) -> Symbol {
        let index = self.ensure_head();
        self.cells[index]
    }

    /// Overwrites the cell under the head, growing the tape first if needed.
    pub fn write(&mut self, symbol: Symbol) {
        let index = self.ensure_head();
        self.cells[index] = symbol;
    }

    /// Moves the head one cell. The tape itself is untouched until the next
    /// access.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.head -= 1,
            Direction::Right => self.head += 1,
            Direction::Stay => {}
        }
    }

    /// Extends the backing store so the head offset is in range and returns it
    /// as an index.
    fn ensure_head(&mut self) -> usize {
        if self.head < 0 {
            for _ in 0..self.head.unsigned_abs() {
                self.cells.push_front(Symbol::Blank);
            }
            self.head = 0;
        }

        let index = self.head as usize;
        if index >= self.cells.len() {
            self.cells.resize(index + 1, Symbol::Blank);
        }

        index
    }

    /// The current head offset. Negative only between a `move_head` and the
    /// following access.
    pub fn head(&self) -> isize {
        self.head
    }

    /// The materialized cells, in order.
    pub fn cells(&self) -> &VecDeque<Symbol> {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The tape content with every blank cell removed.
    pub fn content(&self) -> String {
        self.cells.iter().filter_map(Symbol::as_char).collect()
    }

    /// Number of cells holding `symbol`.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|&&s| s == symbol).count()
    }

    /// The cells padded with virtual blanks so that the head always falls
    /// inside them, together with the head's index into the result. Unlike
    /// `read`, this leaves the tape untouched.
    pub fn padded(&self) -> (Vec<Symbol>, usize) {
        let (lead, index) = if self.head < 0 {
            (self.head.unsigned_abs(), 0)
        } else {
            (0, self.head as usize)
        };
        let width = (lead + self.cells.len()).max(index + 1);

        let cells = iter::repeat(Symbol::Blank)
            .take(lead)
            .chain(self.cells.iter().copied())
            .chain(iter::repeat(Symbol::Blank))
            .take(width)
            .collect();

        (cells, index)
    }

    /// Renders a three-line debugging view: the cells, a caret under the head,
    /// and the state label.
    ///
    /// ```text
    /// ab_a
    ///   ^
    /// State: q1
    /// ```
    pub fn snapshot(&self, state: &str) -> String {
        let (cells, index) = self.padded();
        let cells: String = cells
            .iter()
            .map(|s| s.glyph(SNAPSHOT_BLANK_GLYPH))
            .collect();

        format!("{}\n{}^\nState: {}\n", cells, " ".repeat(index), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(s: &str) -> Vec<Symbol> {
        s.chars().map(Symbol::Char).collect()
    }

    #[test]
    fn test_read_past_right_end_returns_blank() {
        let mut tape = Tape::from_input("abc", None);

        for _ in 0..3 {
            tape.move_head(Direction::Right);
        }

        assert_eq!(tape.read(), Symbol::Blank);
        assert_eq!(tape.len(), 4);
        assert_eq!(tape.head(), 3);
    }

    #[test]
    fn test_read_far_past_right_end_fills_gap() {
        let mut tape = Tape::from_input("a", None);

        for _ in 0..4 {
            tape.move_head(Direction::Right);
        }

        assert_eq!(tape.read(), Symbol::Blank);
        assert_eq!(tape.len(), 5);
        assert_eq!(tape.cells()[0], Symbol::Char('a'));
    }

    #[test]
    fn test_left_growth_reanchors_head() {
        let mut tape = Tape::from_input("ab", None);

        tape.move_head(Direction::Left);
        assert_eq!(tape.head(), -1);

        tape.write(Symbol::Char('x'));
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.cells().iter().copied().collect::<Vec<_>>(), symbols("xab"));
    }

    #[test]
    fn test_repeated_left_moves_grow_by_distance() {
        let mut tape = Tape::from_input("ab", None);

        for _ in 0..3 {
            tape.move_head(Direction::Left);
        }

        assert_eq!(tape.read(), Symbol::Blank);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.len(), 5);
        assert_eq!(tape.cells()[3], Symbol::Char('a'));
        assert_eq!(tape.cells()[4], Symbol::Char('b'));
    }

    #[test]
    fn test_read_is_idempotent() {
        let mut tape = Tape::from_input("", None);

        assert_eq!(tape.read(), Symbol::Blank);
        assert_eq!(tape.len(), 1);

        assert_eq!(tape.read(), Symbol::Blank);
        assert_eq!(tape.len(), 1);
    }

    #[test]
    fn test_stay_keeps_head() {
        let mut tape = Tape::from_input("a", None);

        tape.move_head(Direction::Stay);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), Symbol::Char('a'));
    }

    #[test]
    fn test_blank_alias_in_input() {
        let tape = Tape::from_input("a_b", Some('_'));

        assert_eq!(tape.cells()[1], Symbol::Blank);
        assert_eq!(tape.content(), "ab");
    }

    #[test]
    fn test_count_symbols() {
        let tape = Tape::from_input("1101", None);
        assert_eq!(tape.count(Symbol::Char('1')), 3);
    }

    #[test]
    fn test_snapshot() {
        let mut tape = Tape::from_input("ab", None);
        tape.move_head(Direction::Right);
        tape.move_head(Direction::Right);
        tape.read();

        assert_eq!(tape.snapshot("q1"), "ab_\n  ^\nState: q1\n");
    }

    #[test]
    fn test_snapshot_before_left_growth() {
        let mut tape = Tape::from_input("ab", None);
        tape.move_head(Direction::Left);

        assert_eq!(tape.snapshot("q0"), "_ab\n^\nState: q0\n");
        assert_eq!(tape.len(), 2);

        tape.read();
        assert_eq!(tape.snapshot("q0"), "_ab\n^\nState: q0\n");
    }

    #[test]
    fn test_snapshot_past_right_end() {
        let mut tape = Tape::from_input("a", None);
        tape.move_head(Direction::Right);
        tape.move_head(Direction::Right);

        assert_eq!(tape.snapshot("q2"), "a__\n  ^\nState: q2\n");
    }
}
