//! Line/column position types for Apex source location tracking.
//!
//! This crate provides the foundational location types used throughout the
//! Apex LS ecosystem: positions, source ranges, and the two-range `Location`
//! carried by every symbol and reference. Lines are 1-based and columns are
//! 0-based, matching what the upstream parser reports for its tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single point in a source file.
///
/// # Invariants
///
/// - `line` is 1-based (the first line of a file is line 1)
/// - `column` is 0-based (the first character of a line is column 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// 1-based source line
    pub line: u32,
    /// 0-based column within the line
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A contiguous range in a source file.
///
/// `end_column` is exclusive of the last character's end: a token `foo`
/// starting at column 4 has `end_column` 7. The derived ordering compares
/// start position first, which gives ranges a stable document order.
///
/// # Example
///
/// ```
/// use apex_position_tracking::{Position, Range};
///
/// let range = Range::new(1, 4, 1, 7);
/// assert!(range.contains(Position::new(1, 4)));
/// assert!(!range.contains(Position::new(1, 7))); // end is exclusive
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Range {
    /// 1-based line of the first character
    pub start_line: u32,
    /// 0-based column of the first character
    pub start_column: u32,
    /// 1-based line of the last character
    pub end_line: u32,
    /// 0-based column one past the last character
    pub end_column: u32,
}

impl Range {
    /// Creates a new range.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the end position precedes the start position.
    #[inline]
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        debug_assert!(
            (start_line, start_column) <= (end_line, end_column),
            "Range: start ({}:{}) > end ({}:{})",
            start_line,
            start_column,
            end_line,
            end_column
        );
        Self { start_line, start_column, end_line, end_column }
    }

    /// Creates a single-line range covering `len` characters from `column`.
    #[inline]
    pub fn token(line: u32, column: u32, len: u32) -> Self {
        Self::new(line, column, line, column + len)
    }

    /// Creates an empty range at the given position.
    #[inline]
    pub const fn empty(line: u32, column: u32) -> Self {
        Self { start_line: line, start_column: column, end_line: line, end_column: column }
    }

    /// Returns the start position of this range.
    #[inline]
    pub const fn start(&self) -> Position {
        Position { line: self.start_line, column: self.start_column }
    }

    /// Returns the (exclusive) end position of this range.
    #[inline]
    pub const fn end(&self) -> Position {
        Position { line: self.end_line, column: self.end_column }
    }

    /// Returns true if this range covers no characters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// Returns true if this range contains the given position.
    ///
    /// The end position is exclusive, consistent with `end_column` pointing
    /// one past the last character.
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        self.start() <= position && position < self.end()
    }

    /// Returns true if this range contains the given range entirely.
    #[inline]
    pub fn contains_range(&self, other: Range) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }

    /// Returns true if this range overlaps the given range.
    #[inline]
    pub fn overlaps(&self, other: Range) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    /// Returns a new range covering both this range and the given range.
    #[inline]
    pub fn union(&self, other: Range) -> Range {
        let start = self.start().min(other.start());
        let end = self.end().max(other.end());
        Range {
            start_line: start.line,
            start_column: start.column,
            end_line: end.line,
            end_column: end.column,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start(), self.end())
    }
}

impl From<(u32, u32, u32, u32)> for Range {
    #[inline]
    fn from((sl, sc, el, ec): (u32, u32, u32, u32)) -> Self {
        Self::new(sl, sc, el, ec)
    }
}

/// The two-range location carried by every symbol and reference.
///
/// `symbol_range` covers the full extent of the entity (a whole method
/// declaration, a whole dotted expression) while `identifier_range` covers
/// only the name token. For single-token entities the two are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    /// Full extent of the entity
    pub symbol_range: Range,
    /// The name token within `symbol_range`
    pub identifier_range: Range,
}

impl Location {
    /// Creates a location from distinct symbol and identifier ranges.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the identifier range is not contained in the
    /// symbol range.
    #[inline]
    pub fn new(symbol_range: Range, identifier_range: Range) -> Self {
        debug_assert!(
            symbol_range.contains_range(identifier_range),
            "Location: identifier range {} outside symbol range {}",
            identifier_range,
            symbol_range
        );
        Self { symbol_range, identifier_range }
    }

    /// Creates a location for a single-token entity where both ranges are
    /// equal.
    #[inline]
    pub const fn single(range: Range) -> Self {
        Self { symbol_range: range, identifier_range: range }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 5) < Position::new(2, 0));
        assert!(Position::new(3, 2) < Position::new(3, 7));
        assert_eq!(Position::new(4, 1), Position::new(4, 1));
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(2, 4, 2, 9);
        assert!(!range.contains(Position::new(2, 3)));
        assert!(range.contains(Position::new(2, 4)));
        assert!(range.contains(Position::new(2, 8)));
        assert!(!range.contains(Position::new(2, 9))); // end is exclusive
    }

    #[test]
    fn test_range_contains_multiline() {
        let range = Range::new(1, 10, 4, 1);
        assert!(range.contains(Position::new(2, 0)));
        assert!(range.contains(Position::new(3, 99)));
        assert!(range.contains(Position::new(4, 0)));
        assert!(!range.contains(Position::new(4, 1)));
        assert!(!range.contains(Position::new(1, 9)));
    }

    #[test]
    fn test_contains_range() {
        let outer = Range::new(1, 0, 10, 0);
        let inner = Range::new(2, 4, 3, 8);
        let partial = Range::new(9, 0, 11, 0);

        assert!(outer.contains_range(inner));
        assert!(!inner.contains_range(outer));
        assert!(!outer.contains_range(partial));
        assert!(outer.contains_range(outer));
    }

    #[test]
    fn test_overlaps() {
        let a = Range::new(1, 0, 1, 10);
        let b = Range::new(1, 5, 1, 15);
        let c = Range::new(1, 10, 1, 20);

        assert!(a.overlaps(b));
        assert!(!a.overlaps(c)); // adjacent ranges do not overlap
    }

    #[test]
    fn test_union() {
        let a = Range::new(1, 4, 1, 7);
        let b = Range::new(2, 0, 2, 5);
        assert_eq!(a.union(b), Range::new(1, 4, 2, 5));
        assert_eq!(b.union(a), Range::new(1, 4, 2, 5));
    }

    #[test]
    fn test_token_range() {
        let range = Range::token(3, 8, 5);
        assert_eq!(range, Range::new(3, 8, 3, 13));
        assert!(!range.is_empty());
        assert!(Range::empty(3, 8).is_empty());
    }

    #[test]
    fn test_location_single() {
        let range = Range::new(1, 0, 1, 4);
        let loc = Location::single(range);
        assert_eq!(loc.symbol_range, loc.identifier_range);
    }

    #[test]
    fn test_location_identifier_within_symbol() {
        let symbol = Range::new(1, 0, 3, 1);
        let ident = Range::new(1, 13, 1, 22);
        let loc = Location::new(symbol, ident);
        assert!(loc.symbol_range.contains_range(loc.identifier_range));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Range::new(1, 2, 3, 4)), "1:2..3:4");
        assert_eq!(format!("{}", Position::new(7, 0)), "7:0");
    }
}
