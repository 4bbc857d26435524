//! Position tracking for AST nodes
//!
//! Stores the source location (line/column) of AST nodes for diagnostics,
//! position-scoped traversal, and provenance. Lines are 1-based and columns
//! are 0-based, counted in characters.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use super::source::Source;

/// Errors raised when constructing invalid points or positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// Lines are 1-based.
    #[error("Line {0} cannot be less than 1")]
    LineBeforeStart(usize),

    /// The end point precedes the start point.
    #[error("End point {end} can't be before starting point {start}")]
    EndBeforeStart { start: Point, end: Point },
}

/// A point in source code (1-based line, 0-based column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub line: usize,
    pub column: usize,
}

impl Point {
    /// The first character of any text.
    pub const START: Point = Point { line: 1, column: 0 };

    /// Create a point without validating the line.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Create a point, rejecting line 0.
    pub fn try_new(line: usize, column: usize) -> Result<Self, PositionError> {
        if line < 1 {
            return Err(PositionError::LineBeforeStart(line));
        }
        Ok(Self { line, column })
    }

    /// The point reached after consuming `text` starting from this point.
    ///
    /// `\n`, `\r` and `\r\n` each count as a single line break.
    pub fn advance(self, text: &str) -> Point {
        let mut line = self.line;
        let mut column = self.column;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    line += 1;
                    column = 0;
                }
                '\n' => {
                    line += 1;
                    column = 0;
                }
                _ => column += 1,
            }
        }
        Point { line, column }
    }

    pub fn is_before(&self, other: &Point) -> bool {
        self < other
    }

    /// A zero-width position at this point.
    pub fn as_position(self) -> Position {
        Position::degenerate(self)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, Column {}", self.line, self.column)
    }
}

/// A range in source code, with optional provenance.
///
/// `source` is metadata: it takes no part in equality, hashing or ordering.
#[derive(Debug, Clone)]
pub struct Position {
    pub start: Point,
    pub end: Point,
    pub source: Option<Source>,
}

impl Position {
    pub fn new(start: Point, end: Point) -> Result<Self, PositionError> {
        if end < start {
            return Err(PositionError::EndBeforeStart { start, end });
        }
        Ok(Self {
            start,
            end,
            source: None,
        })
    }

    /// A zero-width position. Used for erroneous or empty spans.
    pub fn degenerate(point: Point) -> Self {
        Self {
            start: point,
            end: point,
            source: None,
        }
    }

    /// Create a position from line/column coordinates
    pub fn from_coords(
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Result<Self, PositionError> {
        Self::new(
            Point::try_new(start_line, start_col)?,
            Point::try_new(end_line, end_col)?,
        )
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Check if `other` lies entirely within this position
    pub fn contains(&self, other: &Position) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Check if a point falls within this position
    pub fn contains_point(&self, point: Point) -> bool {
        self.start <= point && point <= self.end
    }

    /// Check if the two positions share at least one point
    pub fn overlaps(&self, other: &Position) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Check if this position ends before `other` starts
    pub fn is_before(&self, other: &Position) -> bool {
        self.end <= other.start && self != other
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Extract the text covered by this position from the code it refers to.
    ///
    /// Returns `None` when the position lies outside `code`.
    pub fn text<'a>(&self, code: &'a str) -> Option<&'a str> {
        let start = byte_offset(code, self.start)?;
        let end = byte_offset(code, self.end)?;
        code.get(start..end)
    }
}

/// Convert a point to a byte offset into `code`, using the same line-break
/// rules as [`Point::advance`].
fn byte_offset(code: &str, point: Point) -> Option<usize> {
    let mut current = Point::START;
    let mut iter = code.char_indices().peekable();
    loop {
        if current == point {
            return Some(iter.peek().map_or(code.len(), |(offset, _)| *offset));
        }
        if current > point {
            return None;
        }
        let (_, c) = iter.next()?;
        match c {
            '\r' => {
                if matches!(iter.peek(), Some((_, '\n'))) {
                    iter.next();
                }
                current = Point::new(current.line + 1, 0);
            }
            '\n' => current = Point::new(current.line + 1, 0),
            _ => current.column += 1,
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Shorthand for [`Position::from_coords`].
pub fn pos(
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
) -> Result<Position, PositionError> {
    Position::from_coords(start_line, start_col, end_line, end_col)
}
