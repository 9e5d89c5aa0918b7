//! Canvas: 2D grid of cell stacks.
//!
//! The grid only grows to the right. Positions use signed coordinates so
//! that routing can look one step outside the grid without wrapping.

use log::trace;

use super::cell::{CellStack, Tags};
use super::charset::CharSet;
use crate::error::CanvasError;

// ─── Point ───────────────────────────────────────────────────────────────────

/// A position in character-grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A tag query: the tag key and a predicate over its value.
pub type TagQuery<'a> = (&'a str, &'a dyn Fn(&str) -> bool);

// ─── Canvas ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    rows: Vec<Vec<CellStack>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![vec![CellStack::default(); width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Append `n` empty columns on the right of every row.
    pub fn expand_right(&mut self, n: usize) {
        for row in &mut self.rows {
            row.resize_with(row.len() + n, CellStack::default);
        }
        self.width += n;
    }

    pub fn cell_at(&self, p: Point) -> Option<&CellStack> {
        let (x, y) = Self::index(p)?;
        self.rows.get(y)?.get(x)
    }

    pub fn cell_at_mut(&mut self, p: Point) -> Option<&mut CellStack> {
        let (x, y) = Self::index(p)?;
        self.rows.get_mut(y)?.get_mut(x)
    }

    fn index(p: Point) -> Option<(usize, usize)> {
        Some((usize::try_from(p.x).ok()?, usize::try_from(p.y).ok()?))
    }

    /// Walk `|length| + 1` cells from `origin`, downwards for a positive
    /// length and upwards for a negative one. Returns true at the first cell
    /// whose merged tags satisfy any query. Running off the grid is a miss;
    /// an out-of-bounds origin is an error.
    pub fn ray_cast_vertical(
        &self,
        origin: Point,
        queries: &[TagQuery<'_>],
        length: i64,
    ) -> Result<bool, CanvasError> {
        let dir = if length < 0 { -1 } else { 1 };
        for step in 0..=length.abs() {
            let cur = Point::new(origin.x, origin.y + dir * step);
            let Some(stack) = self.cell_at(cur) else {
                if step == 0 {
                    return Err(CanvasError::OutOfBounds {
                        x: origin.x,
                        y: origin.y,
                    });
                }
                return Ok(false);
            };
            let tags = stack.tags();
            let hit = queries
                .iter()
                .any(|(key, pred)| tags.get(*key).is_some_and(|value| pred(value.as_str())));
            if hit {
                trace!("ray cast from ({}, {}) hit at ({}, {})", origin.x, origin.y, cur.x, cur.y);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Serialize the grid row by row; every row is newline-terminated and
    /// keeps its padding so the output stays rectangular. The priority filter
    /// never applies to stacks holding a label character.
    pub fn render(&self, priority: Option<&Tags>, cs: CharSet) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.rows.len());
        for row in &self.rows {
            out.extend(row.iter().map(|stack| {
                let filter = if stack.has_char() { None } else { priority };
                stack.compose(filter, cs)
            }));
            out.push('\n');
        }
        out
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
