//! LineTracer: records an orthogonal path one step at a time and commits it
//! to a canvas as line fragments.

use super::canvas::{Canvas, Point};
use super::cell::{Cell, Tags};
use super::charset::Arms;
use crate::error::RouteError;

#[derive(Debug, Clone)]
pub struct LineTracer {
    points: Vec<Point>,
    tags: Tags,
}

impl LineTracer {
    pub fn new(start: Point) -> Self {
        Self {
            points: vec![start],
            tags: Tags::new(),
        }
    }

    pub fn with_tags(mut self, tags: &Tags) -> Self {
        self.tags
            .extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn current(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Step one row down, or up when `reverse`.
    pub fn move_vertical(&mut self, reverse: bool) -> Point {
        let mut next = self.current();
        next.y += if reverse { -1 } else { 1 };
        self.points.push(next);
        next
    }

    /// Step one column right, or left when `reverse`.
    pub fn move_horizontal(&mut self, reverse: bool) -> Point {
        let mut next = self.current();
        next.x += if reverse { -1 } else { 1 };
        self.points.push(next);
        next
    }

    /// Arms for every traced point: the direction it leaves towards and the
    /// direction it was entered from.
    fn fragments(&self) -> Vec<Arms> {
        let mut arms = vec![Arms::default(); self.points.len()];
        for i in 1..self.points.len() {
            let dx = self.points[i].x - self.points[i - 1].x;
            let dy = self.points[i].y - self.points[i - 1].y;
            let out = &mut arms[i - 1];
            out.right |= dx > 0;
            out.left |= dx < 0;
            out.down |= dy > 0;
            out.up |= dy < 0;
            let inc = &mut arms[i];
            inc.left |= dx > 0;
            inc.right |= dx < 0;
            inc.up |= dy > 0;
            inc.down |= dy < 0;
        }
        arms
    }

    /// Push one tagged line fragment per traced point. A lone start point
    /// draws nothing. The canvas is left untouched when any point is off it.
    pub fn commit(&self, canvas: &mut Canvas) -> Result<(), RouteError> {
        if self.points.len() < 2 {
            return Ok(());
        }
        if let Some(point) = self.points.iter().find(|p| canvas.cell_at(**p).is_none()) {
            return Err(RouteError::UnreachablePosition {
                x: point.x,
                y: point.y,
            });
        }
        for (point, arms) in self.points.iter().zip(self.fragments()) {
            if let Some(stack) = canvas.cell_at_mut(*point) {
                stack.push(Cell::lines(arms).with_tags(&self.tags));
            }
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
