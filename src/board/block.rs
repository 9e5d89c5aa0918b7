//! Block: a node label placed on the board.

use super::{BLOCK_CHAR, BLOCK_SPACE, CELL_TYPE};
use crate::error::RouteError;
use crate::renderers::{Canvas, Cell, CellKind, Point, Tags};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: String,
    pub label: String,
    pub position: Point,
    pub tags: Tags,
}

impl Block {
    /// Label width in characters.
    pub fn width(&self) -> i64 {
        self.label.chars().count() as i64
    }

    /// Offset of the first non-space character, 0 for a blank label.
    pub fn first_char_offset(&self) -> i64 {
        self.label
            .chars()
            .position(|c| c != ' ')
            .unwrap_or(0) as i64
    }

    /// Offset of the last non-space character, 0 for a blank label.
    pub fn last_char_offset(&self) -> i64 {
        self.label
            .chars()
            .enumerate()
            .filter(|(_, c)| *c != ' ')
            .map(|(i, _)| i)
            .last()
            .unwrap_or(0) as i64
    }

    /// Draw the label. Spaces become empty cells tagged as block space, so
    /// routing can tell a blank inside a label from free canvas.
    pub fn render(&self, canvas: &mut Canvas) -> Result<(), RouteError> {
        for (i, c) in self.label.chars().enumerate() {
            let p = Point::new(self.position.x + i as i64, self.position.y);
            let stack = canvas
                .cell_at_mut(p)
                .ok_or(RouteError::UnreachablePosition { x: p.x, y: p.y })?;
            let (kind, cell_type) = if c == ' ' {
                (CellKind::Empty, BLOCK_SPACE)
            } else {
                (CellKind::Char(c), BLOCK_CHAR)
            };
            stack
                .push(Cell::new(kind).with_tags(&self.tags))
                .tag(CELL_TYPE, cell_type);
        }
        Ok(())
    }
}
