//! Connector routing.
//!
//! A connector leaves its source label vertically, sidesteps right until a
//! vertical lane to the target row is free of labels and arrows, drops (or
//! climbs) to that row, then runs horizontally up to the target label and
//! ends in an arrow.

use log::{debug, trace};

use super::block::Block;
use super::{ARROW, BLOCK_CHAR, BLOCK_SPACE, CELL_TYPE};
use crate::error::RouteError;
use crate::renderers::{Canvas, Cell, CellKind, LineTracer, Point, TagQuery, Tags};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub from: String,
    pub to: String,
    pub tags: Tags,
}

fn is_obstacle(value: &str) -> bool {
    value == BLOCK_CHAR || value == ARROW
}

fn unreachable(p: Point) -> RouteError {
    RouteError::UnreachablePosition { x: p.x, y: p.y }
}

impl Connector {
    pub fn route(&self, from: &Block, to: &Block, canvas: &mut Canvas) -> Result<(), RouteError> {
        let reverse_y = to.position.y < from.position.y;

        // 1. Leave the label from its last char going up, its first char going down.
        let offset = if reverse_y {
            from.last_char_offset()
        } else {
            from.first_char_offset()
        };
        let start = Point::new(from.position.x + offset, from.position.y);
        let mut tracer = LineTracer::new(start).with_tags(&self.tags);

        // 2. One vertical step out of the label.
        let mut cur = tracer.move_vertical(reverse_y);
        if canvas.cell_at(cur).is_none_or(|stack| stack.has_char()) {
            return Err(RouteError::NoSpaceForFirstStep { x: cur.x, y: cur.y });
        }

        // 3. Sidestep right until the vertical lane is clear.
        let queries: [TagQuery; 1] = [(CELL_TYPE, &is_obstacle)];
        let length = to.position.y - from.position.y;
        while canvas.ray_cast_vertical(cur, &queries, length)? {
            cur = tracer.move_horizontal(false);
            trace!("{} -> {}: sidestep to ({}, {})", self.from, self.to, cur.x, cur.y);
            if canvas.cell_at(cur).is_none() {
                canvas.expand_right(1);
            }
            if canvas.cell_at(cur).is_none() {
                return Err(unreachable(cur));
            }
        }

        // 4. Vertically until aligned with the target row.
        let height = canvas.height() as i64;
        while cur.y != to.position.y {
            let next = cur.y + if reverse_y { -1 } else { 1 };
            if next < 0 || next >= height {
                break;
            }
            cur = tracer.move_vertical(reverse_y);
        }

        // 5. Horizontally towards the label, stopping next to any block cell.
        let text_start = to.position.x + to.first_char_offset();
        let text_end = to.position.x + to.last_char_offset();
        let from_right = cur.x > text_end;
        let goal = if from_right {
            text_end + 1
        } else {
            text_start - 1
        };
        while (from_right && cur.x > goal) || (!from_right && cur.x < goal) {
            let next = Point::new(cur.x + if from_right { -1 } else { 1 }, cur.y);
            let occupied = canvas
                .cell_at(next)
                .is_none_or(|stack| stack.is(CELL_TYPE, BLOCK_CHAR) || stack.is(CELL_TYPE, BLOCK_SPACE));
            if occupied {
                break;
            }
            cur = tracer.move_horizontal(from_right);
        }

        // 6. Commit the line and cap it with an arrow.
        tracer.commit(canvas)?;
        let stack = canvas.cell_at_mut(cur).ok_or(unreachable(cur))?;
        stack
            .push(Cell::new(CellKind::Arrow { inverted: from_right }).with_tags(&self.tags))
            .tag(CELL_TYPE, ARROW);
        debug!(
            "routed {} -> {} in {} steps",
            self.from,
            self.to,
            tracer.points().len() - 1
        );
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
