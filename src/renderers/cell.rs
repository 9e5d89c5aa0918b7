//! Cells, cell stacks and glyph compositing.
//!
//! Every canvas position holds a stack of cells drawn on top of each other.
//! A character or an arrow always wins over lines; line fragments are merged
//! into one junction glyph unless a straight line crosses a perpendicular
//! straight line, in which case the later line is drawn on its own.

use indexmap::IndexMap;

use super::charset::{Arms, CharSet};

/// String tags attached to cells; used for collision queries and for
/// highlighting selected nodes and connectors.
pub type Tags = IndexMap<String, String>;

// ─── Cell ────────────────────────────────────────────────────────────────────

/// One line fragment. `crossed` marks a fragment that resets the junction
/// accumulated so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lines {
    pub arms: Arms,
    pub crossed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Char(char),
    Arrow { inverted: bool },
    Lines(Lines),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub tags: Tags,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Self {
            kind,
            tags: Tags::new(),
        }
    }

    pub fn lines(arms: Arms) -> Self {
        Self::new(CellKind::Lines(Lines {
            arms,
            crossed: false,
        }))
    }

    pub fn with_tags(mut self, tags: &Tags) -> Self {
        self.tags
            .extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn tag(&mut self, key: &str, value: &str) -> &mut Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is(&self, key: &str, value: &str) -> bool {
        self.tags.get(key).is_some_and(|v| v == value)
    }

    /// True when every `(key, value)` of `filter` is present on this cell.
    pub fn matches(&self, filter: &Tags) -> bool {
        filter.iter().all(|(k, v)| self.is(k, v))
    }
}

// ─── CellStack ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStack {
    cells: Vec<Cell>,
}

impl CellStack {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Push a cell on top. A line fragment drawn straight across a
    /// perpendicular straight fragment is flagged as crossed.
    pub fn push(&mut self, mut cell: Cell) -> &mut Cell {
        if let CellKind::Lines(lines) = &mut cell.kind {
            let previous = self.cells.iter().rev().find_map(|c| match &c.kind {
                CellKind::Lines(prev) => Some(prev.arms),
                _ => None,
            });
            if previous.is_some_and(|prev| prev.crosses(lines.arms)) {
                lines.crossed = true;
            }
        }
        self.cells.push(cell);
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }

    pub fn place_char(&mut self, c: char) -> &mut Cell {
        self.push(Cell::new(CellKind::Char(c)))
    }

    pub fn place_arrow(&mut self, inverted: bool) -> &mut Cell {
        self.push(Cell::new(CellKind::Arrow { inverted }))
    }

    pub fn place_empty(&mut self) -> &mut Cell {
        self.push(Cell::new(CellKind::Empty))
    }

    pub fn place_lines(&mut self, arms: Arms) -> &mut Cell {
        self.push(Cell::lines(arms))
    }

    /// Tags of every cell merged bottom to top; later cells win on conflicts.
    pub fn tags(&self) -> Tags {
        let mut merged = Tags::new();
        for cell in &self.cells {
            merged.extend(cell.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    pub fn is(&self, key: &str, value: &str) -> bool {
        self.cells.iter().any(|c| c.is(key, value))
    }

    pub fn has_char(&self) -> bool {
        self.cells
            .iter()
            .any(|c| matches!(c.kind, CellKind::Char(_)))
    }

    /// Compose the stack into one glyph. With a non-empty `priority` filter,
    /// only the cells matching it are drawn, unless none does.
    pub fn compose(&self, priority: Option<&Tags>, cs: CharSet) -> char {
        let prioritized: Vec<&Cell> = match priority {
            Some(filter) if !filter.is_empty() => {
                self.cells.iter().filter(|c| c.matches(filter)).collect()
            }
            _ => Vec::new(),
        };
        let visible: Vec<&Cell> = if prioritized.is_empty() {
            self.cells.iter().collect()
        } else {
            prioritized
        };

        let mut acc = Arms::default();
        for cell in visible {
            match &cell.kind {
                CellKind::Empty => {}
                CellKind::Char(c) => return *c,
                CellKind::Arrow { inverted } => return cs.arrow(*inverted),
                CellKind::Lines(lines) if lines.crossed => acc = lines.arms,
                CellKind::Lines(lines) => acc = acc.merge(lines.arms),
            }
        }
        acc.to_char(cs)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
