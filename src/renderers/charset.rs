//! Box-drawing glyph tables and line-junction arms.

// ─── CharSet ─────────────────────────────────────────────────────────────────

/// Which character set to use for box-drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    #[default]
    Unicode,
    Ascii,
}

/// Glyphs indexed by the 4-bit arms mask (`left=8, up=4, right=2, down=1`).
const UNICODE_LINES: [char; 16] = [
    ' ', '╷', '╶', '┌', '╵', '│', '└', '├', '╴', '┐', '─', '┬', '┘', '┤', '┴', '┼',
];

const ASCII_LINES: [char; 16] = [
    ' ', '|', '-', '+', '|', '|', '+', '+', '-', '+', '-', '+', '+', '+', '+', '+',
];

impl CharSet {
    /// Arrow glyph; `inverted` arrows point left.
    pub fn arrow(self, inverted: bool) -> char {
        match (self, inverted) {
            (CharSet::Unicode, false) => '▷',
            (CharSet::Unicode, true) => '◁',
            (CharSet::Ascii, false) => '>',
            (CharSet::Ascii, true) => '<',
        }
    }

    fn lines(self) -> &'static [char; 16] {
        match self {
            CharSet::Unicode => &UNICODE_LINES,
            CharSet::Ascii => &ASCII_LINES,
        }
    }
}

// ─── Arms ────────────────────────────────────────────────────────────────────

/// Which arms of a junction cell are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Arms {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Arms {
    pub const LEFT: u8 = 0b1000;
    pub const UP: u8 = 0b0100;
    pub const RIGHT: u8 = 0b0010;
    pub const DOWN: u8 = 0b0001;

    pub fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    pub fn vertical() -> Self {
        Self::new(true, true, false, false)
    }

    pub fn horizontal() -> Self {
        Self::new(false, false, true, true)
    }

    pub fn mask(self) -> u8 {
        let mut mask = 0;
        if self.left {
            mask |= Self::LEFT;
        }
        if self.up {
            mask |= Self::UP;
        }
        if self.right {
            mask |= Self::RIGHT;
        }
        if self.down {
            mask |= Self::DOWN;
        }
        mask
    }

    pub fn from_mask(mask: u8) -> Self {
        Self {
            up: mask & Self::UP != 0,
            down: mask & Self::DOWN != 0,
            left: mask & Self::LEFT != 0,
            right: mask & Self::RIGHT != 0,
        }
    }

    /// Merge two Arms by OR-ing each direction.
    pub fn merge(self, other: Self) -> Self {
        Self::from_mask(self.mask() | other.mask())
    }

    /// A straight line perpendicular to `other`, both being pure
    /// vertical/horizontal strokes.
    pub fn crosses(self, other: Self) -> bool {
        let (a, b) = (self.mask(), other.mask());
        (a == 0b0101 && b == 0b1010) || (a == 0b1010 && b == 0b0101)
    }

    pub fn to_char(self, cs: CharSet) -> char {
        cs.lines()[self.mask() as usize]
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
