//! Text rendering primitives: glyph tables, cell stacks, the canvas grid and
//! the line tracer used by connector routing.

pub mod canvas;
pub mod cell;
pub mod charset;
pub mod tracer;

pub use canvas::{Canvas, Point, TagQuery};
pub use cell::{Cell, CellKind, CellStack, Lines, Tags};
pub use charset::{Arms, CharSet};
pub use tracer::LineTracer;
