//! Board: owns blocks and connectors and composes them into text.
//!
//! Blocks are drawn first, then connectors in insertion order, so earlier
//! connectors shape the lanes later ones have to avoid.

pub mod block;
pub mod connector;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::error::BoardError;
use crate::renderers::{Canvas, CharSet, Point, Tags};

pub use block::Block;
pub use connector::Connector;

/// Tag key holding the kind of content a cell belongs to.
pub const CELL_TYPE: &str = "cellType";
/// A non-space character of a block label.
pub const BLOCK_CHAR: &str = "blockChar";
/// A space inside a block label.
pub const BLOCK_SPACE: &str = "blockSpace";
/// The arrow ending a connector.
pub const ARROW: &str = "arrow";

#[derive(Debug, Clone, Default)]
pub struct Board {
    width: usize,
    height: usize,
    charset: CharSet,
    blocks: IndexMap<String, Block>,
    connectors: IndexMap<(String, String), Connector>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_charset(mut self, charset: CharSet) -> Self {
        self.charset = charset;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.values()
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Place a label at `position`; the board grows to fit it.
    pub fn add_block(
        &mut self,
        id: &str,
        label: &str,
        position: Point,
        tags: Tags,
    ) -> Result<(), BoardError> {
        if self.blocks.contains_key(id) {
            return Err(BoardError::DuplicateBlock(id.to_string()));
        }
        let block = Block {
            id: id.to_string(),
            label: label.to_string(),
            position,
            tags,
        };
        let right = usize::try_from(position.x + block.width()).unwrap_or(0);
        let bottom = usize::try_from(position.y + 1).unwrap_or(0);
        self.width = self.width.max(right);
        self.height = self.height.max(bottom);
        self.blocks.insert(id.to_string(), block);
        Ok(())
    }

    /// Connect two existing blocks. Each ordered pair can be connected once.
    pub fn add_connector(&mut self, from: &str, to: &str, tags: Tags) -> Result<(), BoardError> {
        for id in [from, to] {
            if !self.blocks.contains_key(id) {
                return Err(BoardError::UnknownBlock(id.to_string()));
            }
        }
        let key = (from.to_string(), to.to_string());
        if self.connectors.contains_key(&key) {
            return Err(BoardError::DuplicateConnector {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.connectors.insert(
            key,
            Connector {
                from: from.to_string(),
                to: to.to_string(),
                tags,
            },
        );
        Ok(())
    }

    /// Draw every block and connector onto a fresh canvas.
    pub fn canvas(&self) -> Result<Canvas, BoardError> {
        let mut canvas = Canvas::new(self.width, self.height);
        debug!(
            "rendering {} blocks and {} connectors on a {}x{} canvas",
            self.blocks.len(),
            self.connectors.len(),
            self.width,
            self.height
        );

        for block in self.blocks.values() {
            block
                .render(&mut canvas)
                .map_err(|source| BoardError::Block {
                    id: block.id.clone(),
                    source,
                })?;
        }

        for connector in self.connectors.values() {
            let from = self.endpoint(&connector.from)?;
            let to = self.endpoint(&connector.to)?;
            if let Err(source) = connector.route(from, to, &mut canvas) {
                warn!(
                    "could not route connector {} -> {}: {}",
                    connector.from, connector.to, source
                );
                return Err(BoardError::Connector {
                    from: connector.from.clone(),
                    to: connector.to.clone(),
                    source,
                });
            }
        }
        Ok(canvas)
    }

    /// Render to text, one newline-terminated line per row.
    pub fn render(&self) -> Result<String, BoardError> {
        self.render_with_priority(None)
    }

    /// Render with a priority filter: in every cell, the layers matching all
    /// of `priority`'s tags are drawn alone when there are any.
    pub fn render_with_priority(&self, priority: Option<&Tags>) -> Result<String, BoardError> {
        Ok(self.canvas()?.render(priority, self.charset))
    }

    fn endpoint(&self, id: &str) -> Result<&Block, BoardError> {
        self.blocks
            .get(id)
            .ok_or_else(|| BoardError::UnknownBlock(id.to_string()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
