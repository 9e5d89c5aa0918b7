//! Rendering options shared by the library, the CLI and the wasm binding.

use crate::renderers::charset::CharSet;

/// Configuration for the rendering pipeline.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Use Unicode box-drawing characters (true) or plain ASCII (false).
    pub unicode: bool,
    /// Horizontal indentation per level, in characters.
    pub indent: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            unicode: true,
            indent: 2,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charset(&self) -> CharSet {
        if self.unicode {
            CharSet::Unicode
        } else {
            CharSet::Ascii
        }
    }
}
