//! Parsed configuration blocks.
//!
//! Textual parsing belongs to the input collaborator; it hands the engine
//! an [`InputTree`] of blocks addressed by slash-separated paths such as
//! `Kernels/diffusion`.

use anvil_core::Params;

use crate::error::EngineError;

/// One configuration block.
#[derive(Clone, Debug, PartialEq)]
pub struct InputBlock {
    /// Slash-separated path, e.g. `BCs/left`.
    pub path: String,
    /// Options set in the block.
    pub params: Params,
}

impl InputBlock {
    /// Last path segment: the user-facing object name.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Configuration blocks in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputTree {
    blocks: Vec<InputBlock>,
}

impl InputTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block. Paths must be unique and non-empty.
    pub fn add(&mut self, path: impl Into<String>, params: Params) -> Result<(), EngineError> {
        let path: String = path.into();
        let path = path.trim_matches('/').to_string();
        if path.is_empty() || path.split('/').any(str::is_empty) {
            return Err(EngineError::MalformedPath { path });
        }
        if self.get(&path).is_some() {
            return Err(EngineError::DuplicateBlock { path });
        }
        self.blocks.push(InputBlock { path, params });
        Ok(())
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, path: impl Into<String>, params: Params) -> Result<Self, EngineError> {
        self.add(path, params)?;
        Ok(self)
    }

    /// Block at `path`.
    pub fn get(&self, path: &str) -> Option<&InputBlock> {
        self.blocks.iter().find(|b| b.path == path)
    }

    /// Blocks in input order.
    pub fn blocks(&self) -> &[InputBlock] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
