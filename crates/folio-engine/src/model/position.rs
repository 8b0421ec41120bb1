use thiserror::Error;

use super::node::{Block, BlockKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("position {pos} is outside the document (size {size})")]
    OutOfRange { pos: usize, size: usize },
    #[error("range {from}..{to} is inverted")]
    Inverted { from: usize, to: usize },
}

/// A block enclosing a resolved position
#[derive(Debug, Clone, Copy)]
pub struct Ancestor<'a> {
    pub block: &'a Block,
    /// Position of the block's open token
    pub start: usize,
    /// Index of the block within its parent
    pub index: usize,
    /// Depth of the block (top-level blocks have depth 1)
    pub depth: usize,
}

impl Ancestor<'_> {
    pub fn end(&self) -> usize {
        self.start + self.block.size()
    }

    /// First position inside the block
    pub fn content_start(&self) -> usize {
        self.start + 1
    }
}

/// A position together with the chain of blocks containing it
#[derive(Debug, Clone)]
pub struct ResolvedPos<'a> {
    pub pos: usize,
    /// Outermost first
    pub ancestors: Vec<Ancestor<'a>>,
    /// Offset of `pos` within the innermost ancestor's content
    /// (or within the document when there is no ancestor)
    pub parent_offset: usize,
    pub(crate) doc_size: usize,
}

impl<'a> ResolvedPos<'a> {
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Innermost enclosing block, `None` at document level
    pub fn parent(&self) -> Option<&Ancestor<'a>> {
        self.ancestors.last()
    }

    /// Range of the innermost containing node; the whole document when the
    /// position sits between top-level blocks
    pub fn innermost_range(&self) -> std::ops::Range<usize> {
        match self.parent() {
            Some(ancestor) => ancestor.start..ancestor.end(),
            None => 0..self.doc_size,
        }
    }

    /// Nearest enclosing block matching `predicate`, innermost first
    pub fn nearest(&self, predicate: impl Fn(BlockKind) -> bool) -> Option<&Ancestor<'a>> {
        self.ancestors
            .iter()
            .rev()
            .find(|ancestor| predicate(ancestor.block.kind))
    }

    /// The innermost textblock, if the position is inside one
    pub fn textblock(&self) -> Option<&Ancestor<'a>> {
        self.parent()
            .filter(|ancestor| ancestor.block.kind.is_textblock())
    }
}
