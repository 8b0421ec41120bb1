use serde::{Deserialize, Serialize};

use super::node::{Block, Node, char_slice};
use super::position::{Ancestor, RangeError, ResolvedPos};

/// Ordered forest of block nodes addressed by integer positions.
///
/// Every node occupies the half-open range `[start, start + size)`. A block's
/// size is its content plus two boundary tokens, a text run's size is its
/// char count, and the document's size is the sum of its top-level blocks.
///
/// `resolve` and `nodes_between` are the only traversal primitives; every
/// other component (annotations, sections, lists, emphasis) is built on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub(crate) children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn size(&self) -> usize {
        self.children.iter().map(Node::size).sum()
    }

    /// Clamp a computed target into `[0, size]`
    pub fn clamp(&self, pos: usize) -> usize {
        pos.min(self.size())
    }

    pub fn check_pos(&self, pos: usize) -> Result<(), RangeError> {
        let size = self.size();
        if pos > size {
            return Err(RangeError::OutOfRange { pos, size });
        }
        Ok(())
    }

    pub fn check_range(&self, from: usize, to: usize) -> Result<(), RangeError> {
        if from > to {
            return Err(RangeError::Inverted { from, to });
        }
        self.check_pos(to)
    }

    /// Resolve a position into its ancestor chain and local offset
    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos<'_>, RangeError> {
        let doc_size = self.size();
        if pos > doc_size {
            return Err(RangeError::OutOfRange {
                pos,
                size: doc_size,
            });
        }

        let mut ancestors = Vec::new();
        let mut children: &[Node] = &self.children;
        let mut content_start = 0;

        'descend: loop {
            let mut cursor = content_start;
            for (index, node) in children.iter().enumerate() {
                let end = cursor + node.size();
                if let Node::Block(block) = node
                    && cursor < pos
                    && pos < end
                {
                    ancestors.push(Ancestor {
                        block,
                        start: cursor,
                        index,
                        depth: ancestors.len() + 1,
                    });
                    children = &block.children;
                    content_start = cursor + 1;
                    continue 'descend;
                }
                if end > pos {
                    break;
                }
                cursor = end;
            }
            break;
        }

        Ok(ResolvedPos {
            pos,
            ancestors,
            parent_offset: pos - content_start,
            doc_size,
        })
    }

    /// Depth-first, parent-before-children traversal of every node
    /// intersecting `[from, to)`.
    ///
    /// The visitor receives the node, its start position, its parent block
    /// (`None` at top level) and its depth (top-level blocks have depth 1).
    /// Returning `false` prunes the node's subtree.
    pub fn nodes_between<F>(&self, from: usize, to: usize, mut visit: F)
    where
        F: FnMut(&Node, usize, Option<&Block>, usize) -> bool,
    {
        walk(&self.children, 0, from, to, None, 1, &mut visit);
    }

    /// Traverse the whole document
    pub fn descendants<F>(&self, visit: F)
    where
        F: FnMut(&Node, usize, Option<&Block>, usize) -> bool,
    {
        self.nodes_between(0, self.size(), visit)
    }

    /// Text between two positions, with a newline between textblocks
    pub fn text_between(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        let mut block_break = false;
        self.nodes_between(from, to, |node, pos, _, _| match node {
            Node::Block(block) => {
                if block.kind.is_textblock() && !out.is_empty() {
                    block_break = true;
                }
                true
            }
            Node::Text(run) => {
                let start = from.max(pos) - pos;
                let end = to.min(pos + run.len()) - pos;
                if block_break {
                    out.push('\n');
                    block_break = false;
                }
                out.push_str(&char_slice(&run.text, start, end));
                false
            }
        });
        out
    }

    pub fn text_content(&self) -> String {
        self.text_between(0, self.size())
    }

    /// The block whose open token sits at `pos`
    pub fn block_at(&self, pos: usize) -> Option<&Block> {
        find_block(&self.children, 0, pos)
    }

    pub(crate) fn block_at_mut(&mut self, pos: usize) -> Option<&mut Block> {
        find_block_mut(&mut self.children, 0, pos)
    }

    /// Mutable access to the child list reached by following child indices
    /// from the document root (an empty path is the document's own children)
    pub(crate) fn siblings_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut children = &mut self.children;
        for &index in path {
            match children.get_mut(index) {
                Some(Node::Block(block)) => children = &mut block.children,
                _ => return None,
            }
        }
        Some(children)
    }
}

fn walk<F>(
    nodes: &[Node],
    start: usize,
    from: usize,
    to: usize,
    parent: Option<&Block>,
    depth: usize,
    visit: &mut F,
) where
    F: FnMut(&Node, usize, Option<&Block>, usize) -> bool,
{
    let mut pos = start;
    for node in nodes {
        if pos >= to {
            break;
        }
        let end = pos + node.size();
        if end > from
            && visit(node, pos, parent, depth)
            && let Node::Block(block) = node
        {
            walk(
                &block.children,
                pos + 1,
                from,
                to,
                Some(block),
                depth + 1,
                visit,
            );
        }
        pos = end;
    }
}

fn find_block(nodes: &[Node], start: usize, target: usize) -> Option<&Block> {
    let mut pos = start;
    for node in nodes {
        let end = pos + node.size();
        if let Node::Block(block) = node {
            if pos == target {
                return Some(block);
            }
            if pos < target && target < end {
                return find_block(&block.children, pos + 1, target);
            }
        }
        if pos > target {
            break;
        }
        pos = end;
    }
    None
}

fn find_block_mut(nodes: &mut [Node], start: usize, target: usize) -> Option<&mut Block> {
    let mut pos = start;
    for node in nodes.iter_mut() {
        let end = pos + node.size();
        if let Node::Block(block) = node {
            if pos == target {
                return Some(block);
            }
            if pos < target && target < end {
                return find_block_mut(&mut block.children, pos + 1, target);
            }
        }
        if pos > target {
            break;
        }
        pos = end;
    }
    None
}
