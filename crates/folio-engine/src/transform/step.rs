use thiserror::Error;

use crate::model::mark::{add_to_set, remove_from_set};
use crate::model::{Attrs, BlockKind, Document, Mark, Node, RangeError};
use crate::sections;

use super::mapping::StepMap;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("range {from}..{to} covers neither whole sibling nodes nor a single textblock")]
    Unaligned { from: usize, to: usize },

    #[error("no block starts at position {0}")]
    NoBlockAt(usize),

    #[error("node at {pos} is not {expected}")]
    UnexpectedNode { pos: usize, expected: &'static str },

    #[error("text can only be inserted inside a textblock (position {0})")]
    NotInTextblock(usize),

    #[error("list numbering must start at 1 or above, got {0}")]
    InvalidListStart(u32),
}

/// A single structural edit
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Delete a range inside one textblock, or a run of whole sibling nodes
    Delete { from: usize, to: usize },
    InsertText {
        at: usize,
        text: String,
        marks: Vec<Mark>,
    },
    /// Add a mark to every run in range, replacing the mark in the same slot.
    /// Runs inside a protected section are skipped.
    AddMark { from: usize, to: usize, mark: Mark },
    /// Remove the mark occupying `mark`'s slot (kind + instance id) in range
    RemoveMark { from: usize, to: usize, mark: Mark },
    SetNodeAttrs { pos: usize, attrs: Attrs },
    SetListStart { pos: usize, start: u32 },
}

enum DeleteTarget {
    Inline {
        block_pos: usize,
        from: usize,
        to: usize,
    },
    Siblings {
        path: Vec<usize>,
        indices: std::ops::Range<usize>,
    },
}

impl Step {
    /// Position map of this step; depends only on the step itself
    pub fn map(&self) -> StepMap {
        match self {
            Step::Delete { from, to } => StepMap::deletion(*from, *to),
            Step::InsertText { at, text, .. } => StepMap::insertion(*at, text.chars().count()),
            Step::AddMark { .. }
            | Step::RemoveMark { .. }
            | Step::SetNodeAttrs { .. }
            | Step::SetListStart { .. } => StepMap::IDENTITY,
        }
    }

    /// Range touched by this step, in post-step coordinates
    pub(crate) fn changed_range(&self) -> std::ops::Range<usize> {
        match self {
            Step::Delete { from, .. } => *from..*from,
            Step::InsertText { at, text, .. } => *at..*at + text.chars().count(),
            Step::AddMark { from, to, .. } | Step::RemoveMark { from, to, .. } => *from..*to,
            Step::SetNodeAttrs { pos, .. } | Step::SetListStart { pos, .. } => *pos..*pos,
        }
    }

    pub(crate) fn apply(&self, doc: &mut Document) -> Result<(), StepError> {
        match self {
            Step::Delete { from, to } => apply_delete(doc, *from, *to),
            Step::InsertText { at, text, marks } => apply_insert(doc, *at, text, marks),
            Step::AddMark { from, to, mark } => {
                let protected = sections::protected_range(doc);
                let markable = |block_pos: usize| {
                    protected
                        .as_ref()
                        .is_none_or(|range| !range.contains(&block_pos))
                };
                update_marks_between(doc, *from, *to, markable, |marks| {
                    add_to_set(marks, mark)
                })
            }
            Step::RemoveMark { from, to, mark } => {
                update_marks_between(doc, *from, *to, |_| true, |marks| {
                    remove_from_set(marks, mark);
                })
            }
            Step::SetNodeAttrs { pos, attrs } => {
                let block = doc.block_at_mut(*pos).ok_or(StepError::NoBlockAt(*pos))?;
                block.attrs = attrs.clone();
                Ok(())
            }
            Step::SetListStart { pos, start } => {
                if *start < 1 {
                    return Err(StepError::InvalidListStart(*start));
                }
                let block = doc.block_at_mut(*pos).ok_or(StepError::NoBlockAt(*pos))?;
                match block.kind {
                    BlockKind::OrderedList { list_type, .. } => {
                        block.kind = BlockKind::OrderedList {
                            list_type,
                            start: *start,
                        };
                        Ok(())
                    }
                    _ => Err(StepError::UnexpectedNode {
                        pos: *pos,
                        expected: "an ordered list",
                    }),
                }
            }
        }
    }
}

fn apply_delete(doc: &mut Document, from: usize, to: usize) -> Result<(), StepError> {
    doc.check_range(from, to)?;
    if from == to {
        return Ok(());
    }

    let target = {
        let start = doc.resolve(from)?;
        let end = doc.resolve(to)?;
        let same_parent = match (start.parent(), end.parent()) {
            (Some(a), Some(b)) => a.start == b.start && a.depth == b.depth,
            (None, None) => true,
            _ => false,
        };
        if !same_parent {
            return Err(StepError::Unaligned { from, to });
        }

        match start.parent() {
            Some(parent) if parent.block.kind.is_textblock() => DeleteTarget::Inline {
                block_pos: parent.start,
                from: from - parent.content_start(),
                to: to - parent.content_start(),
            },
            Some(parent) if parent.block.kind.is_leaf() => {
                return Err(StepError::Unaligned { from, to });
            }
            parent => {
                let (children, content_start) = match parent {
                    Some(ancestor) => (ancestor.block.children.as_slice(), ancestor.content_start()),
                    None => (doc.children(), 0),
                };
                let mut pos = content_start;
                let mut first = None;
                let mut last = None;
                for (index, child) in children.iter().enumerate() {
                    let end = pos + child.size();
                    if pos >= from && end <= to {
                        first.get_or_insert(index);
                        last = Some(index + 1);
                    }
                    pos = end;
                }
                match (first, last) {
                    (Some(first), Some(last)) => DeleteTarget::Siblings {
                        path: start.ancestors.iter().map(|a| a.index).collect(),
                        indices: first..last,
                    },
                    _ => return Err(StepError::Unaligned { from, to }),
                }
            }
        }
    };

    match target {
        DeleteTarget::Inline {
            block_pos,
            from,
            to,
        } => {
            let block = doc
                .block_at_mut(block_pos)
                .ok_or(StepError::NoBlockAt(block_pos))?;
            block.delete_inline(from, to);
        }
        DeleteTarget::Siblings { path, indices } => {
            let siblings = doc
                .siblings_mut(&path)
                .ok_or(StepError::Unaligned { from, to })?;
            siblings.drain(indices);
        }
    }
    Ok(())
}

fn apply_insert(doc: &mut Document, at: usize, text: &str, marks: &[Mark]) -> Result<(), StepError> {
    let (block_pos, offset) = {
        let resolved = doc.resolve(at)?;
        let textblock = resolved.textblock().ok_or(StepError::NotInTextblock(at))?;
        (textblock.start, resolved.parent_offset)
    };
    if text.is_empty() {
        return Ok(());
    }
    let block = doc
        .block_at_mut(block_pos)
        .ok_or(StepError::NoBlockAt(block_pos))?;
    block.insert_inline(offset, text, marks);
    Ok(())
}

/// Run `update` over the mark sets of every run in `[from, to)`, one
/// textblock at a time, skipping textblocks rejected by `include`.
fn update_marks_between(
    doc: &mut Document,
    from: usize,
    to: usize,
    include: impl Fn(usize) -> bool,
    mut update: impl FnMut(&mut Vec<Mark>),
) -> Result<(), StepError> {
    doc.check_range(from, to)?;

    let mut textblocks = Vec::new();
    doc.nodes_between(from, to, |node, pos, _, _| match node {
        Node::Block(block) if block.kind.is_textblock() => {
            if include(pos) {
                textblocks.push((pos, pos + block.size()));
            }
            false
        }
        Node::Block(_) => true,
        Node::Text(_) => false,
    });

    for (start, end) in textblocks {
        let content_start = start + 1;
        let local_from = from.max(content_start) - content_start;
        let local_to = to.min(end - 1).max(content_start) - content_start;
        if let Some(block) = doc.block_at_mut(start) {
            block.update_marks(local_from, local_to, &mut update);
        }
    }
    Ok(())
}
