//! # Sections
//!
//! Sections are the regions opened by `SectionDivider` sentinels. A section
//! runs from its divider's start to the next divider's start (or the document
//! end). Content before the first divider belongs to no section.
//!
//! The `toc` section is protected. Deletions that touch it are planned here
//! instead of being left to the default deletion:
//!
//! - the requested range is split around the protected span
//! - dividers are never deleted
//! - paragraphs and sub-headings only lose the part of their content in range
//! - level-1 headings and every other node touching a sub-range are deleted
//!   whole, unless they hold a divider
//! - deletions are applied in descending start order

use std::ops::Range;

use crate::model::{Block, BlockKind, Document, Node, RangeError, SectionType, Selection};
use crate::transform::{Bias, Step, Transaction};

/// A divider-delimited region of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub section_type: SectionType,
    /// Position of the divider opening this section
    pub start: usize,
    /// Start of the next divider, or the document end
    pub end: usize,
}

impl Section {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Every section in document order
pub fn sections(doc: &Document) -> Vec<Section> {
    let mut dividers = Vec::new();
    doc.descendants(|node, pos, _, _| match node {
        Node::Block(Block {
            kind: BlockKind::SectionDivider { section_type },
            ..
        }) => {
            dividers.push((*section_type, pos));
            false
        }
        Node::Block(block) => !block.kind.is_textblock(),
        Node::Text(_) => false,
    });

    let size = doc.size();
    dividers
        .iter()
        .enumerate()
        .map(|(index, &(section_type, start))| Section {
            section_type,
            start,
            end: dividers.get(index + 1).map_or(size, |&(_, next)| next),
        })
        .collect()
}

/// The section containing `pos`, if any
pub fn section_at(doc: &Document, pos: usize) -> Option<Section> {
    let size = doc.size();
    sections(doc)
        .into_iter()
        .find(|section| section.range().contains(&pos) || (pos == size && section.end == size))
}

/// Span of the first protected (`toc`) section
pub fn protected_range(doc: &Document) -> Option<Range<usize>> {
    sections(doc)
        .into_iter()
        .find(|section| section.section_type.is_protected())
        .map(|section| section.range())
}

/// Deletions and cursor placement for a range that touches the protected section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    /// Ranges to delete, highest start first
    pub ranges: Vec<Range<usize>>,
    /// Cursor target in pre-deletion coordinates
    pub cursor: usize,
}

impl DeletionPlan {
    /// One transaction applying every queued deletion and placing the cursor
    /// (mapped through the deletions and clamped to the new size)
    pub fn into_transaction(self, doc_size: usize) -> Transaction {
        let deleted: usize = self.ranges.iter().map(|range| range.len()).sum();
        let mut tx = Transaction::new().with_label("delete");
        for range in &self.ranges {
            tx.push(Step::Delete {
                from: range.start,
                to: range.end,
            });
        }
        let cursor = tx
            .mapping()
            .map(self.cursor, Bias::Before)
            .min(doc_size.saturating_sub(deleted));
        tx.with_selection(Selection::cursor(cursor))
    }
}

/// Plan a deletion of `[from, to)`.
///
/// Returns `Ok(None)` when the range does not intersect the protected section
/// (an empty range never does), in which case the caller performs its default
/// deletion. A plan is returned whenever the protected section is touched, even
/// if it deletes nothing.
pub fn plan_protected_deletion(
    doc: &Document,
    from: usize,
    to: usize,
) -> Result<Option<DeletionPlan>, RangeError> {
    doc.check_range(from, to)?;

    let Some(protected) = protected_range(doc) else {
        log::debug!("No protected section; deletion {from}..{to} left to the default handler");
        return Ok(None);
    };
    let (ps, pe) = (protected.start, protected.end);

    // Half-open ranges: an empty range intersects nothing
    if from == to || from >= pe || to <= ps {
        return Ok(None);
    }

    let mut ranges = Vec::new();
    let before = from..to.min(ps);
    let after = from.max(pe)..to;
    for sub_range in [before, after] {
        if !sub_range.is_empty() {
            queue_deletions(doc, sub_range, &mut ranges);
        }
    }
    ranges.sort_by(|a, b| b.start.cmp(&a.start));

    let engulfed = from <= ps && to >= pe;
    let cursor = if engulfed {
        pe
    } else if from < ps {
        ps
    } else {
        pe
    };

    log::debug!(
        "Protected deletion {from}..{to} around {ps}..{pe}: {} range(s), cursor {cursor}",
        ranges.len()
    );
    Ok(Some(DeletionPlan { ranges, cursor }))
}

fn queue_deletions(doc: &Document, sub_range: Range<usize>, queue: &mut Vec<Range<usize>>) {
    let Range { start: from, end: to } = sub_range;
    doc.nodes_between(from, to, |node, pos, _, _| {
        let Node::Block(block) = node else {
            return false;
        };
        let end = pos + block.size();
        match block.kind {
            BlockKind::SectionDivider { .. } => false,
            BlockKind::Paragraph => {
                queue_content(pos, end, from, to, queue);
                false
            }
            BlockKind::Heading { level } if level != 1 => {
                queue_content(pos, end, from, to, queue);
                false
            }
            BlockKind::Heading { .. } => {
                queue.push(pos..end);
                false
            }
            // Dividers must survive, so their containers are walked instead
            _ if contains_divider(block) => true,
            _ => {
                queue.push(pos..end);
                false
            }
        }
    });
}

fn queue_content(pos: usize, end: usize, from: usize, to: usize, queue: &mut Vec<Range<usize>>) {
    let content = from.max(pos + 1)..to.min(end - 1);
    if !content.is_empty() {
        queue.push(content);
    }
}

fn contains_divider(block: &Block) -> bool {
    block.children.iter().any(|child| match child {
        Node::Block(inner) => {
            matches!(inner.kind, BlockKind::SectionDivider { .. }) || contains_divider(inner)
        }
        Node::Text(_) => false,
    })
}
