//! # Ordered List Numbering
//!
//! "Continue numbering" semantics: a list continues the last preceding ordered
//! list with the same nesting depth and the same list type. The suggested start
//! is that list's configured `start` plus its number of immediate items. The
//! numerals it actually rendered are irrelevant.

use thiserror::Error;

use crate::model::{Block, BlockKind, Document, ListType, Node, RangeError};
use crate::transform::Step;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("position {0} is not inside an ordered list")]
    NotInList(usize),

    #[error(transparent)]
    Range(#[from] RangeError),
}

/// The ordered list enclosing a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListContext {
    /// Position of the list's open token
    pub pos: usize,
    /// Nesting depth (top-level blocks have depth 1)
    pub depth: usize,
    pub list_type: ListType,
    pub start: u32,
}

/// Nearest ordered list enclosing `pos`
pub fn enclosing_ordered_list(doc: &Document, pos: usize) -> Result<ListContext, ListError> {
    let resolved = doc.resolve(pos)?;
    resolved
        .ancestors
        .iter()
        .rev()
        .find_map(|ancestor| match ancestor.block.kind {
            BlockKind::OrderedList { list_type, start } => Some(ListContext {
                pos: ancestor.start,
                depth: ancestor.depth,
                list_type,
                start,
            }),
            _ => None,
        })
        .ok_or(ListError::NotInList(pos))
}

/// Start number that continues the closest comparable list before the list
/// enclosing `pos`; 1 when there is none. Saturates at `u32::MAX`.
pub fn suggested_start_number(doc: &Document, pos: usize) -> Result<u32, ListError> {
    let current = enclosing_ordered_list(doc, pos)?;

    let mut candidate: Option<(u32, usize)> = None;
    doc.nodes_between(0, current.pos, |node, _, _, depth| match node {
        Node::Block(block) => {
            if let BlockKind::OrderedList { list_type, start } = block.kind
                && depth == current.depth
                && list_type == current.list_type
            {
                candidate = Some((start, item_count(block)));
            }
            !block.kind.is_textblock()
        }
        Node::Text(_) => false,
    });

    Ok(match candidate {
        Some((start, items)) => {
            u32::try_from(items).map_or(u32::MAX, |items| start.saturating_add(items))
        }
        None => {
            log::debug!(
                "No earlier {:?} list at depth {}; numbering starts at 1",
                current.list_type,
                current.depth
            );
            1
        }
    })
}

/// Step setting the enclosing list's start to the suggested continuation number
pub fn continue_previous_numbering(doc: &Document, pos: usize) -> Result<Step, ListError> {
    let current = enclosing_ordered_list(doc, pos)?;
    let start = suggested_start_number(doc, pos)?;
    Ok(Step::SetListStart {
        pos: current.pos,
        start,
    })
}

/// Step resetting the enclosing list's numbering to 1
pub fn restart_numbering(doc: &Document, pos: usize) -> Result<Step, ListError> {
    let current = enclosing_ordered_list(doc, pos)?;
    Ok(Step::SetListStart {
        pos: current.pos,
        start: 1,
    })
}

fn item_count(list: &Block) -> usize {
    list.children
        .iter()
        .filter(|child| child.kind() == Some(BlockKind::ListItem))
        .count()
}

impl ListType {
    /// Label of the `n`-th item (1-based).
    ///
    /// Alphabetic labels roll over `z` to `aa`; roman numerals cover 1..=3999
    /// and fall back to decimal outside that range.
    pub fn marker(self, n: u32) -> String {
        match self {
            ListType::Decimal => n.to_string(),
            ListType::LowerAlpha => alphabetic(n).unwrap_or_else(|| n.to_string()),
            ListType::UpperAlpha => alphabetic(n)
                .map(|label| label.to_uppercase())
                .unwrap_or_else(|| n.to_string()),
            ListType::LowerRoman => roman(n).unwrap_or_else(|| n.to_string()),
            ListType::UpperRoman => roman(n)
                .map(|label| label.to_uppercase())
                .unwrap_or_else(|| n.to_string()),
        }
    }
}

fn alphabetic(mut n: u32) -> Option<String> {
    if n == 0 {
        return None;
    }
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    Some(letters.iter().rev().collect())
}

fn roman(mut n: u32) -> Option<String> {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    if n == 0 || n > 3999 {
        return None;
    }
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    Some(out)
}
