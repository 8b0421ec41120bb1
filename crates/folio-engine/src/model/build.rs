//! Constructors for building document trees in code.
//!
//! ```rust,ignore
//! use folio_engine::model::build::*;
//!
//! let document = doc(vec![
//!     divider(SectionType::Toc),
//!     para("Contents"),
//!     divider(SectionType::MainText),
//!     heading(2, "Chapter one"),
//!     para_runs(vec![text("plain "), marked("bold", &[Mark::new(MarkKind::Bold)])]),
//! ]);
//! ```

use super::attrs::Attrs;
use super::document::Document;
use super::mark::Mark;
use super::node::{Block, BlockKind, ListType, Node, SectionType, TextRun};

pub fn doc(children: Vec<Node>) -> Document {
    Document::new(children)
}

pub fn text(content: &str) -> Node {
    Node::Text(TextRun::new(content))
}

pub fn marked(content: &str, marks: &[Mark]) -> Node {
    Node::Text(TextRun::with_marks(content, marks))
}

pub fn block(kind: BlockKind, attrs: Attrs, children: Vec<Node>) -> Node {
    Node::Block(Block::new(kind, attrs, children))
}

/// Paragraph with a single unmarked run (no run at all for `""`)
pub fn para(content: &str) -> Node {
    para_runs(plain_runs(content))
}

pub fn para_runs(runs: Vec<Node>) -> Node {
    block(BlockKind::Paragraph, Attrs::new(), runs)
}

pub fn para_with_attrs(attrs: Attrs, runs: Vec<Node>) -> Node {
    block(BlockKind::Paragraph, attrs, runs)
}

pub fn heading(level: u8, content: &str) -> Node {
    heading_runs(level, plain_runs(content))
}

pub fn heading_runs(level: u8, runs: Vec<Node>) -> Node {
    block(BlockKind::Heading { level }, Attrs::new(), runs)
}

pub fn ordered_list(list_type: ListType, start: u32, items: Vec<Node>) -> Node {
    block(
        BlockKind::OrderedList { list_type, start },
        Attrs::new(),
        items,
    )
}

pub fn bullet_list(items: Vec<Node>) -> Node {
    block(BlockKind::BulletList, Attrs::new(), items)
}

pub fn item(children: Vec<Node>) -> Node {
    block(BlockKind::ListItem, Attrs::new(), children)
}

pub fn blockquote(children: Vec<Node>) -> Node {
    block(BlockKind::Blockquote, Attrs::new(), children)
}

pub fn divider(section_type: SectionType) -> Node {
    block(
        BlockKind::SectionDivider { section_type },
        Attrs::new(),
        vec![],
    )
}

fn plain_runs(content: &str) -> Vec<Node> {
    if content.is_empty() {
        vec![]
    } else {
        vec![text(content)]
    }
}
