use serde::{Deserialize, Serialize};

use super::attrs::Attrs;
use super::mark::{Mark, add_to_set};

/// Section types carried by section dividers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    Toc,
    Introduction,
    MainText,
    Bibliography,
}

impl SectionType {
    pub fn name(self) -> &'static str {
        match self {
            SectionType::Toc => "toc",
            SectionType::Introduction => "introduction",
            SectionType::MainText => "maintext",
            SectionType::Bibliography => "bibliography",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "toc" => Some(SectionType::Toc),
            "introduction" => Some(SectionType::Introduction),
            "maintext" => Some(SectionType::MainText),
            "bibliography" => Some(SectionType::Bibliography),
            _ => None,
        }
    }

    /// Protected sections are atomic: no marks, no direct edits
    pub fn is_protected(self) -> bool {
        matches!(self, SectionType::Toc)
    }
}

/// Numbering style of an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListType {
    /// `1`
    Decimal,
    /// `a`
    LowerAlpha,
    /// `A`
    UpperAlpha,
    /// `i`
    LowerRoman,
    /// `I`
    UpperRoman,
}

impl ListType {
    pub fn glyph(self) -> char {
        match self {
            ListType::Decimal => '1',
            ListType::LowerAlpha => 'a',
            ListType::UpperAlpha => 'A',
            ListType::LowerRoman => 'i',
            ListType::UpperRoman => 'I',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '1' => Some(ListType::Decimal),
            'a' => Some(ListType::LowerAlpha),
            'A' => Some(ListType::UpperAlpha),
            'i' => Some(ListType::LowerRoman),
            'I' => Some(ListType::UpperRoman),
            _ => None,
        }
    }
}

/// Block node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    OrderedList { list_type: ListType, start: u32 },
    BulletList,
    ListItem,
    Blockquote,
    /// Sentinel opening a section; has no content
    SectionDivider { section_type: SectionType },
}

impl BlockKind {
    /// Textblocks hold text runs; every other non-leaf kind holds blocks
    pub fn is_textblock(self) -> bool {
        matches!(self, BlockKind::Paragraph | BlockKind::Heading { .. })
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, BlockKind::SectionDivider { .. })
    }

    pub fn is_list(self) -> bool {
        matches!(self, BlockKind::OrderedList { .. } | BlockKind::BulletList)
    }
}

/// A leaf string carrying an ordered set of marks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub marks: Vec<Mark>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn with_marks(text: impl Into<String>, marks: &[Mark]) -> Self {
        let mut sorted = Vec::new();
        for mark in marks {
            add_to_set(&mut sorted, mark);
        }
        Self {
            text: text.into(),
            marks: sorted,
        }
    }

    /// Size in positions (one per char)
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn has_mark(&self, mark: &Mark) -> bool {
        self.marks.iter().any(|m| m.same_slot(mark))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub attrs: Attrs,
    pub children: Vec<Node>,
}

impl Block {
    pub fn new(kind: BlockKind, attrs: Attrs, children: Vec<Node>) -> Self {
        Self {
            kind,
            attrs,
            children,
        }
    }

    /// Size of the content between the open and close tokens
    pub fn content_size(&self) -> usize {
        self.children.iter().map(Node::size).sum()
    }

    pub fn size(&self) -> usize {
        2 + self.content_size()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(run) => out.push_str(&run.text),
                Node::Block(block) => out.push_str(&block.text_content()),
            }
        }
        out
    }

    fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.children.iter().filter_map(|child| match child {
            Node::Text(run) => Some(run),
            Node::Block(_) => None,
        })
    }

    fn take_runs(&mut self) -> Vec<TextRun> {
        std::mem::take(&mut self.children)
            .into_iter()
            .filter_map(|child| match child {
                Node::Text(run) => Some(run),
                Node::Block(_) => None,
            })
            .collect()
    }

    fn set_runs(&mut self, runs: Vec<TextRun>) {
        self.children = normalize_runs(runs).into_iter().map(Node::Text).collect();
    }

    /// Delete the inline content between two content offsets
    pub(crate) fn delete_inline(&mut self, from: usize, to: usize) {
        let mut runs = Vec::new();
        let mut pos = 0;
        for run in self.take_runs() {
            let len = run.len();
            let end = pos + len;
            let cut_start = from.max(pos).min(end) - pos;
            let cut_end = to.min(end).max(pos) - pos;
            if cut_start < cut_end {
                let mut text = char_slice(&run.text, 0, cut_start);
                text.push_str(&char_slice(&run.text, cut_end, len));
                runs.push(TextRun {
                    text,
                    marks: run.marks,
                });
            } else {
                runs.push(run);
            }
            pos = end;
        }
        self.set_runs(runs);
    }

    /// Insert text at a content offset
    pub(crate) fn insert_inline(&mut self, at: usize, text: &str, marks: &[Mark]) {
        let mut runs = split_runs_at(self.take_runs(), &[at]);
        let mut pos = 0;
        let mut index = runs.len();
        for (i, run) in runs.iter().enumerate() {
            if pos >= at {
                index = i;
                break;
            }
            pos += run.len();
        }
        runs.insert(index, TextRun::with_marks(text, marks));
        self.set_runs(runs);
    }

    /// Apply `f` to the mark set of every run between two content offsets,
    /// splitting runs at the boundaries. Returns whether any run was visited.
    pub(crate) fn update_marks(
        &mut self,
        from: usize,
        to: usize,
        mut f: impl FnMut(&mut Vec<Mark>),
    ) -> bool {
        let mut runs = split_runs_at(self.take_runs(), &[from, to]);
        let mut touched = false;
        let mut pos = 0;
        for run in &mut runs {
            let end = pos + run.len();
            if pos >= from && end <= to && pos < end {
                f(&mut run.marks);
                touched = true;
            }
            pos = end;
        }
        self.set_runs(runs);
        touched
    }

    /// Runs intersecting the content offsets, with each run's content offset
    pub(crate) fn runs_between(&self, from: usize, to: usize) -> Vec<(usize, &TextRun)> {
        let mut out = Vec::new();
        let mut pos = 0;
        for run in self.runs() {
            let end = pos + run.len();
            if pos < to && end > from {
                out.push((pos, run));
            }
            pos = end;
        }
        out
    }
}

/// A document tree node: a block or a text run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Block(Block),
    Text(TextRun),
}

impl Node {
    pub fn size(&self) -> usize {
        match self {
            Node::Block(block) => block.size(),
            Node::Text(run) => run.len(),
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Node::Text(run) => Some(run),
            Node::Block(_) => None,
        }
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.as_block().map(|block| block.kind)
    }
}

/// Slice a string by char offsets
pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> String {
    text.chars().skip(from).take(to.saturating_sub(from)).collect()
}

/// Split runs so that each offset in `cuts` falls on a run boundary
fn split_runs_at(runs: Vec<TextRun>, cuts: &[usize]) -> Vec<TextRun> {
    let mut out = Vec::with_capacity(runs.len() + cuts.len());
    let mut pos = 0;
    for run in runs {
        let len = run.len();
        let end = pos + len;
        let mut inner: Vec<usize> = cuts
            .iter()
            .filter(|&&cut| cut > pos && cut < end)
            .map(|&cut| cut - pos)
            .collect();
        inner.sort_unstable();
        inner.dedup();
        let mut last = 0;
        for cut in inner {
            out.push(TextRun {
                text: char_slice(&run.text, last, cut),
                marks: run.marks.clone(),
            });
            last = cut;
        }
        out.push(TextRun {
            text: char_slice(&run.text, last, len),
            marks: run.marks,
        });
        pos = end;
    }
    out
}

/// Drop empty runs and merge neighbours with equal mark sets
pub(crate) fn normalize_runs(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
            _ => out.push(run),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarkKind;
    use pretty_assertions::assert_eq;

    fn paragraph(runs: Vec<TextRun>) -> Block {
        Block::new(
            BlockKind::Paragraph,
            Attrs::new(),
            runs.into_iter().map(Node::Text).collect(),
        )
    }

    fn texts(block: &Block) -> Vec<String> {
        block.runs().map(|run| run.text.clone()).collect()
    }

    #[test]
    fn test_block_size_counts_boundary_tokens() {
        let block = paragraph(vec![TextRun::new("Hello")]);
        assert_eq!(block.size(), 7);

        let divider = Block::new(
            BlockKind::SectionDivider {
                section_type: SectionType::Toc,
            },
            Attrs::new(),
            vec![],
        );
        assert_eq!(divider.size(), 2);
    }

    #[test]
    fn test_text_size_counts_chars_not_bytes() {
        let run = TextRun::new("Ἀρχή");
        assert_eq!(run.len(), 4);
    }

    #[test]
    fn test_delete_inline_across_runs() {
        let bold = Mark::new(MarkKind::Bold);
        let mut block = paragraph(vec![
            TextRun::new("Hello "),
            TextRun::with_marks("brave", &[bold.clone()]),
            TextRun::new(" world"),
        ]);

        block.delete_inline(4, 8);

        assert_eq!(block.text_content(), "Hellave world");
        assert_eq!(texts(&block), vec!["Hell", "ave", " world"]);
    }

    #[test]
    fn test_update_marks_splits_and_merges() {
        let bold = Mark::new(MarkKind::Bold);
        let mut block = paragraph(vec![TextRun::new("abcdef")]);

        block.update_marks(2, 4, |marks| add_to_set(marks, &bold));
        assert_eq!(texts(&block), vec!["ab", "cd", "ef"]);

        block.update_marks(0, 6, |marks| {
            marks.retain(|m| m.kind != MarkKind::Bold);
        });
        assert_eq!(texts(&block), vec!["abcdef"]);
    }

    #[test]
    fn test_insert_inline_in_middle_of_run() {
        let italic = Mark::new(MarkKind::Italic);
        let mut block = paragraph(vec![TextRun::new("abef")]);

        block.insert_inline(2, "cd", &[italic.clone()]);

        assert_eq!(block.text_content(), "abcdef");
        assert_eq!(texts(&block), vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_insert_inline_into_empty_block() {
        let mut block = paragraph(vec![]);
        block.insert_inline(0, "new", &[]);
        assert_eq!(block.text_content(), "new");
    }

    #[test]
    fn test_list_type_glyph_roundtrip() {
        for glyph in ['1', 'a', 'A', 'i', 'I'] {
            assert_eq!(ListType::from_glyph(glyph).unwrap().glyph(), glyph);
        }
        assert_eq!(ListType::from_glyph('x'), None);
    }
}
