//! # Emphasis State
//!
//! Selection-wide formatting summary that drives toolbar state. Recomputed on
//! every selection or transaction event and never stored.
//!
//! Each text run resolves every property with this precedence (highest first):
//!
//! 1. the run's custom-style mark
//! 2. a direct mark (`Bold`, `Italic`, ..., or `TextStyle` values)
//! 3. the nearest enclosing block attribute
//! 4. the configured default
//!
//! A property is reported only when every selected run agrees on it. Mixed
//! selections report `false` / `None`.

use std::sync::OnceLock;

use folio_config::StyleDefaults;
use regex::Regex;

use crate::model::{
    Ancestor, Attrs, BlockKind, Document, Mark, MarkKind, RangeError, Selection, TextRun, keys,
};

/// Paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn name(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Formatting summary of a selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmphasisState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub color: Option<String>,
    pub alignment: Option<Alignment>,
    pub heading_level: Option<u8>,
    pub style_id: Option<String>,
    pub list_glyph: Option<char>,
}

/// Property values of one run after precedence resolution
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunStyle {
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    font_family: Option<String>,
    font_size: Option<String>,
    color: Option<String>,
    style_id: Option<String>,
}

/// A textblock touched by the selection, with its runs in range
struct TouchedBlock<'a> {
    ancestors: Vec<Ancestor<'a>>,
    runs: Vec<&'a TextRun>,
}

impl<'a> TouchedBlock<'a> {
    fn kind(&self) -> Option<BlockKind> {
        self.ancestors.last().map(|ancestor| ancestor.block.kind)
    }

    /// Nearest enclosing block attribute
    fn block_attr(&self, key: &str) -> Option<&'a crate::model::AttrValue> {
        self.ancestors
            .iter()
            .rev()
            .find_map(|ancestor| ancestor.block.attrs.get(key))
    }
}

/// Resolve the emphasis state of `selection`
pub fn emphasis_state(
    doc: &Document,
    selection: Selection,
    defaults: &StyleDefaults,
) -> Result<EmphasisState, RangeError> {
    doc.check_range(selection.from, selection.to)?;

    let mut blocks = if selection.is_empty() {
        Vec::new()
    } else {
        touched_blocks(doc, selection.from, selection.to)?
    };
    if blocks.iter().all(|block| block.runs.is_empty()) {
        blocks = cursor_block(doc, selection.from)?.into_iter().collect();
    }
    // Outside any textblock: enclosing block attributes, then defaults
    if blocks.is_empty() {
        blocks.push(TouchedBlock {
            ancestors: doc.resolve(selection.from)?.ancestors,
            runs: Vec::new(),
        });
    }

    // Empty textblocks only count when nothing else carries text
    let styles: Vec<RunStyle> = if blocks.iter().any(|block| !block.runs.is_empty()) {
        blocks
            .iter()
            .flat_map(|block| {
                block
                    .runs
                    .iter()
                    .map(move |run| resolve_run(block, &run.marks, defaults))
            })
            .collect()
    } else {
        blocks
            .iter()
            .map(|block| resolve_run(block, &[], defaults))
            .collect()
    };

    let style_id = agreed(styles.iter().map(|style| style.style_id.clone()));
    let alignment = agreed(blocks.iter().map(|block| {
        block
            .block_attr(keys::ALIGN)
            .and_then(|value| value.as_str())
            .or(Some(defaults.alignment.as_str()))
            .and_then(Alignment::from_name)
    }));
    let heading_level = if style_id.is_some() {
        None
    } else {
        heading_level(&blocks)
    };

    let list_glyph = doc
        .resolve(selection.from)?
        .nearest(BlockKind::is_list)
        .and_then(|ancestor| match ancestor.block.kind {
            BlockKind::OrderedList { list_type, .. } => Some(list_type.glyph()),
            _ => None,
        });

    Ok(EmphasisState {
        bold: all(styles.iter().map(|style| style.bold)),
        italic: all(styles.iter().map(|style| style.italic)),
        underline: all(styles.iter().map(|style| style.underline)),
        strikethrough: all(styles.iter().map(|style| style.strikethrough)),
        font_family: agreed(styles.iter().map(|style| style.font_family.clone())),
        font_size: agreed(styles.iter().map(|style| style.font_size.clone())),
        color: agreed(styles.iter().map(|style| style.color.clone())),
        alignment,
        heading_level,
        style_id,
        list_glyph,
    })
}

fn touched_blocks(
    doc: &Document,
    from: usize,
    to: usize,
) -> Result<Vec<TouchedBlock<'_>>, RangeError> {
    let mut positions = Vec::new();
    doc.nodes_between(from, to, |node, pos, _, _| match node.kind() {
        Some(kind) if kind.is_textblock() => {
            positions.push((pos, node.size()));
            false
        }
        Some(_) => true,
        None => false,
    });

    positions
        .into_iter()
        .map(|(pos, size)| {
            let resolved = doc.resolve(pos + 1)?;
            let content_start = pos + 1;
            let local_from = from.max(content_start) - content_start;
            let local_to = to.min(pos + size - 1).max(content_start) - content_start;
            let runs = resolved
                .parent()
                .map(|parent| {
                    parent
                        .block
                        .runs_between(local_from, local_to)
                        .into_iter()
                        .map(|(_, run)| run)
                        .collect()
                })
                .unwrap_or_default();
            Ok(TouchedBlock {
                ancestors: resolved.ancestors,
                runs,
            })
        })
        .collect()
}

/// The textblock at a collapsed cursor, with the run before the cursor (or
/// the first run when the cursor is at the textblock start)
fn cursor_block(doc: &Document, pos: usize) -> Result<Option<TouchedBlock<'_>>, RangeError> {
    let resolved = doc.resolve(pos)?;
    let Some(textblock) = resolved.textblock().copied() else {
        log::debug!("Cursor at {pos} is not inside a textblock");
        return Ok(None);
    };

    let offset = resolved.parent_offset;
    let (lookup_from, lookup_to) = if offset == 0 {
        (0, 1)
    } else {
        (offset - 1, offset)
    };
    let runs = textblock
        .block
        .runs_between(lookup_from, lookup_to)
        .into_iter()
        .map(|(_, run)| run)
        .take(1)
        .collect();

    Ok(Some(TouchedBlock {
        ancestors: resolved.ancestors,
        runs,
    }))
}

fn resolve_run(block: &TouchedBlock<'_>, marks: &[Mark], defaults: &StyleDefaults) -> RunStyle {
    let custom = marks.iter().find(|mark| mark.kind == MarkKind::CustomStyle);
    let text_style = marks.iter().find(|mark| mark.kind == MarkKind::TextStyle);
    let has = |kind: MarkKind| marks.iter().any(|mark| mark.kind == kind);

    let flag = |key: &str, kind: MarkKind| -> bool {
        custom
            .and_then(|mark| mark.attrs.get_bool(key))
            .or_else(|| has(kind).then_some(true))
            .or_else(|| block.block_attr(key).and_then(|value| value.as_bool()))
            .unwrap_or(false)
    };

    let valued = |key: &str| -> Option<String> {
        string_attr(custom.map(|mark| &mark.attrs), key)
            .or_else(|| string_attr(text_style.map(|mark| &mark.attrs), key))
            .or_else(|| {
                block
                    .block_attr(key)
                    .and_then(|value| value.as_str())
                    .map(str::to_string)
            })
    };

    RunStyle {
        bold: flag(keys::BOLD, MarkKind::Bold),
        italic: flag(keys::ITALIC, MarkKind::Italic),
        underline: flag(keys::UNDERLINE, MarkKind::Underline),
        strikethrough: flag(keys::STRIKETHROUGH, MarkKind::Strikethrough),
        font_family: valued(keys::FONT_FAMILY)
            .or_else(|| Some(defaults.font_family.clone()))
            .map(|family| normalize_font_family(&family)),
        font_size: valued(keys::FONT_SIZE).or_else(|| Some(defaults.font_size.clone())),
        color: valued(keys::COLOR).or_else(|| defaults.color.clone()),
        style_id: string_attr(custom.map(|mark| &mark.attrs), keys::STYLE_ID).or_else(|| {
            block
                .block_attr(keys::STYLE_ID)
                .and_then(|value| value.as_str())
                .map(str::to_string)
        }),
    }
}

fn string_attr(attrs: Option<&Attrs>, key: &str) -> Option<String> {
    attrs
        .and_then(|attrs| attrs.get_str(key))
        .map(str::to_string)
}

/// Strip quoting artifacts (`"Times New Roman"`, `'Arial'`, `&quot;Georgia&quot;`)
pub fn normalize_font_family(family: &str) -> String {
    static QUOTES: OnceLock<Regex> = OnceLock::new();
    let quotes = QUOTES.get_or_init(|| {
        Regex::new(r#"^(?:["']|&quot;)+|(?:["']|&quot;)+$"#).expect("Invalid quote regex")
    });
    quotes.replace_all(family.trim(), "").trim().to_string()
}

fn heading_level(blocks: &[TouchedBlock<'_>]) -> Option<u8> {
    let mut level = None;
    for kind in blocks.iter().filter_map(TouchedBlock::kind) {
        let BlockKind::Heading { level: current } = kind else {
            return None;
        };
        match level {
            Some(previous) if previous != current => return None,
            _ => level = Some(current),
        }
    }
    level
}

fn all(mut values: impl Iterator<Item = bool>) -> bool {
    let mut seen = false;
    let agreed = values.all(|value| {
        seen = true;
        value
    });
    seen && agreed
}

fn agreed<T: PartialEq>(mut values: impl Iterator<Item = Option<T>>) -> Option<T> {
    let first = values.next()??;
    for value in values {
        if value.as_ref() != Some(&first) {
            return None;
        }
    }
    Some(first)
}
