use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::attrs::Attrs;

/// Kinds of marks a text run can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    /// Direct character formatting: font family, size, color
    TextStyle,
    /// A named custom style applied to the run; attrs carry the style's values
    CustomStyle,
    Comment,
    Bookmark,
    LemmaNote,
    CrossReference,
}

impl MarkKind {
    pub fn is_annotation(self) -> bool {
        AnnotationKind::from_mark_kind(self).is_some()
    }
}

/// The mark kinds that form annotations (one logical annotation per instance id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    Comment,
    Bookmark,
    LemmaNote,
    CrossReference,
}

impl AnnotationKind {
    pub fn mark_kind(self) -> MarkKind {
        match self {
            AnnotationKind::Comment => MarkKind::Comment,
            AnnotationKind::Bookmark => MarkKind::Bookmark,
            AnnotationKind::LemmaNote => MarkKind::LemmaNote,
            AnnotationKind::CrossReference => MarkKind::CrossReference,
        }
    }

    pub fn from_mark_kind(kind: MarkKind) -> Option<Self> {
        match kind {
            MarkKind::Comment => Some(AnnotationKind::Comment),
            MarkKind::Bookmark => Some(AnnotationKind::Bookmark),
            MarkKind::LemmaNote => Some(AnnotationKind::LemmaNote),
            MarkKind::CrossReference => Some(AnnotationKind::CrossReference),
            MarkKind::Bold
            | MarkKind::Italic
            | MarkKind::Underline
            | MarkKind::Strikethrough
            | MarkKind::TextStyle
            | MarkKind::CustomStyle => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnnotationKind::Comment => "comment",
            AnnotationKind::Bookmark => "bookmark",
            AnnotationKind::LemmaNote => "lemma note",
            AnnotationKind::CrossReference => "cross-reference",
        }
    }
}

/// Identifier shared by every mark occurrence of one annotation
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct AnnotationId(pub Uuid);

impl AnnotationId {
    /// Fresh random id
    pub fn new() -> Self {
        AnnotationId(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A range decoration on a text run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    pub kind: MarkKind,
    /// Set for annotation kinds only
    pub id: Option<AnnotationId>,
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            id: None,
            attrs: Attrs::new(),
        }
    }

    pub fn with_attrs(kind: MarkKind, attrs: Attrs) -> Self {
        Self {
            kind,
            id: None,
            attrs,
        }
    }

    pub fn annotation(kind: AnnotationKind, id: AnnotationId, attrs: Attrs) -> Self {
        Self {
            kind: kind.mark_kind(),
            id: Some(id),
            attrs,
        }
    }

    /// Two marks occupy the same slot in a run's mark set when they have the
    /// same kind and the same instance id. Adding a mark replaces whatever
    /// occupies its slot, so formatting kinds appear at most once per run while
    /// distinct annotations of one kind may overlap.
    pub fn same_slot(&self, other: &Mark) -> bool {
        self.kind == other.kind && self.id == other.id
    }

    fn sort_key(&self) -> (MarkKind, Option<AnnotationId>) {
        (self.kind, self.id)
    }
}

/// Insert `mark` into a sorted mark set, replacing the mark in its slot.
pub(crate) fn add_to_set(marks: &mut Vec<Mark>, mark: &Mark) {
    marks.retain(|existing| !existing.same_slot(mark));
    let index = marks
        .iter()
        .position(|existing| existing.sort_key() > mark.sort_key())
        .unwrap_or(marks.len());
    marks.insert(index, mark.clone());
}

/// Remove the mark occupying `mark`'s slot. Returns whether anything was removed.
pub(crate) fn remove_from_set(marks: &mut Vec<Mark>, mark: &Mark) -> bool {
    let before = marks.len();
    marks.retain(|existing| !existing.same_slot(mark));
    marks.len() != before
}
