//! # Annotation Range Engine
//!
//! An annotation is every mark occurrence sharing one instance id. Edits may
//! split or scatter an annotation; each fragment keeps the id, so the scans here
//! still treat the fragments as one logical annotation.
//!
//! All lookups are full-document scans built on `Document::descendants`. The
//! mutating operations only build transactions; `Editor` applies them and
//! notifies listeners.

pub mod events;

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use crate::model::{
    AnnotationId, AnnotationKind, Attrs, Document, Mark, Node, RangeError, keys,
};
use crate::sections;
use crate::transform::{Step, Transaction};

pub use events::{AnnotationEvent, AnnotationListener};

/// One logical annotation found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSummary {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    /// Bounding range of every occurrence
    pub range: Range<usize>,
    /// Text of the covered runs in document order, with a newline between
    /// textblocks
    pub text: String,
    /// Attributes of the first occurrence
    pub attrs: Attrs,
}

/// Every occurrence of `id`: the range of the run carrying it and the mark itself
pub fn occurrences(doc: &Document, id: AnnotationId) -> Vec<(Range<usize>, Mark)> {
    let mut found = Vec::new();
    doc.descendants(|node, pos, _, _| match node {
        Node::Text(run) => {
            if let Some(mark) = run.marks.iter().find(|mark| mark.id == Some(id)) {
                found.push((pos..pos + run.len(), mark.clone()));
            }
            false
        }
        Node::Block(_) => true,
    });
    found
}

/// Bounding range `[min start, max end]` of every occurrence of `id`, or
/// `None` when the annotation has no occurrence left
pub fn locate(doc: &Document, id: AnnotationId) -> Option<Range<usize>> {
    let found = occurrences(doc, id);
    let start = found.iter().map(|(range, _)| range.start).min();
    let end = found.iter().map(|(range, _)| range.end).max();
    match start.zip(end) {
        Some((start, end)) => Some(start..end),
        None => {
            log::debug!("Annotation {id} not found");
            None
        }
    }
}

/// Every annotation of `kind`, ordered by start position
pub fn annotations(doc: &Document, kind: AnnotationKind) -> Vec<AnnotationSummary> {
    let mut by_id: BTreeMap<AnnotationId, AnnotationSummary> = BTreeMap::new();
    // Textblock of each annotation's latest fragment, for the block separator
    let mut last_block: BTreeMap<AnnotationId, usize> = BTreeMap::new();
    let mut textblock = 0;
    doc.descendants(|node, pos, _, _| match node {
        Node::Text(run) => {
            let range = pos..pos + run.len();
            for mark in &run.marks {
                let Some(id) = mark.id else { continue };
                if mark.kind != kind.mark_kind() {
                    continue;
                }
                let previous_block = last_block.insert(id, textblock);
                by_id
                    .entry(id)
                    .and_modify(|summary| {
                        summary.range.end = summary.range.end.max(range.end);
                        if previous_block != Some(textblock) {
                            summary.text.push('\n');
                        }
                        summary.text.push_str(&run.text);
                    })
                    .or_insert_with(|| AnnotationSummary {
                        id,
                        kind,
                        range: range.clone(),
                        text: run.text.clone(),
                        attrs: mark.attrs.clone(),
                    });
            }
            false
        }
        Node::Block(block) => {
            if block.kind.is_textblock() {
                textblock = pos;
            }
            true
        }
    });

    let mut summaries: Vec<_> = by_id.into_values().collect();
    summaries.sort_by_key(|summary| (summary.range.start, summary.range.end));
    summaries
}

/// Transaction creating a new annotation over `range`.
///
/// Returns `Ok(None)` for an empty range or a range with no markable text
/// (nothing but protected-section content).
pub fn create(
    doc: &Document,
    kind: AnnotationKind,
    range: Range<usize>,
    attrs: Attrs,
) -> Result<Option<(AnnotationId, Transaction)>, RangeError> {
    doc.check_range(range.start, range.end)?;
    if range.is_empty() {
        log::debug!("Not creating {} on an empty selection", kind.name());
        return Ok(None);
    }
    if !has_markable_text(doc, &range) {
        log::debug!(
            "Not creating {} over {range:?}: no markable text",
            kind.name()
        );
        return Ok(None);
    }

    let id = AnnotationId::new();
    let tx = Transaction::new()
        .step(Step::AddMark {
            from: range.start,
            to: range.end,
            mark: Mark::annotation(kind, id, attrs),
        })
        .with_label(format!("add {}", kind.name()));
    Ok(Some((id, tx)))
}

/// Transaction reapplying annotation `id` across its bounding range with its
/// attributes merged with `update`. `None` when the annotation is gone.
pub fn recolor(doc: &Document, id: AnnotationId, update: &Attrs) -> Option<Transaction> {
    let (range, mark) = bounding_mark(doc, id)?;
    let mark = Mark {
        attrs: mark.attrs.merged(update),
        ..mark
    };
    Some(
        Transaction::new()
            .step(Step::AddMark {
                from: range.start,
                to: range.end,
                mark,
            })
            .with_label("recolor annotation"),
    )
}

/// Transaction removing every occurrence of every id in `ids`, found in one
/// traversal. Also returns the ids that had occurrences.
pub fn bulk_remove(doc: &Document, ids: &[AnnotationId]) -> (Transaction, Vec<AnnotationId>) {
    let wanted: HashSet<AnnotationId> = ids.iter().copied().collect();
    let mut tx = Transaction::new().with_label("remove annotations");
    let mut removed = Vec::new();

    doc.descendants(|node, pos, _, _| match node {
        Node::Text(run) => {
            for mark in &run.marks {
                if let Some(id) = mark.id
                    && wanted.contains(&id)
                {
                    tx.push(Step::RemoveMark {
                        from: pos,
                        to: pos + run.len(),
                        mark: mark.clone(),
                    });
                    if !removed.contains(&id) {
                        removed.push(id);
                    }
                }
            }
            false
        }
        Node::Block(_) => true,
    });

    (tx, removed)
}

/// Transaction recoloring every annotation of `kind` whose category is
/// `category`. Kept out of the undo history. Also returns the recolored ids.
pub fn recolor_category(
    doc: &Document,
    kind: AnnotationKind,
    category: &str,
    color: &str,
) -> (Transaction, Vec<AnnotationId>) {
    let update = Attrs::new().with(keys::COLOR, color);
    let mut tx = Transaction::new()
        .without_history()
        .with_label("recolor category");
    let mut recolored = Vec::new();

    for summary in annotations(doc, kind) {
        if summary.attrs.get_str(keys::CATEGORY) != Some(category) {
            continue;
        }
        let mark = Mark::annotation(kind, summary.id, summary.attrs.merged(&update));
        tx.push(Step::AddMark {
            from: summary.range.start,
            to: summary.range.end,
            mark,
        });
        recolored.push(summary.id);
    }

    (tx, recolored)
}

fn bounding_mark(doc: &Document, id: AnnotationId) -> Option<(Range<usize>, Mark)> {
    let found = occurrences(doc, id);
    let (first_range, first_mark) = found.first()?.clone();
    let end = found
        .iter()
        .map(|(range, _)| range.end)
        .max()
        .unwrap_or(first_range.end);
    Some((first_range.start..end, first_mark))
}

fn has_markable_text(doc: &Document, range: &Range<usize>) -> bool {
    let protected = sections::protected_range(doc);
    let mut markable = false;
    doc.nodes_between(range.start, range.end, |node, pos, _, _| {
        if markable {
            return false;
        }
        match node {
            Node::Block(block) if block.kind.is_textblock() => {
                protected.as_ref().is_none_or(|p| !p.contains(&pos))
            }
            Node::Block(_) => true,
            Node::Text(_) => {
                markable = true;
                false
            }
        }
    });
    markable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build::*;
    use crate::model::{MarkKind, SectionType};
    use pretty_assertions::assert_eq;

    fn comment(id: AnnotationId, color: &str) -> Mark {
        Mark::annotation(
            AnnotationKind::Comment,
            id,
            Attrs::new().with(keys::COLOR, color),
        )
    }

    #[test]
    fn test_locate_spans_scattered_occurrences() {
        let id = AnnotationId::new();
        let doc = doc(vec![
            para_runs(vec![marked("one", &[comment(id, "red")]), text(" gap")]),
            para_runs(vec![text("x"), marked("two", &[comment(id, "red")])]),
        ]);

        // first paragraph 0..9, second 9..15
        assert_eq!(locate(&doc, id), Some(1..14));
    }

    #[test]
    fn test_summary_text_breaks_between_blocks_only() {
        let id = AnnotationId::new();
        let bold = Mark::new(MarkKind::Bold);
        let doc = doc(vec![
            para_runs(vec![
                marked("one", &[comment(id, "red")]),
                marked("two", &[comment(id, "red"), bold]),
            ]),
            para_runs(vec![marked("three", &[comment(id, "red")])]),
        ]);

        let summaries = annotations(&doc, AnnotationKind::Comment);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].text, "onetwo\nthree");
        assert_eq!(summaries[0].text, doc.text_between(1, 14));
    }

    #[test]
    fn test_locate_missing_annotation() {
        let doc = doc(vec![para("plain")]);
        assert_eq!(locate(&doc, AnnotationId::new()), None);
    }

    #[test]
    fn test_annotations_of_kind() {
        let first = AnnotationId::new();
        let second = AnnotationId::new();
        let bookmark = Mark::annotation(AnnotationKind::Bookmark, AnnotationId::new(), Attrs::new());
        let doc = doc(vec![para_runs(vec![
            marked("ab", &[comment(second, "blue"), bookmark]),
            text("-"),
            marked("cd", &[comment(first, "red")]),
        ])]);

        let found = annotations(&doc, AnnotationKind::Comment);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, second);
        assert_eq!(found[0].range, 1..3);
        assert_eq!(found[1].text, "cd");
        assert_eq!(found[1].attrs.get_str(keys::COLOR), Some("red"));
    }

    #[test]
    fn test_create_rejects_empty_range() {
        let doc = doc(vec![para("text")]);

        let created = create(&doc, AnnotationKind::Comment, 2..2, Attrs::new()).unwrap();

        assert!(created.is_none());
    }

    #[test]
    fn test_create_rejects_protected_only_range() {
        let doc = doc(vec![
            divider(SectionType::Toc),
            para("Contents"),
            divider(SectionType::MainText),
        ]);

        let created = create(&doc, AnnotationKind::Bookmark, 3..8, Attrs::new()).unwrap();

        assert!(created.is_none());
    }

    #[test]
    fn test_create_out_of_range() {
        let doc = doc(vec![para("text")]);

        let result = create(&doc, AnnotationKind::Comment, 2..40, Attrs::new());

        assert!(matches!(result, Err(RangeError::OutOfRange { .. })));
    }

    #[test]
    fn test_recolor_preserves_other_fields() {
        let id = AnnotationId::new();
        let mark = Mark::annotation(
            AnnotationKind::LemmaNote,
            id,
            Attrs::new().with(keys::COLOR, "red").with("note", "variant"),
        );
        let doc = doc(vec![para_runs(vec![marked("lemma", &[mark])])]);

        let tx = recolor(&doc, id, &Attrs::new().with(keys::COLOR, "green")).unwrap();

        let Step::AddMark { from, to, mark } = &tx.steps()[0] else {
            panic!("expected AddMark");
        };
        assert_eq!((*from, *to), (1, 6));
        assert_eq!(mark.attrs.get_str(keys::COLOR), Some("green"));
        assert_eq!(mark.attrs.get_str("note"), Some("variant"));
    }

    #[test]
    fn test_bulk_remove_collects_found_ids() {
        let kept = AnnotationId::new();
        let gone = AnnotationId::new();
        let missing = AnnotationId::new();
        let doc = doc(vec![para_runs(vec![
            marked("a", &[comment(gone, "red")]),
            marked("b", &[comment(kept, "red"), comment(gone, "red")]),
        ])]);

        let (tx, removed) = bulk_remove(&doc, &[gone, missing]);

        assert_eq!(tx.steps().len(), 2);
        assert_eq!(removed, vec![gone]);
    }

    #[test]
    fn test_recolor_category_skips_other_categories() {
        let notes = AnnotationId::new();
        let other = AnnotationId::new();
        let in_category = Mark::annotation(
            AnnotationKind::Comment,
            notes,
            Attrs::new().with(keys::CATEGORY, "review"),
        );
        let doc = doc(vec![para_runs(vec![
            marked("a", &[in_category]),
            marked("b", &[comment(other, "red")]),
            marked("c", &[Mark::new(MarkKind::Bold)]),
        ])]);

        let (tx, recolored) = recolor_category(&doc, AnnotationKind::Comment, "review", "#ff0");

        assert_eq!(recolored, vec![notes]);
        assert!(!tx.add_to_history());
    }
}
