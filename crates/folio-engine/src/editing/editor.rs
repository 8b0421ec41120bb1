use std::ops::Range;

use folio_config::{CategoryConfig, Config, StyleDefaults};

use crate::annotations::{self, AnnotationEvent, AnnotationListener, AnnotationSummary};
use crate::editing::{EditorError, Patch};
use crate::emphasis::{self, EmphasisState};
use crate::lists::{self, ListError};
use crate::model::{
    AnnotationId, AnnotationKind, Attrs, Document, Mark, MarkKind, Node, RangeError, Selection,
    keys,
};
use crate::sections;
use crate::transform::{History, HistoryEntry, Step, Transaction};

/// Owns a document and its editing state.
///
/// Every mutation goes through [`Editor::apply`], which applies a transaction
/// atomically, updates the selection, records history and bumps the version.
/// Queries read the current snapshot without mutating it.
pub struct Editor {
    doc: Document,
    selection: Selection,
    /// Incremented on every applied transaction, undo and redo
    version: u64,
    history: History,
    defaults: StyleDefaults,
    categories: Vec<CategoryConfig>,
    listeners: Vec<Box<dyn AnnotationListener>>,
    /// Range to scroll into view on the next frame; a new request replaces it
    pending_scroll: Option<Range<usize>>,
}

impl Editor {
    pub fn new(doc: Document) -> Self {
        Self::with_config(doc, &Config::default())
    }

    pub fn with_config(doc: Document, config: &Config) -> Self {
        Self {
            doc,
            selection: Selection::cursor(0),
            version: 0,
            history: History::new(config.history.max_depth),
            defaults: config.defaults.clone(),
            categories: config.categories.clone(),
            listeners: Vec::new(),
            pending_scroll: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn add_listener(&mut self, listener: impl AnnotationListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a transaction atomically.
    ///
    /// On failure the document, selection, history and version are untouched.
    pub fn apply(&mut self, tx: Transaction) -> Result<Patch, EditorError> {
        let applied = tx.apply_to(&self.doc)?;
        let size = applied.doc.size();
        let new_selection = match tx.selection() {
            Some(selection) => selection.clamp(size),
            None => self.selection.map(&applied.mapping).clamp(size),
        };

        let previous = std::mem::replace(&mut self.doc, applied.doc);
        if tx.add_to_history() && !tx.is_empty() {
            self.history.record(HistoryEntry {
                doc: previous,
                selection: self.selection,
                label: tx.label().map(str::to_string),
            });
        }
        self.selection = new_selection;
        self.version += 1;

        log::trace!(
            "Applied {} step(s) ({}), version {}",
            tx.steps().len(),
            tx.label().unwrap_or("unlabelled"),
            self.version
        );

        Ok(Patch {
            changed: applied.changed,
            new_selection,
            version: self.version,
        })
    }

    pub fn undo(&mut self) -> Option<Patch> {
        let current = HistoryEntry {
            doc: self.doc.clone(),
            selection: self.selection,
            label: None,
        };
        let entry = self.history.undo(current)?;
        Some(self.restore(entry))
    }

    pub fn redo(&mut self) -> Option<Patch> {
        let current = HistoryEntry {
            doc: self.doc.clone(),
            selection: self.selection,
            label: None,
        };
        let entry = self.history.redo(current)?;
        Some(self.restore(entry))
    }

    fn restore(&mut self, entry: HistoryEntry) -> Patch {
        self.doc = entry.doc;
        self.selection = entry.selection.clamp(self.doc.size());
        self.version += 1;
        Patch {
            changed: vec![0..self.doc.size()],
            new_selection: self.selection,
            version: self.version,
        }
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), RangeError> {
        self.doc.check_range(selection.from, selection.to)?;
        self.selection = selection;
        Ok(())
    }

    /// Replace the selection with `text`, inheriting the formatting marks of
    /// the run before the cursor. Ignored inside the protected section.
    pub fn insert_text(&mut self, text: &str) -> Result<Option<Patch>, EditorError> {
        let Selection { from, to } = self.selection;
        if let Some(protected) = sections::protected_range(&self.doc)
            && protected.start < from
            && from < protected.end
        {
            log::debug!("Ignoring text input inside the protected section at {from}");
            return Ok(None);
        }

        let marks = self.formatting_marks_at(from)?;
        let mut tx = Transaction::new().with_label("typing");
        if from < to {
            tx.push(Step::Delete { from, to });
        }
        tx.push(Step::InsertText {
            at: from,
            text: text.to_string(),
            marks,
        });
        let tx = tx.with_selection(Selection::cursor(from + text.chars().count()));
        self.apply(tx).map(Some)
    }

    /// Add a formatting mark to the selection, or remove it when every
    /// selected run already carries it. No-op on a collapsed cursor.
    pub fn toggle_mark(&mut self, kind: MarkKind) -> Result<Option<Patch>, EditorError> {
        if kind.is_annotation() {
            return Err(EditorError::AnnotationMark(kind));
        }
        let Selection { from, to } = self.selection;
        if from == to {
            return Ok(None);
        }

        let mut any_run = false;
        let mut all_marked = true;
        self.doc.nodes_between(from, to, |node, _, _, _| {
            if let Node::Text(run) = node {
                any_run = true;
                all_marked &= run.marks.iter().any(|mark| mark.kind == kind);
            }
            true
        });

        let mark = Mark::new(kind);
        let step = if any_run && all_marked {
            Step::RemoveMark { from, to, mark }
        } else {
            Step::AddMark { from, to, mark }
        };
        self.apply(Transaction::new().step(step).with_label("toggle mark"))
            .map(Some)
    }

    fn formatting_marks_at(&self, pos: usize) -> Result<Vec<Mark>, RangeError> {
        let resolved = self.doc.resolve(pos)?;
        let Some(textblock) = resolved.textblock() else {
            return Ok(Vec::new());
        };
        let offset = resolved.parent_offset;
        let lookup = if offset == 0 { 0..1 } else { offset - 1..offset };
        Ok(textblock
            .block
            .runs_between(lookup.start, lookup.end)
            .first()
            .map(|(_, run)| {
                run.marks
                    .iter()
                    .filter(|mark| !mark.kind.is_annotation())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    // ============ Emphasis ============

    /// Formatting summary of the current selection
    pub fn emphasis_state(&self) -> Result<EmphasisState, RangeError> {
        emphasis::emphasis_state(&self.doc, self.selection, &self.defaults)
    }

    // ============ Sections ============

    /// Delete `[from, to)` if it touches the protected section.
    ///
    /// Returns `false` when the range does not touch it and the caller should
    /// run its default deletion. Returns `true` whenever it does, even if
    /// nothing outside the protected section was deleted.
    pub fn handle_deletion(&mut self, from: usize, to: usize) -> Result<bool, EditorError> {
        let Some(plan) = sections::plan_protected_deletion(&self.doc, from, to)? else {
            return Ok(false);
        };
        let tx = plan.into_transaction(self.doc.size());
        if tx.is_empty() {
            if let Some(selection) = tx.selection() {
                self.selection = selection;
            }
            return Ok(true);
        }
        self.apply(tx)?;
        Ok(true)
    }

    // ============ Lists ============

    pub fn suggested_start_number(&self) -> Result<u32, ListError> {
        lists::suggested_start_number(&self.doc, self.selection.from)
    }

    /// Continue the numbering of the closest comparable earlier list
    pub fn continue_previous_numbering(&mut self) -> Result<Patch, EditorError> {
        let step = lists::continue_previous_numbering(&self.doc, self.selection.from)?;
        self.apply(Transaction::new().step(step).with_label("continue numbering"))
    }

    pub fn restart_numbering(&mut self) -> Result<Patch, EditorError> {
        let step = lists::restart_numbering(&self.doc, self.selection.from)?;
        self.apply(Transaction::new().step(step).with_label("restart numbering"))
    }

    // ============ Annotations ============

    /// Create an annotation over `range`.
    ///
    /// A `category` is recorded on the mark, and its configured color is used
    /// when `attrs` has none. Returns `Ok(None)` for an empty range.
    pub fn create_annotation(
        &mut self,
        kind: AnnotationKind,
        range: Range<usize>,
        attrs: Attrs,
        category: Option<&str>,
    ) -> Result<Option<AnnotationId>, EditorError> {
        let mut attrs = attrs;
        if let Some(category) = category {
            attrs.set(keys::CATEGORY, category);
            if !attrs.contains(keys::COLOR)
                && let Some(config) = self.categories.iter().find(|c| c.id == category)
            {
                attrs.set(keys::COLOR, config.color.as_str());
            }
        }

        let Some((id, tx)) = annotations::create(&self.doc, kind, range.clone(), attrs)? else {
            return Ok(None);
        };
        self.apply(tx)?;

        let text = self.doc.text_between(range.start, range.end);
        self.emit(AnnotationEvent::Created {
            kind,
            id,
            text,
            category: category.map(str::to_string),
        });
        Ok(Some(id))
    }

    pub fn locate_annotation(&self, id: AnnotationId) -> Option<Range<usize>> {
        annotations::locate(&self.doc, id)
    }

    pub fn annotations(&self, kind: AnnotationKind) -> Vec<AnnotationSummary> {
        annotations::annotations(&self.doc, kind)
    }

    /// Merge `update` into annotation `id`'s attributes. `false` when it no
    /// longer exists.
    pub fn recolor_annotation(&mut self, id: AnnotationId, update: &Attrs) -> Result<bool, EditorError> {
        let Some(tx) = annotations::recolor(&self.doc, id, update) else {
            return Ok(false);
        };
        self.apply(tx)?;
        self.emit(AnnotationEvent::Recolored {
            id,
            attrs: update.clone(),
        });
        Ok(true)
    }

    /// Remove every occurrence of `ids` in one transaction. Programmatic
    /// cleanup passes `add_to_history = false`.
    pub fn bulk_remove_annotations(
        &mut self,
        ids: &[AnnotationId],
        add_to_history: bool,
    ) -> Result<Vec<AnnotationId>, EditorError> {
        let (tx, removed) = annotations::bulk_remove(&self.doc, ids);
        if removed.is_empty() {
            log::debug!("None of {} annotation(s) found for removal", ids.len());
            return Ok(removed);
        }
        let tx = if add_to_history { tx } else { tx.without_history() };
        self.apply(tx)?;
        self.emit(AnnotationEvent::Removed {
            ids: removed.clone(),
        });
        Ok(removed)
    }

    /// Change a category's display color and recolor its annotations of
    /// `kind`, outside the undo history
    pub fn recolor_category(
        &mut self,
        kind: AnnotationKind,
        category: &str,
        color: &str,
    ) -> Result<Vec<AnnotationId>, EditorError> {
        if let Some(config) = self.categories.iter_mut().find(|c| c.id == category) {
            config.color = color.to_string();
        }

        let (tx, recolored) = annotations::recolor_category(&self.doc, kind, category, color);
        if recolored.is_empty() {
            return Ok(recolored);
        }
        self.apply(tx)?;

        let update = Attrs::new().with(keys::COLOR, color);
        for id in &recolored {
            self.emit(AnnotationEvent::Recolored {
                id: *id,
                attrs: update.clone(),
            });
        }
        Ok(recolored)
    }

    /// Request the annotation be scrolled into view. `false` when it no
    /// longer exists.
    pub fn scroll_to_annotation(&mut self, id: AnnotationId) -> bool {
        match self.locate_annotation(id) {
            Some(range) => {
                self.request_scroll_into_view(range);
                true
            }
            None => false,
        }
    }

    // ============ Deferred effects ============

    /// Schedule a scroll for the next frame, replacing any pending request
    pub fn request_scroll_into_view(&mut self, range: Range<usize>) {
        if let Some(previous) = self.pending_scroll.replace(range) {
            log::trace!("Replacing pending scroll to {previous:?}");
        }
    }

    /// Drain the pending scroll request
    pub fn take_pending_scroll(&mut self) -> Option<Range<usize>> {
        self.pending_scroll.take()
    }

    fn emit(&mut self, event: AnnotationEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}
