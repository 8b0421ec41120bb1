use crate::model::{Document, Selection};

use super::mapping::{Bias, Mapping};
use super::step::{Step, StepError};

/// An atomic bundle of steps plus an optional new selection.
///
/// Transactions either apply completely or not at all: steps run against a
/// working copy of the document and any failing step rejects the whole
/// transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    steps: Vec<Step>,
    selection: Option<Selection>,
    add_to_history: bool,
    label: Option<String>,
}

/// Result of applying a transaction to a document snapshot
#[derive(Debug, Clone)]
pub struct Applied {
    pub doc: Document,
    pub mapping: Mapping,
    /// Ranges touched by the steps, in final document coordinates
    pub changed: Vec<std::ops::Range<usize>>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            selection: None,
            add_to_history: true,
            label: None,
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Selection to set once the steps are applied. Without one, the current
    /// selection is mapped through the steps.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Keep this transaction out of the undo history (programmatic bookkeeping)
    pub fn without_history(mut self) -> Self {
        self.add_to_history = false;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn add_to_history(&self) -> bool {
        self.add_to_history
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Position mapping of all steps, computable before applying them
    pub fn mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();
        for step in &self.steps {
            mapping.push(step.map());
        }
        mapping
    }

    pub(crate) fn apply_to(&self, doc: &Document) -> Result<Applied, StepError> {
        let mut working = doc.clone();
        for (index, step) in self.steps.iter().enumerate() {
            step.apply(&mut working).inspect_err(|err| {
                log::warn!("Rejecting transaction at step {index} ({step:?}): {err}");
            })?;
        }

        let mapping = self.mapping();
        let changed = self
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let range = step.changed_range();
                mapping.map_from(index + 1, range.start, Bias::Before)
                    ..mapping.map_from(index + 1, range.end, Bias::After)
            })
            .collect();

        Ok(Applied {
            doc: working,
            mapping,
            changed,
        })
    }
}
