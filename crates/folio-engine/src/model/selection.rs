use serde::{Deserialize, Serialize};

use crate::transform::{Bias, Mapping};

/// Selected range `[from, to]`; `from == to` is a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    pub from: usize,
    pub to: usize,
}

impl Selection {
    /// Build a selection from two ends in either order
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            from: anchor.min(head),
            to: anchor.max(head),
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.from..self.to
    }

    /// Map both ends through a transaction's mapping
    pub fn map(&self, mapping: &Mapping) -> Self {
        if self.is_empty() {
            return Self::cursor(mapping.map(self.from, Bias::After));
        }
        Self::new(
            mapping.map(self.from, Bias::After),
            mapping.map(self.to, Bias::Before),
        )
    }

    pub fn clamp(&self, size: usize) -> Self {
        Self::new(self.from.min(size), self.to.min(size))
    }
}

impl From<std::ops::Range<usize>> for Selection {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
