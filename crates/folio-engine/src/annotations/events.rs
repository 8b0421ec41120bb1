use crate::model::{AnnotationId, AnnotationKind, Attrs};

/// Notification emitted after an annotation transaction has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationEvent {
    Created {
        kind: AnnotationKind,
        id: AnnotationId,
        /// Text covered by the new annotation
        text: String,
        /// Category the annotation was created under, if any
        category: Option<String>,
    },
    Recolored {
        id: AnnotationId,
        attrs: Attrs,
    },
    /// Only ids that actually had occurrences are listed
    Removed {
        ids: Vec<AnnotationId>,
    },
}

/// Observer of annotation changes
pub trait AnnotationListener {
    fn on_event(&mut self, event: &AnnotationEvent);
}

impl<F> AnnotationListener for F
where
    F: FnMut(&AnnotationEvent),
{
    fn on_event(&mut self, event: &AnnotationEvent) {
        self(event)
    }
}
