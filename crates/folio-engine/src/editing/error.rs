use thiserror::Error;

use crate::lists::ListError;
use crate::model::RangeError;
use crate::transform::StepError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("transaction rejected: {0}")]
    Step(#[from] StepError),

    #[error(transparent)]
    List(#[from] ListError),

    #[error("{0:?} is an annotation mark; use the annotation commands")]
    AnnotationMark(crate::model::MarkKind),
}
