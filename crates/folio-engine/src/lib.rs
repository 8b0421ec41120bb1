pub mod annotations;
pub mod editing;
pub mod emphasis;
pub mod lists;
pub mod model;
pub mod sections;
pub mod transform;

// Re-export key types for easier usage
pub use annotations::{AnnotationEvent, AnnotationListener, AnnotationSummary};
pub use editing::{Editor, EditorError, Patch};
pub use emphasis::{Alignment, EmphasisState};
pub use lists::{ListContext, ListError};
pub use model::*;
pub use sections::{DeletionPlan, Section};
pub use transform::{Bias, Mapping, Step, StepError, Transaction};
