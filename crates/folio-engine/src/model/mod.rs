//! Document tree, positions and marks.
//!
//! - **`node`**: block kinds, text runs, inline editing helpers
//! - **`mark`**: marks and annotation identity
//! - **`attrs`**: order-independent attribute maps
//! - **`document`**: the position-addressed tree with `resolve` / `nodes_between`
//! - **`position`**: resolved positions and range errors
//! - **`selection`**: selections and their mapping through edits
//! - **`build`**: constructors for assembling trees in code

pub mod attrs;
pub mod build;
pub mod document;
pub mod mark;
pub mod node;
pub mod position;
pub mod selection;

pub use attrs::{AttrValue, Attrs, keys};
pub use document::Document;
pub use mark::{AnnotationId, AnnotationKind, Mark, MarkKind};
pub use node::{Block, BlockKind, ListType, Node, SectionType, TextRun};
pub use position::{Ancestor, RangeError, ResolvedPos};
pub use selection::Selection;
