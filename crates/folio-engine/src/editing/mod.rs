/*!
 * # Editing Core Module
 *
 * The command surface a UI talks to. Commands come in, transactions are applied,
 * patches and annotation notifications go out.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Owner of State
 * - **`Editor`** owns the document, the selection, the version counter and the
 *   undo history
 * - There is exactly one mutator at a time; UI events are serialized by the host
 *
 * ### 2. Transaction-Based Editing
 * - Every command compiles to one **`Transaction`** of structural steps
 * - Transactions apply atomically: a failing step rejects the whole transaction
 * - Transactions can be kept out of the undo history for programmatic bookkeeping
 *
 * ### 3. Read-Only Queries
 * - Locating annotations, suggesting list numbers and resolving emphasis state
 *   read the current snapshot and never mutate it
 *
 * ### 4. Observers Instead of Events
 * - Annotation changes are reported to registered **`AnnotationListener`**s with
 *   typed payloads
 *
 * ## Module Structure
 *
 * - **`editor`**: `Editor` and its commands
 * - **`patch`**: result metadata of an applied transaction
 * - **`error`**: `EditorError`
 *
 * ## Usage Pattern
 *
 * ```rust
 * use folio_engine::editing::Editor;
 * use folio_engine::model::{AnnotationKind, Attrs, Selection, build::*};
 *
 * let mut editor = Editor::new(doc(vec![para("Hello world")]));
 *
 * // Create a comment over "Hello"
 * let id = editor
 *     .create_annotation(AnnotationKind::Comment, 1..6, Attrs::new(), None)
 *     .unwrap()
 *     .unwrap();
 * assert_eq!(editor.locate_annotation(id), Some(1..6));
 *
 * // Typing maps the annotation along with the text
 * editor.set_selection(Selection::cursor(1)).unwrap();
 * editor.insert_text(">> ").unwrap();
 * assert_eq!(editor.locate_annotation(id), Some(4..9));
 * ```
 */

pub mod editor;
pub mod error;
pub mod patch;

pub use editor::Editor;
pub use error::EditorError;
pub use patch::Patch;
