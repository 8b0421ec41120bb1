//! Structural edits and their position mapping.
//!
//! - **`step`**: the individual edits a transaction is made of
//! - **`mapping`**: how positions move through those edits
//! - **`transaction`**: atomic bundles of steps plus a selection
//! - **`history`**: undo/redo snapshots of history-tagged transactions

pub mod history;
pub mod mapping;
pub mod step;
pub mod transaction;

pub use history::{History, HistoryEntry};
pub use mapping::{Bias, Mapping, StepMap};
pub use step::{Step, StepError};
pub use transaction::{Applied, Transaction};
