//! Career Common - shared types, storage and progress logic for careerd.
//!
//! Everything the daemon and the CLI agree on lives here: the domain model,
//! the SQLite store, the progress reconciliation engine and the presentation
//! views built on top of it.

pub mod error;
pub mod i18n;
pub mod modules;
pub mod progress;
pub mod store;
pub mod sync;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::CareerError;
pub use modules::{ModuleCatalog, NoModules, StaticModuleCatalog};
pub use progress::{ProgressEngine, SolveSummary};
pub use store::CareerStore;
pub use types::*;
