//! Projection, sorting and export of loaded record batches.
//!
//! Everything here is synchronous and side-effect free except the exporter,
//! which writes a file when the user asks for it.
//!
//! ## Projection
//!
//! `project` turns a record batch into table rows and a films chart series.
//! It is re-run on every accepted batch; nothing is patched in place.
//!
//! ## Sorting
//!
//! `TableSort` reorders rows client-side through an index vector. It never
//! triggers a fetch.

mod export;
mod projector;
mod table_sort;

pub use export::*;
pub use projector::*;
pub use table_sort::*;
