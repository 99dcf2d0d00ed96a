//! Interactive session over the lineage service.
//!
//! The controller owns the menu loop and the five remote flows; prompt I/O and
//! text rendering live in their own modules so the controller can be driven by
//! scripted input in tests.

mod controller;
mod prompt;
mod render;
mod requests;

pub use controller::Session;
