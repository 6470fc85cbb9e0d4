//! Build log output
//!
//! Everything the build wants the user to read goes through an [`Emitter`].
//! Diagnostics for developers go through `tracing` instead.

mod output;

pub use output::{Emitter, SharedBuffer};
