//! # CLI Behavior
//!
//! One UI client for the contacts library. The CLI is the only place that
//! knows about terminal I/O, exit codes, and output formatting.
//!
//! ### Naked Execution (`contacts`)
//!
//! Running `contacts` with no arguments defaults to `contacts list`.
//!
//! ### Ids
//!
//! Commands taking an id accept the full UUID or any prefix that matches
//! exactly one contact, so the 8-character short ids printed by `list` work.
//!
//! ### First Run
//!
//! When the contacts file does not exist, the store seeds it with the
//! built-in sample contacts (unless `seed_defaults = false`).
//!
//! ## Module Structure
//!
//! - `commands`: Store wiring, dispatch, per-command handlers
//! - `render`: Output formatting (grouped list, detail view)
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
