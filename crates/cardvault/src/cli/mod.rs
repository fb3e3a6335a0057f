//! # CLI Behavior
//!
//! This is **one possible UI client** for cardvault, not the application itself.
//! It is the only place that knows about terminal I/O, exit codes and output
//! formatting.
//!
//! ## Defaults
//!
//! - Running `cardvault` with no arguments lists the collection.
//! - `--json` switches every command to machine-readable output on stdout.
//! - Log output goes to stderr. The filter is `RUST_LOG` if set, else `debug`
//!   with `--verbose`, else the configured `log_level`.
//!
//! ## Editing
//!
//! `cardvault edit <id> --hp 90` follows the same flow as the card editor: the
//! card is loaded into the session, the given fields are merged over it and the
//! result is saved. Fields not given keep their values.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `render`: Output formatting (lists, card details, stats, messages)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
