//! # cardvault CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, and this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/cardvaultapp/`: Core library (storage, backup mirror, reconciliation,
//!   import/export), UI-agnostic
//! - `crates/cardvault/`: This CLI, one client of the library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/cardvault/src/cli/)                      │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring, logging, dispatch (commands.rs)          │
//! │  - Terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/cardvaultapp/src/api.rs)                 │
//! │  - CardApi: the collection manager                          │
//! │  - Classified errors, structured results                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! One process is one session: reconciliation with the backup mirror runs once
//! at startup, then the requested command executes.
//!
//! ## Testing Approach
//!
//! - Library behavior is tested in `cardvaultapp`.
//! - `render.rs` is tested with canned records and colors off.
//! - `tests/cli_e2e.rs` drives the built binary against a temp data dir.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
