//! # cardvault Architecture
//!
//! cardvault keeps a personal collection of user-authored trading cards. This
//! crate is the **UI-agnostic core**: storage, recovery, and the operations a
//! collection UI needs. The `cardvault` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI client (the `cardvault` CLI, or anything else)          │
//! │  - Owns a SessionContext, renders results, exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - CardApi: the collection manager facade                   │
//! │  - Classifies every error into a user-facing kind           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs) + reconcile.rs               │
//! │  - Business logic, store-then-mirror mutation protocol      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore + BackupMirror behind DataStore              │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Stores, One Collection
//!
//! Every card lives in the record store, one record per id. After every
//! mutation the whole collection is also written as a single snapshot, the
//! backup mirror. If the record store is wiped or loses records, the next
//! session's reconciliation pass copies them back from the mirror.
//!
//! ## No I/O Assumptions in the Core
//!
//! Nothing in this crate prints or exits. Logging goes through `tracing`; the
//! client decides whether and where to install a subscriber.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`reconcile`]: Startup restore/migrate from the backup mirror
//! - [`session`]: Caller-owned session state
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Card records, forms and field coercion
//! - [`config`]: Configuration loading
//! - [`init`]: Context setup for clients
//! - [`error`]: Error types and classification

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod reconcile;
pub mod session;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
