//! # gamevault
//!
//! A remote CRUD service over a collection of videogame records:
//! - One JSON document on disk, loaded once at startup
//! - Full-document persistence after every mutation (write-then-rename)
//! - Every call serialized through a single lock, persistence included
//! - TCP-based client protocol with service lookup by name
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (acceptor + worker pool)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 VideogameService                             │
//! │      list / get / create / update / delete  (Mutex)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ RecordTable │          │  Document   │
//!   │ + IdGen     │          │ (JSON file) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod store;
pub mod ids;
pub mod service;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, VaultError};
pub use config::{Config, IdStrategy};
pub use record::{RecordId, Videogame};
pub use service::VideogameService;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of gamevault
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
