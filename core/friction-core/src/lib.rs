//! # friction-core
//!
//! Core library for the Friction client: session persistence, moment capture,
//! findings sync and review. Front ends (the CLI today) drive everything
//! through [`SyncController`].
//!
//! ## Design Principles
//!
//! - **Synchronous**: Blocking HTTP, no async runtime. One gesture runs to completion.
//! - **Not thread-safe**: The controller takes `&mut self`; front ends serialize gestures.
//! - **Graceful degradation**: A missing or corrupt session file is an empty session.
//! - **Server is authoritative**: Findings are re-fetched after every mutation, never patched.
//! - **One 401 path**: Any unauthorized response clears the token and the cache.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use friction_core::{HttpRemoteClient, SessionStore, StorageConfig, SyncController};
//!
//! let storage = StorageConfig::resolve().expect("home directory");
//! let config = friction_core::load_client_config(&storage);
//! let session = SessionStore::load(&storage.session_file());
//! let remote = HttpRemoteClient::new(&config)?;
//! let mut controller = SyncController::new(session, remote, &config, Box::new(opener));
//! controller.capture("checkout froze twice", CaptureSource::BulkPaste)?;
//! ```

pub mod config;
pub mod error;
pub mod findings;
pub mod limiter;
pub mod remote;
pub mod review;
pub mod session;
pub mod status;
pub mod storage;
pub mod sync;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{load_client_config, load_stored_client_config, save_client_config, ClientConfig};
pub use error::{Result, SyncError};
pub use findings::{FindingsCache, FindingsQuery, FindingsView, RecencyGroup};
pub use limiter::{Acquire, CaptureLimiter};
pub use remote::{HttpRemoteClient, RemoteApi, RemoteOutcome};
pub use review::{available_actions, ReviewOutcome};
pub use session::{SessionChange, SessionStore, Theme};
pub use status::{Badge, StatusLine, StatusMessage, Tone};
pub use storage::StorageConfig;
pub use sync::{RefreshOutcome, ReportOpener, ReportRun, SyncController};
pub use types::{CaptureSource, Connectivity, Finding, Moment};

pub use friction_protocol::{FindingStatus, ReviewAction, SourceType, StatusFilter};
