//! vows-core library: the wedding guest registry.
//!
//! [`store::GuestStore`] holds the guest list and mediates every change,
//! keeping a pluggable [`backend::Backend`] in step with it.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per concern, each mapping to an
//!   [`error::ErrorCode`]; `anyhow::Result` at the config boundary.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod backend;
pub mod config;
pub mod error;
pub mod import;
pub mod lock;
pub mod model;
pub mod storage;
pub mod store;
pub mod table;
pub mod validate;
pub mod view;

pub use backend::{Backend, BackendKind, LocalBackend, RemoteBackend, StoreError};
pub use model::{Guest, GuestDraft, GuestId};
pub use store::{GuestStore, Outcome, Snapshot, SubscriptionId};
