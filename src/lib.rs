//! Tea Admin Library
//!
//! Back-office client for a tea-production business. Each record collection
//! (employees, suppliers, inventory, quality checks, sales, products and
//! system users) is mirrored by a [`ResourcePanel`] that talks to the REST
//! backend through an [`ApiClient`].
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod panel;
pub mod profile;
pub mod resource;
pub mod session;
pub mod shell;
pub mod validation;

pub use client::ApiClient;
pub use config::{init_tracing, load_config, AdminConfig, AdminConfigError};
pub use errors::{AdminError, AdminResult};
pub use panel::{AutoConfirm, ConfirmDelete, ResourcePanel};
pub use resource::{Resource, ResourceKind, SyncPolicy};
pub use session::{SessionStore, StoredSession};
pub use shell::{NavigationShell, Route};
