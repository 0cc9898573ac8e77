//! Client-side core of the Taskora study assistant.
//!
//! Two units, factored out of the UI so they carry a testable contract:
//!
//! - [`ApiClient`]: authenticated HTTP calls against the Taskora REST
//!   backend, with a fixed request timeout and at-most-one automatic
//!   refresh-and-retry when the access token is rejected.
//! - [`slots`]: pure aggregation of schedule free-slot records into
//!   day-grouped, duration-annotated view models.
//!
//! Credentials live behind the [`TokenStore`] trait; production code uses
//! the file-backed store, tests inject an in-memory one.

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod schedules;
pub mod slots;
pub mod token_store;
pub mod types;

pub use client::ApiClient;
pub use config::Config;
pub use error::{ApiError, Result};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
