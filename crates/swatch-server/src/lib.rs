//! # Swatch Server
//!
//! HTTP API server exposing the group resource.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod extract;
pub mod groups;
pub mod server;

pub use extract::ValidatedJson;
pub use server::{AppState, Server, ServerConfig, GROUPS_PATH};
