//! # Swatch Core
//!
//! Core types shared across the Swatch workspace.
//!
//! This crate provides:
//! - The group resource and its validated request schemas
//! - Environment bindings injected into the HTTP router
//! - The common error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bindings;
pub mod error;
pub mod group;

pub use bindings::{Bindings, DatabaseHandle, InMemorySessionStore, SessionStore};
pub use error::{Error, Result};
pub use group::{is_hex_color, CreateGroup, Group, GroupId, UpdateGroup};
