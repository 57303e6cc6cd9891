//! # Swatch Dev Server
//!
//! Frontend development server configuration: the framework plugins, import
//! path aliases, the dev server port, and the reverse-proxy rules that send
//! `/api` calls to the local backend.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod proxy;
pub mod server;

pub use config::{DevConfig, DevServerConfig, DEFAULT_CONFIG_FILE};
pub use proxy::ProxyRule;
pub use server::DevServer;
