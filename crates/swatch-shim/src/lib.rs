//! # Swatch Shim
//!
//! In-memory stand-ins for browser-only capabilities, so code that expects
//! them can be tested outside a browser:
//!
//! - local and session storage ([`MemoryStorage`])
//! - an indexed-database factory whose operations do nothing ([`FakeIndexedDb`])
//! - a connectivity flag ([`Navigator`])
//! - an error-log spy ([`ErrorSpy`])
//!
//! Use [`TestEnvironment::setup`] at the start of each test to get a clean
//! view of them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod console;
pub mod environment;
pub mod indexed_db;
pub mod navigator;
pub mod storage;

pub use console::ErrorSpy;
pub use environment::{Environment, TestEnvironment};
pub use indexed_db::{FakeIndexedDb, IdbCall, IdbRequest};
pub use navigator::Navigator;
pub use storage::{MemoryStorage, StorageCall, StorageKind};
