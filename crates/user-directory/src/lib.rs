//! Access to the remote user directory.
//!
//! The directory owns user identity data. This crate provides:
//! - [`UserDirectory`] trait for looking users up by id
//! - [`HttpUserDirectory`] talking to the directory over HTTP with a bounded timeout
//! - [`InMemoryUserDirectory`] for tests and local runs

pub mod directory;
pub mod error;
pub mod http;
pub mod memory;
pub mod user;

pub use directory::UserDirectory;
pub use error::{DirectoryError, Result};
pub use http::HttpUserDirectory;
pub use memory::InMemoryUserDirectory;
pub use user::UserSnapshot;
