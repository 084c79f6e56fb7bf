//! Error types for the Inkwell script extraction core.
//!
//! This crate provides the error taxonomy shared by every Inkwell crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The interactive pipeline turns provider, response and grounding errors into
//! warnings; the batch storyboard pipeline surfaces them as a single hard failure.
//!
//! # Examples
//!
//! ```
//! use inkwell_error::{ConfigError, InkwellResult};
//!
//! fn load_credentials() -> InkwellResult<String> {
//!     Err(ConfigError::new("no provider API key set"))?
//! }
//!
//! match load_credentials() {
//!     Ok(key) => println!("Got: {}", key),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod coverage;
mod error;
mod grounding;
mod json;
mod provider;
mod response;
mod storage;

pub use config::ConfigError;
pub use coverage::{CoverageError, CoverageErrorKind, UnitRef};
pub use error::{InkwellError, InkwellErrorKind, InkwellResult};
pub use grounding::{GroundingError, GroundingErrorKind};
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use response::{ResponseFormatError, ResponseFormatErrorKind};
pub use storage::{StorageError, StorageErrorKind};
