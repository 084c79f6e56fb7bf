//! Trait definitions for Inkwell model providers.
//!
//! The extraction pipelines talk to external models only through
//! [`InkwellDriver`], so tests can substitute scripted drivers and callers can
//! plug in any provider.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::InkwellDriver;
