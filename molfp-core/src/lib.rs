//! Shared primitives and traits for the molfp fingerprinting workspace.
//!
//! `molfp-core` provides the foundation the other molfp crates build on:
//!
//! - **Error types**: [`MolfpError`] and [`Result`] for structured error handling
//! - **Traits**: small descriptive abstractions like [`Annotated`] and [`Summarizable`]

pub mod error;
pub mod traits;

pub use error::{MolfpError, Result};
pub use traits::*;
