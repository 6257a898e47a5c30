//! Server-side error types.

pub mod error;

pub use error::*;
