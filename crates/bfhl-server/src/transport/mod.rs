//! Transport layer for the BFHL API.

pub mod http;

pub use http::HttpTransport;
