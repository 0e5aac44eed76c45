//! Domain types and pure logic for the portfolio tracker.
//!
//! Nothing in this crate performs I/O: the store, blob, API and client
//! crates all build on these types.

pub mod error;
pub mod module_key;
pub mod naming;
pub mod progress;
pub mod project;
pub mod types;
pub mod upload;
