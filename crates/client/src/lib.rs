//! Headless client for the portfolio tracker API.
//!
//! [`ApiClient`] is a thin typed wrapper over the HTTP routes. [`Portfolio`]
//! holds the three client-side caches (projects, completion flags,
//! uploads), applies mutations to them, and derives the rows and progress
//! numbers a UI renders.

pub mod api;
pub mod error;
pub mod form;
pub mod portfolio;
pub mod view;

pub use api::ApiClient;
pub use error::{ClientError, ClientResult};
pub use form::ProjectForm;
pub use portfolio::{PendingToggle, Portfolio};
pub use view::{ModuleRow, ProjectRow};
