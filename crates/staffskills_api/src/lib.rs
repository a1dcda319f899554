//! HTTP surface for the StaffSkills backend.
//!
//! Routes `/api/v1/persons` onto `PersonService`, one SQLite connection per
//! request.

pub mod api;
pub mod error;

pub use api::{router, serve, serve_with_shutdown, AppState, HealthResponse};
pub use error::{ApiError, ErrorBody};
