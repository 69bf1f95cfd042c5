//! # ClassCue API
//!
//! Classroom attendance tracking built with Rust, Axum, and PostgreSQL.
//! Teachers open an attendance session for a subject and display a QR code
//! that rotates every few seconds; students scan it to mark themselves
//! present.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── classcue-core/    # AppError, pagination, password hashing
//! ├── classcue-config/  # JWT, CORS, rate limit and attendance settings
//! ├── classcue-db/      # Pool setup and migrations
//! ├── classcue-auth/    # JWT claims
//! └── classcue-models/  # Typed ids, entities and DTOs
//! src/
//! ├── middleware/       # Auth and role extractors, rate limiting
//! ├── modules/          # Feature modules
//! │   ├── auth/         # Registration, login, token refresh
//! │   ├── profile/      # Own profile read and update
//! │   ├── subjects/     # Subject catalog
//! │   └── attendance/   # Sessions, QR rotation, attendance records
//! └── utils/            # QR rendering
//! ```
//!
//! Each feature module has a `controller.rs` (HTTP handlers), `service.rs`
//! (business logic over `&PgPool`) and `router.rs`.
//!
//! ## Attendance flow
//!
//! 1. A teacher creates a session (`POST /api/attendance/sessions`).
//! 2. The teacher's screen polls `GET /api/attendance/sessions/{id}/qr`. A new
//!    token is issued whenever the previous one has expired
//!    (`QR_TOKEN_TTL_SECONDS`, 10 by default).
//! 3. Students post the scanned token to `POST /api/attendance/mark`. A student
//!    is recorded at most once per session.
//! 4. The teacher ends the session; no further tokens are served or accepted.
//!
//! ## Modules
//!
//! - [`docs`]: OpenAPI documentation setup
//! - [`logging`]: Tracing subscriber and request logging
//! - [`metrics`]: Prometheus metrics
//! - [`middleware`]: Authentication, authorization and rate limiting
//! - [`modules`]: Feature modules
//! - [`router`]: Main application router
//! - [`state`]: Shared application state
//! - [`utils`]: QR code rendering
//! - [`validator`]: Request validation

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use classcue_auth;
pub use classcue_config;
pub use classcue_core;
pub use classcue_db;
pub use classcue_models;
