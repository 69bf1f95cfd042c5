//! # ClassCue Models
//!
//! Database entities, request/response DTOs and typed identifiers.
//!
//! - [`ids`]: `Uuid` newtypes per entity
//! - [`value_types`]: validated primitives ([`Email`], [`EnrollmentNumber`])
//! - [`users`]: users and the [`UserRole`] enum
//! - [`profiles`]: student and teacher profiles
//! - [`subjects`]: the subject catalog
//! - [`attendance`]: attendance sessions, QR tokens and records
//! - [`auth`]: registration, login and refresh payloads

pub mod attendance;
pub mod auth;
pub mod ids;
pub mod profiles;
pub mod subjects;
pub mod users;
pub mod value_types;

pub use ids::{AttendanceRecordId, AttendanceSessionId, SubjectId, UserId};
pub use users::{User, UserResponse, UserRole};
pub use value_types::{Email, EnrollmentNumber, ValueTypeError};
