//! # ClassCue Core
//!
//! Core types, errors, and utilities for the ClassCue API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination query parameters and response metadata
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Lenient deserializers for query-string parameters
//!
//! # Example
//!
//! ```ignore
//! use classcue_core::errors::AppError;
//! use classcue_core::password::hash_password;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Session not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
