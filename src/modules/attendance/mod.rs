//! Attendance sessions, rotating QR tokens and attendance records.

pub mod controller;
pub mod router;
pub mod service;
pub mod token;

pub use router::init_attendance_router;
