pub mod attendance;
pub mod auth;
pub mod profile;
pub mod subjects;
