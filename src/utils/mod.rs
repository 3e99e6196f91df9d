//! Utility modules

pub mod auth;
pub mod dates;
pub mod validation;
