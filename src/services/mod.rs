pub mod auth_service;
pub mod authorization;
pub mod course_service;
pub mod enrollment_service;
pub mod match_service;

#[cfg(test)]
pub mod fixtures;

pub use authorization::{Authorizer, Capability};
