// Intervention Coordination Platform - API Core
//
// This crate provides the backend core for coordinating maintenance
// interventions between managers, tenants and service providers.
// Architecture follows domain-driven design: models own the SQL, actions
// own the business rules, effects run post-commit via the outbox.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
