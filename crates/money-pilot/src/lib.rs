//! Personal financial planning: readiness scoring, goal contribution solving,
//! asset allocation, and the wizard/persistence/advisory plumbing around them.

pub mod config;
pub mod error;
pub mod planning;
pub mod telemetry;
