//! Team and user directory for reviewer assignment.
//!
//! The directory answers "who is on team T", "is user U active", and "what
//! team does U belong to", and owns the user activity flag that team
//! deactivation flips. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
