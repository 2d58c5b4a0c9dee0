//! Pull request review assignment.
//!
//! This module owns the reviewer assignment and reassignment engine: picking
//! reviewers for a new pull request, replacing a reviewer who becomes
//! unavailable, and cascading replacement across every open pull request
//! when a whole team is deactivated. It follows hexagonal architecture:
//!
//! - Domain types and the pure reviewer selector in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The lifecycle engine and deactivation orchestrator in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
