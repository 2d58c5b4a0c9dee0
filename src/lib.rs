//! Reviewroster: pull request reviewer assignment.
//!
//! This crate assigns reviewers to pull requests from the author's team,
//! replaces reviewers on request, and moves open reviews off a team when the
//! whole team is deactivated.
//!
//! # Architecture
//!
//! Reviewroster follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`directory`]: Teams, users, and the user activity flag
//! - [`review`]: Pull request lifecycle and reviewer selection
//! - [`error`]: Caller-facing error codes
//! - [`config`]: Environment-driven database settings
//! - [`storage`]: Connection pool bootstrap and schema setup

pub mod config;
pub mod directory;
pub mod error;
pub mod review;
pub mod storage;
