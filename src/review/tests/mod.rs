//! Unit tests for the review module.
//!
//! Tests are organised by layer: the pull request aggregate, the in-memory
//! adapter, the lifecycle engine, and the deactivation orchestrator.
