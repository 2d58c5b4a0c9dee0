//! Step definitions for reviewer assignment BDD scenarios.

pub mod world;

mod given;
