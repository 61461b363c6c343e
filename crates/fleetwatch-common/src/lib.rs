//! Shared types for the fleetwatch notification engine.
//!
//! Snapshots flow in from the dashboard feeds, notifications flow out to the
//! feed store. Both crates on either side of the rule engine depend on the
//! definitions here.

pub mod format;
pub mod id;
pub mod types;
