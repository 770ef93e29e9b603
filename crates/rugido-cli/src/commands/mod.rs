//! CLI command implementations.

pub mod devices;
pub mod garage;
pub mod render;
pub mod ride;
