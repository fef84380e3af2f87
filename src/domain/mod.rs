//! Domain layer - manifests and port definitions
//!
//! This module defines the objects the sequencer creates and the traits
//! (ports) that cluster and terminal adapters implement.

pub mod manifest;
pub mod ports;

pub use manifest::*;
pub use ports::*;
