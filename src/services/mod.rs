// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod entity_service;
pub mod place_service;
pub mod stats_service;

pub use entity_service::*;
pub use place_service::*;
pub use stats_service::*;
