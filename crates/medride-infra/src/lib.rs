//! Infrastructure layer for MedRide.
//!
//! Contains implementations of the repository traits defined in `medride-core`
//! (in-memory storage), the authorization catalog, configuration loading and
//! the mock data the application starts from.

pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod memory;
