//! Service lifecycle logic and repository trait definitions for MedRide.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, the lifecycle transition table, and the
//! [`ServiceRegistry`](service::registry::ServiceRegistry) that every
//! collaborator calls into. It depends only on `medride-types` -- never on
//! `medride-infra` or any storage crate.

pub mod event;
pub mod lifecycle;
pub mod repository;
pub mod service;
