//! Shared domain types for MedRide.
//!
//! This crate contains the core domain types used across the MedRide
//! scheduling back end: service records and their lifecycle status,
//! authorizations, lifecycle events, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod authorization;
pub mod config;
pub mod error;
pub mod event;
pub mod service;
