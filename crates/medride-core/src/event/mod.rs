//! Event bus for service lifecycle notifications.
//!
//! Provides an `EventBus` that distributes `ServiceEvent` messages to all
//! subscribers via a `tokio::sync::broadcast` channel.

pub mod bus;

pub use bus::EventBus;
