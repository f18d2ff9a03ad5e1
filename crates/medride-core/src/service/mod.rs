//! Business logic services (use cases).
//!
//! The registry orchestrates repository calls, lifecycle rules, display
//! numbering, date formatting and the newly-added designation. It depends on
//! traits (ports) -- never on concrete infrastructure implementations.

pub mod highlight;
pub mod numbering;
pub mod registry;
pub mod schedule;
