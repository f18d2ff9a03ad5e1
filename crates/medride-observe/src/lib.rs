//! Observability setup for MedRide: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
