//! In-memory storage backends.
//!
//! The application keeps no state between runs, so these are the only
//! repository implementations.

pub mod service;

pub use service::InMemoryServiceRepository;
