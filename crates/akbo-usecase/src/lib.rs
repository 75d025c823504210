//! # Akbo Use Case Layer
//!
//! Application-specific business rules.
//! This layer orchestrates the flow of data between the domain and adapters.

pub use akbo_domain;

pub mod record_events;

pub use record_events::{EventRecorder, RecordError};
