//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from akbo-domain.

pub mod in_memory;
