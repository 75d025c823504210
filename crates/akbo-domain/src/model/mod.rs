//! Domain Models - The building blocks of akbo aggregates
//!
//! Concrete aggregates compose these types instead of inheriting from them.

pub mod domain_event;
pub mod entity;
pub mod timestamp;
pub mod value_object;
