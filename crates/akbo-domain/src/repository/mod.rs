//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! ```text
//! Domain Layer          │  Adapter Layer
//! ──────────────────────┼────────────────────────
//! trait OutboxRepo      │  InMemoryOutboxRepo
//!   fn append()         │
//!   fn pending()        │
//! ```

pub mod outbox_repository;
