//! Inbound Adapters - Entry points into the application

pub mod http;
