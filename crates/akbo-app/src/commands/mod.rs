//! CLI Commands

pub mod serve;
pub mod task;

pub use serve::ServeCommand;
pub use task::TaskCommand;
