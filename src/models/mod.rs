//! Data models and types used throughout board-deploy

pub mod board;
pub mod deployment;
pub mod events;

// Re-export commonly used types
pub use board::*;
pub use deployment::*;
pub use events::*;
