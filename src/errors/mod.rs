//! Error types for board-deploy

pub mod types;

pub use types::*;
