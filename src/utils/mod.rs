//! Utility helpers used throughout board-deploy

pub mod logging;
