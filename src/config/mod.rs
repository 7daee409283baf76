//! Configuration management for board-deploy

pub mod app_config;

pub use app_config::*;
