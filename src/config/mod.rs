//! Configuration module for fairshare
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FairsharePaths;
pub use settings::{MissingPersonMode, Settings};
