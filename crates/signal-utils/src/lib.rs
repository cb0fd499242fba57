//! Shared utilities for the forex signal bot
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-variable configuration helpers.

pub mod config;
pub mod logging;

pub use config::{EnvError, EnvSource, ProcessEnv};
pub use logging::{init_tracing, init_tracing_with_default};
