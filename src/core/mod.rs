//! Core building blocks shared by every command
//!
//! - **config**: xunit-convert.toml parsing and validation
//! - **context**: project context built once in main and passed by reference
//! - **error**: error types with exit codes and contextual help messages
//! - **plan**: conversion plans, their ids and their human/JSON renderings

pub mod config;
pub mod context;
pub mod error;
pub mod plan;
