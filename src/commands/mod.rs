//! CLI commands for xunit-convert
//!
//! - **convert**: convert MSTest attributes in C# documents (dry-run by default)
//! - **init**: write a default xunit-convert.toml
//! - **converters**: list the converter pipeline
//!
//! Commands that read configuration accept `&ProjectContext` so it loads once.

pub mod convert;
pub mod converters;
pub mod init;

pub use convert::run_convert;
pub use converters::run_converters;
pub use init::run_init;
