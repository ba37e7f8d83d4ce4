//! Runs candidate code against its test code in a bounded, isolated
//! environment: hard timeout, output cap, a temp directory scrubbed on
//! exit, no network access.

pub mod error;
pub mod exec;
pub mod options;
pub mod result;
pub mod runner;
pub mod runners;
pub mod sandbox;

pub use error::{Error, Result};
pub use options::SandboxOptions;
pub use result::{SandboxResult, Signal};
pub use runner::LanguageRunner;
pub use sandbox::Sandbox;
