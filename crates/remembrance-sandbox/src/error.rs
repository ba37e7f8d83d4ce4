//! Error handling for sandboxed execution.

pub use remembrance_domain::{Error, Result};
