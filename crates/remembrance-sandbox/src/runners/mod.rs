//! Built-in runners for every language in the closed set.

mod compiled;
mod scripted;

pub use compiled::{CRunner, CppRunner, GoRunner, JavaRunner, RustRunner};
pub use scripted::{JavaScriptRunner, PythonRunner, TypeScriptRunner};
