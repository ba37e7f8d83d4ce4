//! Core data model, error taxonomy, and capability interfaces shared by
//! every crate in the workspace. This crate has no dependency on any
//! other workspace member — it is the leaf everything else compiles
//! against.

pub mod constants;
pub mod entities;
pub mod error;
pub mod events;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
