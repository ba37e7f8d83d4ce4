//! The safety gate: a registry of named principles, each an ordered list
//! of regex rules, checked against submitted code before anything else
//! runs. Fails closed — an unrecognised ambiguous construct is the
//! caller's problem to narrow the principle for, not the gate's to guess
//! past.

pub mod builtins;
pub mod gate;
pub mod principle;

pub use gate::{CheckOutcome, SafetyGate, Violation};
pub use principle::{Principle, Rule, Severity};
