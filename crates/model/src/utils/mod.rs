//! Internal utilities for the chat model.
//!
//! Timestamp parsing and field validation shared by the entity modules.

pub mod timestamp;
pub mod validation;

pub use validation::Validator;
