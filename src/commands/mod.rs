//! Command implementations for the ocx CLI

pub mod add;
pub mod completions;
pub mod list;
