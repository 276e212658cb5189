//! CLI module exports.

pub mod update;

pub use update::*;
