//! scopeup - find the packages under an npm scope and update them in one npm call.

pub mod cli;
pub mod locator;
pub mod manifest;
pub mod npm;
pub mod progress;
pub mod scope;
pub mod updater;

pub use scope::Scope;
