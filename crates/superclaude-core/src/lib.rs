pub mod component;
pub mod config;
pub mod error;
pub mod files;
pub mod hooks;
pub mod installer;
pub mod io;
pub mod paths;
pub mod prompt;
pub mod scripts;
pub mod settings;
pub mod sycophancy;

#[cfg(test)]
mod test_support;

pub use error::{Result, SetupError};
