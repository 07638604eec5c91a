//! Layered run configuration: built-in defaults, an optional TOML file, `--set`
//! overrides, then explicit command-line flags, in increasing precedence.

pub mod builder;
pub mod defaults;
pub mod file;

pub use builder::{RunSettings, StoreBackend, StoreSettings};
pub use file::FileConfig;
