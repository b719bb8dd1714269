//! Configuration assembly for the CLI.
//!
//! Values are resolved per key with the precedence: command-line flag, then
//! `--set KEY=VALUE` overrides, then the TOML config file, then the library
//! defaults.

mod builder;
mod file;

pub use builder::build_config;
