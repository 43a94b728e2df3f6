//! Secret providers: environment variables and a flat `secrets.toml` file.

pub mod chain;
pub mod env;
pub mod file;
