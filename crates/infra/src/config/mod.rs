//! AdSync configuration sources
//!
//! `ADSYNC_*` environment variables take precedence; otherwise the first
//! JSON or TOML file found near the working directory or executable.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
