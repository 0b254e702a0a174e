//! Settings for the rooted simulation.
//!
//! Every tunable of world generation, growth, scoring and progression lives
//! in one [`Config`] persisted as `config.ron`. Missing sections fall back to
//! defaults, and CLI flags override individual fields.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, SimulationConfig, default_config_dir};
pub use error::ConfigError;
