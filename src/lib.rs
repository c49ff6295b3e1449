pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::client::{ApiResponse, SubwayClient};
pub use config::{toml_config::TomlConfig, ServerSettings};
pub use core::acceptance::{AcceptanceSuite, Scenario};
pub use core::server::{LineServer, RunningServer};
pub use utils::error::{Result, SubwayError};
