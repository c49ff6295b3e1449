pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::domain::services::PaginationSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_bind_address, Validate};
use std::net::SocketAddr;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// Resolved runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub pagination: PaginationSettings,
}

impl ServerSettings {
    pub fn from_provider<C: ConfigProvider + Validate>(config: &C) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            bind: validate_bind_address("server.bind", config.bind_address())?,
            pagination: PaginationSettings {
                default_size: config.default_page_size(),
                max_size: config.max_page_size(),
            },
        })
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            pagination: PaginationSettings::default(),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "subway-lines")]
#[command(about = "HTTP service for subway line management")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Socket address to listen on, overrides `server.bind`
    #[arg(long)]
    pub bind: Option<String>,

    /// Overrides `pagination.default_size`
    #[arg(long)]
    pub default_page_size: Option<usize>,

    /// Overrides `pagination.max_size`
    #[arg(long)]
    pub max_page_size: Option<usize>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入配置檔並套用命令列覆蓋設定
    pub fn load(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                crate::utils::validation::validate_path("config", path)?;
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(size) = self.default_page_size {
            config.pagination.default_size = size;
        }
        if let Some(size) = self.max_page_size {
            config.pagination.max_size = size;
        }
        if self.json_logs {
            config.logging.format = "json".to_string();
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }

        Ok(config)
    }
}
