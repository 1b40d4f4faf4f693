use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::share::ShareConfig;

/// Runtime configuration.
///
/// Layered lowest to highest precedence: built-in defaults, a TOML file
/// (`portdrop.toml` unless overridden on the command line), then
/// `PORTDROP_*` environment variables.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,
    /// Directory uploaded files are staged in until served.
    pub upload_dir: PathBuf,
    /// Inclusive transfer-code range; codes double as TCP ports.
    pub code_min: u16,
    pub code_max: u16,
    /// Allocation retries before reporting the range exhausted.
    pub max_attempts: usize,
    /// Optional bound on how long a worker waits for a peer to connect.
    pub accept_timeout_secs: Option<u64>,
    /// Upload body size cap.
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            upload_dir: default_upload_dir(),
            code_min: 1000,
            code_max: 9999,
            max_attempts: 256,
            accept_timeout_secs: None,
            max_upload_bytes: 1024 * 1024 * 1024, // 1 GiB
        }
    }
}

impl Config {
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file.unwrap_or_else(|| Path::new("portdrop.toml"))))
            .merge(Env::prefixed("PORTDROP_"));

        let config: Config = figment.extract().context("invalid configuration")?;
        anyhow::ensure!(
            config.code_min <= config.code_max,
            "code_min ({}) must not exceed code_max ({})",
            config.code_min,
            config.code_max
        );
        Ok(config)
    }

    pub fn share_config(&self) -> ShareConfig {
        ShareConfig {
            code_min: self.code_min,
            code_max: self.code_max,
            max_attempts: self.max_attempts,
            accept_timeout: self.accept_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    ProjectDirs::from("com", "portdrop", "portdrop")
        .map(|dirs| dirs.data_dir().join("uploads"))
        .unwrap_or_else(|| PathBuf::from("uploads"))
}
