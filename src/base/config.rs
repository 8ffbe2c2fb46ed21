//! Load configuration via `config` crate with env-override support.

use std::{
    collections::HashMap,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::anyhow;
use serde::Deserialize;

use super::types::Res;

/// Default HTTP port for the liveness endpoint.
fn default_port() -> u16 {
    3000
}

/// Default directory holding the data files.
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Default file name for the trigger table.
fn default_trigger_file() -> String {
    "triggers.json".to_string()
}

/// Default file name for the panel list.
fn default_panel_file() -> String {
    "data.json".to_string()
}

/// Default prefix that marks a trigger message.
fn default_trigger_prefix() -> String {
    "m!".to_string()
}

/// Default quiet period between trigger replies, in seconds.
fn default_cooldown_secs() -> u64 {
    10
}

/// Default lifetime of a throttle warning, in seconds.
fn default_warning_display_secs() -> u64 {
    5
}

/// Configuration for the mania-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Discord bot token (`MANIA_BOT_DISCORD_TOKEN` or `TOKEN`).
    ///
    /// When absent the chat session is skipped but the liveness endpoint still runs.
    #[serde(default)]
    pub discord_token: Option<String>,
    /// Port for the liveness endpoint (`MANIA_BOT_PORT` or `PORT`).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the data files (`MANIA_BOT_DATA_DIR`).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// File name of the trigger table inside `data_dir` (`MANIA_BOT_TRIGGER_FILE`).
    #[serde(default = "default_trigger_file")]
    pub trigger_file: String,
    /// File name of the panel list inside `data_dir` (`MANIA_BOT_PANEL_FILE`).
    #[serde(default = "default_panel_file")]
    pub panel_file: String,
    /// Prefix that marks a trigger message (`MANIA_BOT_TRIGGER_PREFIX`).
    #[serde(default = "default_trigger_prefix")]
    pub trigger_prefix: String,
    /// Quiet period between trigger replies for non-administrators (`MANIA_BOT_COOLDOWN_SECS`).
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// How long a throttle warning stays visible (`MANIA_BOT_WARNING_DISPLAY_SECS`).
    #[serde(default = "default_warning_display_secs")]
    pub warning_display_secs: u64,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            discord_token: None,
            port: default_port(),
            data_dir: default_data_dir(),
            trigger_file: default_trigger_file(),
            panel_file: default_panel_file(),
            trigger_prefix: default_trigger_prefix(),
            cooldown_secs: default_cooldown_secs(),
            warning_display_secs: default_warning_display_secs(),
        }
    }
}

impl ConfigInner {
    /// Full path of the trigger table file.
    pub fn trigger_path(&self) -> PathBuf {
        self.data_dir.join(&self.trigger_file)
    }

    /// Full path of the panel list file.
    pub fn panel_path(&self) -> PathBuf {
        self.data_dir.join(&self.panel_file)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn warning_display(&self) -> Duration {
        Duration::from_secs(self.warning_display_secs)
    }

    /// The token, if one is set and non-blank.
    pub fn token(&self) -> Option<&str> {
        self.discord_token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    fn validate(&self) -> Res<()> {
        if self.trigger_prefix.is_empty() {
            return Err(anyhow!("Trigger prefix must not be empty."));
        }

        if self.cooldown_secs < 1 {
            return Err(anyhow!("Cooldown must be at least 1 second."));
        }

        if self.warning_display_secs < 1 {
            return Err(anyhow!("Warning display window must be at least 1 second."));
        }

        if self.trigger_file == self.panel_file {
            return Err(anyhow!("Trigger file and panel file must differ."));
        }

        Ok(())
    }
}

impl Config {
    /// Loads the config file (if any), then applies the process environment.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        Self::load_with_env(explicit_path, std::env::vars().collect())
    }

    /// Loads the config file (if any), then applies `env` in place of the process environment.
    ///
    /// Precedence, lowest first: defaults, file, `MANIA_BOT_*`, bare `PORT` and `TOKEN`.
    pub fn load_with_env(explicit_path: Option<&Path>, env: HashMap<String, String>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Hosting platforms hand these over without a prefix.
        let port = env.get("PORT").cloned();
        let token = env.get("TOKEN").cloned();

        cfg = cfg
            .add_source(config::Environment::default().prefix("MANIA_BOT").source(Some(env)))
            .set_override_option("port", port)?
            .set_override_option("discord_token", token)?;

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

// Tests.
