//! Load configuration via `config` crate with env-override support.

use std::{
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;

use super::types::Res;

/// Default directory scanned for script modules.
fn default_modules_path() -> PathBuf {
    PathBuf::from("modules")
}

/// Default sender handle for the console transport.
fn default_console_handle() -> String {
    "console".to_string()
}

/// Default chat id for the console transport.
fn default_console_chat() -> String {
    "console".to_string()
}

/// Configuration for the dispatch-bot application.
///
/// Cheap to clone; dereferences to [`ConfigInner`].
#[derive(Debug, Clone)]
pub struct Config {
    /// The loaded settings.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Settings as read from the environment and the config file.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Handles allowed to run privileged built-ins such as `!reload` (`DISPATCH_BOT_ADMINS`).
    #[serde(default)]
    pub admins: Vec<String>,
    /// Optional allow-list of handles that may issue commands at all (`DISPATCH_BOT_ALLOWED_HANDLES`).
    ///
    /// When absent, every sender may issue commands.
    #[serde(default)]
    pub allowed_handles: Option<Vec<String>>,
    /// Directory scanned for executable script modules (`DISPATCH_BOT_MODULES_PATH`).
    #[serde(default = "default_modules_path")]
    pub modules_path: PathBuf,
    /// Sender handle attached to lines typed into the console transport (`DISPATCH_BOT_CONSOLE_HANDLE`).
    #[serde(default = "default_console_handle")]
    pub console_handle: String,
    /// Chat id used by the console transport (`DISPATCH_BOT_CONSOLE_CHAT`).
    #[serde(default = "default_console_chat")]
    pub console_chat: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            allowed_handles: None,
            modules_path: default_modules_path(),
            console_handle: default_console_handle(),
            console_chat: default_console_chat(),
        }
    }
}

impl Config {
    /// Load settings from `DISPATCH_BOT_*` environment variables and, if present,
    /// the TOML file at `explicit_path` (or `.hidden/config.toml`), then validate them.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        let env = config::Environment::default()
            .prefix("DISPATCH_BOT")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("admins")
            .with_list_parse_key("allowed_handles");

        let mut cfg = config::Config::builder().add_source(env);

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Res<()> {
        if self.admins.iter().any(|h| h.trim().is_empty()) {
            return Err(anyhow::anyhow!("Administrator handles must not be empty."));
        }

        if let Some(allowed) = &self.allowed_handles
            && allowed.iter().any(|h| h.trim().is_empty())
        {
            return Err(anyhow::anyhow!("Allowed handles must not be empty."));
        }

        if self.console_handle.trim().is_empty() {
            return Err(anyhow::anyhow!("Console handle must not be empty."));
        }

        Ok(())
    }
}
