//! Registry of command modules backed by executable scripts in a directory.
//!
//! Each executable, non-hidden file in the modules directory becomes a command
//! named after its file stem, so `modules/weather.sh` answers to `!weather`.
//! Scripts receive the command arguments as argv and the event through the environment:
//! - `BOT_SENDER_HANDLE`
//! - `BOT_CHAT_ID`
//! - `BOT_MESSAGE_BODY`

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

use crate::base::{
    config::Config,
    types::{InboundEvent, Res},
};

use super::{CommandModule, GenericModuleRegistry, ModuleCallback, ModuleHandle, ModuleRegistry, StatefulHandlerRef};

// Extra methods on `ModuleRegistry` applied by the script implementation.

impl ModuleRegistry {
    /// Creates a script-backed registry and performs the initial load.
    pub async fn scripts(config: &Config) -> Res<Self> {
        let registry = ScriptModuleRegistry::new(&config.modules_path);
        registry.reload().await?;

        Ok(Self::new(Arc::new(registry)))
    }
}

impl From<ScriptModuleRegistry> for ModuleRegistry {
    fn from(registry: ScriptModuleRegistry) -> Self {
        Self::new(Arc::new(registry))
    }
}

// Structs.

/// Script module registry implementation.
pub struct ScriptModuleRegistry {
    path: PathBuf,
    modules: RwLock<Arc<BTreeMap<String, ModuleHandle>>>,
    handlers: RwLock<Vec<StatefulHandlerRef>>,
}

impl ScriptModuleRegistry {
    /// Create an empty registry over `path`; call `reload` to populate it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            modules: RwLock::new(Arc::new(BTreeMap::new())),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Append a stateful handler to the end of the chain.
    ///
    /// Handlers are not scripts, so they are kept across reloads.
    pub fn register_handler(&self, handler: StatefulHandlerRef) {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner).push(handler);
    }

    fn snapshot(&self) -> Arc<BTreeMap<String, ModuleHandle>> {
        self.modules.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl GenericModuleRegistry for ScriptModuleRegistry {
    fn lookup(&self, name: &str) -> Option<ModuleHandle> {
        self.snapshot().get(name).cloned()
    }

    fn names(&self) -> BTreeSet<String> {
        self.snapshot().keys().cloned().collect()
    }

    fn message_handlers(&self) -> Vec<StatefulHandlerRef> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[instrument(name = "ScriptModuleRegistry::reload", skip(self), fields(path = %self.path.display()))]
    async fn reload(&self) -> Res<Vec<String>> {
        let scanned = scan_scripts(&self.path).await?;

        let modules: BTreeMap<String, ModuleHandle> = scanned
            .into_iter()
            .map(|(name, path)| {
                info!("Module command {} is available.", name);
                let module: ModuleHandle = Arc::new(ScriptModule { name: name.clone(), path });
                (name, module)
            })
            .collect();

        let names = modules.keys().cloned().collect();

        // Readers holding the previous snapshot keep using it until they are done.
        *self.modules.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(modules);

        Ok(names)
    }
}

/// A single executable script exposed as a command.
#[derive(Debug)]
pub struct ScriptModule {
    name: String,
    path: PathBuf,
}

impl CommandModule for ScriptModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, event: InboundEvent, args: Vec<String>, callback: ModuleCallback) {
        let path = self.path.clone();
        let span = info_span!("ScriptModule::run", module = %self.name);

        tokio::spawn(
            async move {
                match run_script(&path, &event, &args).await {
                    Ok(Some(output)) => callback.send(output).await,
                    Ok(None) => debug!("Script produced no output."),
                    Err(err) => error!("Error while running script: {}", err),
                }
            }
            .instrument(span),
        );
    }
}

// Helpers.

/// Execute the script and collect the text to reply with, if any.
async fn run_script(path: &Path, event: &InboundEvent, args: &[String]) -> Res<Option<String>> {
    let output = Command::new(path)
        .args(args)
        .env("BOT_SENDER_HANDLE", &event.sender_handle)
        .env("BOT_CHAT_ID", event.chat.id())
        .env("BOT_MESSAGE_BODY", &event.body)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut text = stdout.trim_end().to_string();

    if !output.status.success() {
        warn!("Script exited with {}.", output.status);

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim_end();

        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
    }

    Ok((!text.is_empty()).then_some(text))
}

/// Collect `(command name, path)` for every runnable script under `dir`.
async fn scan_scripts(dir: &Path) -> Res<BTreeMap<String, PathBuf>> {
    let mut scripts = BTreeMap::new();

    if !tokio::fs::try_exists(dir).await? {
        warn!("Modules directory {} does not exist; no module commands loaded.", dir.display());
        return Ok(scripts);
    }

    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        if name.is_empty() || name.starts_with('.') {
            continue;
        }

        // Follows symlinks, so linked scripts count as files.
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Skipping unreadable entry {}: {}", path.display(), err);
                continue;
            }
        };

        if !metadata.is_file() || !is_executable(&metadata) {
            debug!("Skipping non-executable entry {}.", path.display());
            continue;
        }

        if let Some(previous) = scripts.insert(name.to_string(), path.clone()) {
            warn!("Module {} at {} shadows {}.", name, path.display(), previous.display());
        }
    }

    Ok(scripts)
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;

    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

// Tests.
