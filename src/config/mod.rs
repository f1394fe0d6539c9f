//! Configuration management for `td`.
//!
//! Configuration is loaded from YAML files, lowest precedence first:
//! - Built-in defaults
//! - User config (`$XDG_CONFIG_HOME/ticketdesk/config.yaml` or
//!   `~/.config/ticketdesk/config.yaml`)
//! - Workspace config (`.ticketdesk/config.yaml`)
//! - Environment variables and CLI flags (`--data-file`, `--password`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ticketdesk_lib::settings::parse_label_list;
use ticketdesk_lib::{LabelKind, LabelSettings, TicketStore};
use tracing::debug;

use crate::error::{DeskError, Result};

/// Workspace directory name.
pub const DESK_DIR_NAME: &str = ".ticketdesk";
/// Ticket file name inside the workspace directory.
pub const DATA_FILE_NAME: &str = "tickets.json";
/// Config file name (workspace and user level).
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Keys accepted by `td config get/set`.
pub const CONFIG_KEYS: [&str; 5] = [
    "labels.categories",
    "labels.priorities",
    "labels.statuses",
    "auth.password",
    "data_file",
];

/// Overrides coming from flags or environment variables.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_file: Option<PathBuf>,
    pub password: Option<String>,
}

/// Shared-password gate settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    /// `None` disables the login gate.
    pub password: Option<String>,
}

/// Fully merged configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeskConfig {
    pub labels: LabelSettings,
    pub auth: AuthConfig,
    /// Ticket file override, already resolved against its config file.
    pub data_file: Option<PathBuf>,
}

/// A label list written either as a YAML sequence or as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelList {
    List(Vec<String>),
    Text(String),
}

impl LabelList {
    /// Trimmed, de-duplicated labels (empty entries dropped).
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::List(items) => parse_label_list(&items.join("\n")),
            Self::Text(text) => parse_label_list(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<LabelList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorities: Option<LabelList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<LabelList>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// One config file as written on disk; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(skip_serializing_if = "LabelsLayer::is_empty")]
    pub labels: LabelsLayer,
    #[serde(skip_serializing_if = "AuthLayer::is_empty")]
    pub auth: AuthLayer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl LabelsLayer {
    fn is_empty(&self) -> bool {
        self.categories.is_none() && self.priorities.is_none() && self.statuses.is_none()
    }

    fn slot(&mut self, kind: LabelKind) -> &mut Option<LabelList> {
        match kind {
            LabelKind::Category => &mut self.categories,
            LabelKind::Priority => &mut self.priorities,
            LabelKind::Status => &mut self.statuses,
        }
    }
}

impl AuthLayer {
    const fn is_empty(&self) -> bool {
        self.password.is_none()
    }
}

impl ConfigLayer {
    /// Read a config file. A missing file is `Ok(None)`; a file holding only
    /// comments and blank lines is the empty layer.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read or `Yaml` if it does not parse.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if raw.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        }) {
            return Ok(Some(Self::default()));
        }
        let layer: Self = serde_yaml::from_str(&raw)?;
        debug!(path = %path.display(), "loaded config layer");
        Ok(Some(layer))
    }

    /// Apply this layer on top of `config`. Relative `data_file` paths are
    /// resolved against `base_dir`.
    pub fn apply(&self, config: &mut DeskConfig, base_dir: &Path) {
        let labels = &mut config.labels;
        for (slot, target) in [
            (&self.labels.categories, &mut labels.categories),
            (&self.labels.priorities, &mut labels.priorities),
            (&self.labels.statuses, &mut labels.statuses),
        ] {
            if let Some(list) = slot {
                let parsed = list.labels();
                if !parsed.is_empty() {
                    *target = parsed;
                }
            }
        }
        if let Some(ref password) = self.auth.password {
            config.auth.password = Some(password.clone()).filter(|p| !p.is_empty());
        }
        if let Some(ref data_file) = self.data_file {
            config.data_file = Some(base_dir.join(data_file));
        }
    }

    /// Set one key from its text form.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unknown key or a label list with no entries.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(kind) = label_kind_for_key(key) {
            let labels = parse_label_list(value);
            if labels.is_empty() {
                return Err(DeskError::config(format!("{key} needs at least one label")));
            }
            *self.labels.slot(kind) = Some(LabelList::List(labels));
            return Ok(());
        }
        match key {
            "auth.password" => {
                self.auth.password = Some(value.to_string()).filter(|v| !v.is_empty());
            }
            "data_file" => {
                self.data_file = Some(PathBuf::from(value)).filter(|p| !p.as_os_str().is_empty());
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn label_kind_for_key(key: &str) -> Option<LabelKind> {
    match key {
        "labels.categories" => Some(LabelKind::Category),
        "labels.priorities" => Some(LabelKind::Priority),
        "labels.statuses" => Some(LabelKind::Status),
        _ => None,
    }
}

fn unknown_key(key: &str) -> DeskError {
    DeskError::config(format!(
        "unknown key '{key}' (expected one of: {})",
        CONFIG_KEYS.join(", ")
    ))
}

impl DeskConfig {
    /// Text form of one key. The password is masked.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unknown key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(kind) = label_kind_for_key(key) {
            return Ok(Some(self.labels.labels(kind).join(", ")));
        }
        match key {
            "auth.password" => Ok(self.auth.password.as_ref().map(|_| "********".to_string())),
            "data_file" => Ok(self.data_file.as_ref().map(|p| p.display().to_string())),
            _ => Err(unknown_key(key)),
        }
    }

    /// All keys with their text form (unset keys omitted).
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().flatten().map(|value| (*key, value)))
            .collect()
    }
}

/// Path of the user-level config file, if a home directory is known.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        })?;
    Some(base.join("ticketdesk").join(CONFIG_FILE_NAME))
}

/// Find the nearest `.ticketdesk` directory at or above `start` (default:
/// the current directory).
///
/// # Errors
///
/// Returns `NotInitialized` if no workspace directory exists, or `Io` if
/// the start directory cannot be resolved.
pub fn discover_desk_dir(start: Option<&Path>) -> Result<PathBuf> {
    let start = match start {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let start = dunce::canonicalize(&start).unwrap_or(start);

    for dir in start.ancestors() {
        let candidate = dir.join(DESK_DIR_NAME);
        if candidate.is_dir() {
            debug!(path = %candidate.display(), "found workspace");
            return Ok(candidate);
        }
    }
    Err(DeskError::NotInitialized)
}

/// Merge every layer into one configuration.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_config(desk_dir: Option<&Path>, cli: &CliOverrides) -> Result<DeskConfig> {
    let mut config = DeskConfig::default();

    if let Some(path) = user_config_path() {
        if let Some(layer) = ConfigLayer::load(&path)? {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            layer.apply(&mut config, base);
        }
    }

    if let Some(dir) = desk_dir {
        if let Some(layer) = ConfigLayer::load(&dir.join(CONFIG_FILE_NAME))? {
            layer.apply(&mut config, dir);
        }
    }

    if let Some(ref data_file) = cli.data_file {
        config.data_file = Some(data_file.clone());
    }

    Ok(config)
}

/// Resolved workspace for commands that touch tickets.
#[derive(Debug, Clone)]
pub struct DeskContext {
    /// `None` when running on `--data-file` outside any workspace.
    pub desk_dir: Option<PathBuf>,
    pub config: DeskConfig,
    pub data_path: PathBuf,
}

impl DeskContext {
    /// Discover the workspace and load its configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` when there is neither a workspace nor a
    /// `--data-file` override, or a config error.
    pub fn open(cli: &CliOverrides) -> Result<Self> {
        let desk_dir = match discover_desk_dir(None) {
            Ok(dir) => Some(dir),
            Err(DeskError::NotInitialized) if cli.data_file.is_some() => None,
            Err(err) => return Err(err),
        };
        let config = load_config(desk_dir.as_deref(), cli)?;
        let data_path = match (&config.data_file, &desk_dir) {
            (Some(path), _) => path.clone(),
            (None, Some(dir)) => dir.join(DATA_FILE_NAME),
            (None, None) => return Err(DeskError::NotInitialized),
        };
        Ok(Self {
            desk_dir,
            config,
            data_path,
        })
    }

    /// Load the ticket store (never fails; see `TicketStore::open`).
    #[must_use]
    pub fn open_store(&self) -> TicketStore {
        TicketStore::open(&self.data_path)
    }

    #[must_use]
    pub const fn labels(&self) -> &LabelSettings {
        &self.config.labels
    }

    /// Workspace config file path.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` outside a workspace.
    pub fn config_path(&self) -> Result<PathBuf> {
        self.desk_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .ok_or(DeskError::NotInitialized)
    }
}

/// Update one key in the workspace config file, keeping the other keys.
///
/// # Errors
///
/// Returns an error for unknown keys, unreadable YAML, or write failures.
pub fn set_workspace_value(config_path: &Path, key: &str, value: &str) -> Result<()> {
    let mut layer = ConfigLayer::load(config_path)?.unwrap_or_default();
    layer.set(key, value)?;
    let yaml = serde_yaml::to_string(&layer)?;
    fs::write(config_path, yaml)?;
    debug!(path = %config_path.display(), key, "updated workspace config");
    Ok(())
}
