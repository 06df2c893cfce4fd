//! Configuration system for FairLens.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/fairlens/config.toml` and/or `.fairlens/config.toml`
//! in the workspace directory.

use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the FairLens client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FairlensConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub mitigation: MitigationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote service connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the fairness service.
    pub base_url: String,
    /// Request timeout in seconds. Unset means requests never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: None,
            user_agent: format!("FairLens/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Interactive wizard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color theme name.
    pub theme: String,
    /// How long a notification stays on screen.
    pub toast_ttl_secs: u64,
    /// Maximum number of stacked notifications.
    pub max_toasts: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            toast_ttl_secs: 5,
            max_toasts: 5,
        }
    }
}

/// How a fairness statistic the service did not return is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingMetricPolicy {
    /// Show `0.000`.
    #[default]
    Zero,
    /// Show `N/A`.
    NotAvailable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub missing_metric: MissingMetricPolicy,
}

/// Mitigation step settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationConfig {
    /// Techniques offered in the mitigation step.
    pub techniques: Vec<String>,
    /// Categorical encoding strategy sent with every mitigation request.
    pub encoding_method: String,
}

impl Default for MitigationConfig {
    fn default() -> Self {
        Self {
            techniques: vec![
                "reweighing".to_string(),
                "disparate_impact_remover".to_string(),
                "exponentiated_gradient".to_string(),
                "correlation_remover".to_string(),
            ],
            encoding_method: "label".to_string(),
        }
    }
}

/// Where downloads, plots, and the sample dataset are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl OutputConfig {
    /// Directory plot images are saved in.
    pub fn plots_dir(&self) -> PathBuf {
        self.dir.join("plots")
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "fairlens", "fairlens")
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".fairlens").join("config.toml")
}

/// Load configuration by merging defaults, config files, and environment variables.
///
/// An explicit `config_file` must exist; the user and workspace files are
/// optional.
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
) -> Result<FairlensConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(FairlensConfig::default()));

    // User-level config
    if let Some(dirs) = project_dirs() {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Explicit --config file
    if let Some(path) = config_file {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Toml::file(path));
    }

    // Environment variables (FAIRLENS_API__BASE_URL, FAIRLENS_UI__THEME, etc.)
    figment = figment.merge(Env::prefixed("FAIRLENS_").split("__"));

    let config: FairlensConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    config.check()?;
    Ok(config)
}

impl FairlensConfig {
    /// Reject values that parse but cannot work.
    fn check(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "api.base_url is empty".into(),
            });
        }
        if self.ui.max_toasts == 0 {
            return Err(ConfigError::Invalid {
                message: "ui.max_toasts must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Check whether any FairLens configuration file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(dirs) = project_dirs()
        && dirs.config_dir().join("config.toml").exists()
    {
        return true;
    }
    workspace
        .map(|ws| workspace_config_path(ws).exists())
        .unwrap_or(false)
}

/// Write the default configuration to `<workspace>/.fairlens/config.toml`.
/// Returns the path written. An existing file is left untouched.
pub fn write_default_config(workspace: &Path) -> anyhow::Result<PathBuf> {
    let path = workspace_config_path(workspace);
    if path.exists() {
        anyhow::bail!("configuration already exists at {}", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(&FairlensConfig::default())?;
    std::fs::write(&path, toml)?;
    Ok(path)
}
