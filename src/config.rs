use std::{env, path::PathBuf};

use color_eyre::Result;
use directories::{BaseDirs, ProjectDirs};
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::tui::KeyBinding;

const CONFIG: &str = include_str!("../.config/config.json5");

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

/// Where the analysis backend lives
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub analyze_path: String,
    pub predict_path: String,
    /// Per-request deadline; the HTTP client's default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ServiceConfig {
    pub fn analyze_url(&self) -> String {
        join_url(&self.base_url, &self.analyze_path)
    }

    pub fn predict_url(&self) -> String {
        join_url(&self.base_url, &self.predict_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeName,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Bindings merged over the defaults
    #[serde(default)]
    pub keybindings: Vec<KeyBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Config {
    /// Build the layered configuration
    ///
    /// Sources, later ones winning: the embedded defaults, the config file
    /// (`config_path`, or `config.json5` in the config directory when present)
    /// and `DATASCOUT__*` environment variables, e.g.
    /// `DATASCOUT__SERVICE__BASE_URL=http://10.0.0.5:8000`.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let (file_path, required) = match config_path {
            Some(p) => (expand_tilde(p), true),
            None => (get_config_dir().join("config.json5"), false),
        };

        let builder = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5))
            .add_source(
                config::File::from(file_path)
                    .format(config::FileFormat::Json5)
                    .required(required),
            )
            .add_source(config::Environment::with_prefix(&PROJECT_NAME).separator("__"));

        builder.build()?.try_deserialize()
    }

    /// The defaults compiled into the binary, ignoring files and environment
    pub fn embedded() -> Self {
        json5::from_str(CONFIG).unwrap_or_else(|_| Self {
            service: ServiceConfig {
                base_url: "http://localhost:8000".to_string(),
                analyze_path: "/api/analyze".to_string(),
                predict_path: "/api/predict".to_string(),
                timeout_secs: None,
            },
            ui: UiConfig::default(),
            keybindings: Vec::new(),
        })
    }

    /// Point the client at another backend, keeping the endpoint paths
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.service.base_url = base_url.into();
        self
    }
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Some(s) = path.to_str() {
        if s.starts_with('~') {
            if let Some(base) = BaseDirs::new() {
                return PathBuf::from(s.replacen('~', base.home_dir().to_str().unwrap_or(""), 1));
            }
        }
    }
    path.clone()
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::Action;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_defaults() {
        let config = Config::embedded();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.analyze_url(), "http://localhost:8000/api/analyze");
        assert_eq!(config.service.predict_url(), "http://localhost:8000/api/predict");
        assert_eq!(config.service.timeout_secs, None);
        assert_eq!(config.ui.theme, ThemeName::Dark);
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json5");
        std::fs::write(
            &path,
            r#"{
                // only what differs from the defaults
                service: { base_url: "https://analysis.example.com/", timeout_secs: 45 },
                ui: { theme: "light" },
                keybindings: [{ key: "F9", action: "Analyze" }],
            }"#,
        )
        .unwrap();

        let config = Config::from_path(Some(&path)).unwrap();
        assert_eq!(config.service.analyze_url(), "https://analysis.example.com/api/analyze");
        assert_eq!(config.service.predict_path, "/api/predict");
        assert_eq!(config.service.timeout_secs, Some(45));
        assert_eq!(config.ui.theme, ThemeName::Light);
        assert_eq!(config.keybindings.len(), 1);
        assert_eq!(config.keybindings[0].action, Action::Analyze);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.json5");
        assert!(Config::from_path(Some(&path)).is_err());
    }

    #[test]
    fn test_with_base_url() {
        let config = Config::embedded().with_base_url("http://10.0.0.5:8000");
        assert_eq!(config.service.predict_url(), "http://10.0.0.5:8000/api/predict");
    }

    #[test]
    fn test_join_url_slashes() {
        assert_eq!(join_url("http://h", "/a"), "http://h/a");
        assert_eq!(join_url("http://h/", "a"), "http://h/a");
        assert_eq!(join_url("http://h//", "//a"), "http://h/a");
    }
}
