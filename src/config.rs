use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::scanner::{ExtractionRule, default_rules};
use crate::error::Error;

pub const CONFIG_FILE_NAME: &str = ".poctlrc.json";

pub const DEFAULT_ENDPOINT: &str = "https://www.transifex.com/api/2";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    /// Files, directories or glob patterns scanned by `extract`.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    #[serde(default = "default_extract_output")]
    pub extract_output: String,
    /// Destination of `pull` and `reformat`.
    #[serde(default = "default_i18n_dir")]
    pub i18n_dir: String,
    /// Template merged against remote catalogs by `pull`.
    #[serde(default = "default_extract_output")]
    pub template: String,
    #[serde(default = "default_rules")]
    pub rules: Vec<ExtractionRule>,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_project_name")]
    pub project: String,
    #[serde(default = "default_resource")]
    pub resource: String,
}

fn default_sources() -> Vec<String> {
    [
        "./src/plupload.js",
        "./src/jquery.ui.plupload/jquery.ui.plupload.js",
        "./src/jquery.plupload.queue/jquery.plupload.queue.js",
    ]
    .map(String::from)
    .to_vec()
}

fn default_extract_output() -> String {
    "./tmp/en.po".to_string()
}

fn default_i18n_dir() -> String {
    "./tmp/i18n".to_string()
}

fn default_project_name() -> String {
    "plupload".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_resource() -> String {
    "core".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            version: String::new(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            project: default_project_name(),
            resource: default_resource(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            sources: default_sources(),
            extract_output: default_extract_output(),
            i18n_dir: default_i18n_dir(),
            template: default_extract_output(),
            rules: default_rules(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            rule.validate()
                .with_context(|| format!("Invalid rule in '{}'", CONFIG_FILE_NAME))?;
        }
        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

// ============================================================
// Operation parameters
// ============================================================

/// Basic-auth credentials given as `user:secret`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("secret", &"***")
            .finish()
    }
}

impl FromStr for Credentials {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((user, secret)) if !user.is_empty() && !secret.is_empty() => Ok(Self {
                user: user.to_string(),
                secret: secret.to_string(),
            }),
            _ => Err(Error::InvalidParameter {
                name: "auth",
                reason: "expected `user:secret`".to_string(),
            }),
        }
    }
}

/// Remote project and resource slugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    pub project: String,
    pub resource: String,
}

/// Validated inputs of `extract`.
#[derive(Debug, Clone)]
pub struct ExtractParams {
    pub sources: Vec<String>,
    pub output: PathBuf,
    pub project: String,
    pub version: String,
    pub rules: Vec<ExtractionRule>,
}

impl ExtractParams {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.sources.is_empty() {
            return Err(Error::MissingParameter("from"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::MissingParameter("to"));
        }
        if self.rules.is_empty() {
            return Err(Error::MissingParameter("rules"));
        }
        self.rules.iter().try_for_each(ExtractionRule::validate)
    }
}

/// Validated inputs of `reformat`.
#[derive(Debug, Clone)]
pub struct ReformatParams {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
}

impl ReformatParams {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::MissingParameter("from"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::MissingParameter("to"));
        }
        Ok(())
    }
}

/// Validated inputs of `pull`.
#[derive(Debug, Clone)]
pub struct PullParams {
    pub endpoint: String,
    pub resource: ResourceId,
    pub credentials: Credentials,
    pub template: PathBuf,
    pub dest_dir: PathBuf,
}

impl PullParams {
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |name, reason: &str| Error::InvalidParameter {
            name,
            reason: reason.to_string(),
        };
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(invalid("endpoint", "expected an http(s) URL"));
        }
        for (name, slug) in [
            ("project", &self.resource.project),
            ("resource", &self.resource.resource),
        ] {
            let valid = !slug.is_empty()
                && slug
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(invalid(name, "expected a slug of letters, digits, `-` or `_`"));
            }
        }
        if self.dest_dir.as_os_str().is_empty() {
            return Err(Error::MissingParameter("to"));
        }
        if !self.template.is_file() {
            return Err(Error::read(
                &self.template,
                std::io::Error::new(std::io::ErrorKind::NotFound, "template not found"),
            ));
        }
        Ok(())
    }
}
