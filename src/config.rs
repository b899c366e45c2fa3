use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::QueryFlavor;

pub const CONFIG_FILE_NAME: &str = ".namedsqlrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Source directories scanned for `*.java` files, relative to the source root.
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Directories searched for referenced resources, after the output root.
    #[serde(default = "default_resource_roots")]
    pub resource_roots: Vec<String>,
    /// Where generated properties files are written.
    #[serde(default = "default_output_root")]
    pub output_root: String,
    #[serde(default = "default_resource_suffix")]
    pub resource_suffix: String,
    #[serde(default = "default_flavors")]
    pub flavors: Vec<QueryFlavor>,
    /// Declaration manifest used instead of scanning sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
}

fn default_includes() -> Vec<String> {
    vec!["src/main/java".to_string()]
}

fn default_resource_roots() -> Vec<String> {
    vec!["src/main/resources".to_string()]
}

fn default_output_root() -> String {
    "target/classes".to_string()
}

fn default_resource_suffix() -> String {
    ".sql".to_string()
}

fn default_flavors() -> Vec<QueryFlavor> {
    QueryFlavor::all()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            resource_roots: default_resource_roots(),
            output_root: default_output_root(),
            resource_suffix: default_resource_suffix(),
            flavors: default_flavors(),
            manifest: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns, an empty resource suffix and an empty
    /// flavor list.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without wildcards are literal directory paths
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.resource_suffix.trim().is_empty() {
            bail!("'resourceSuffix' must not be empty");
        }

        if self.flavors.is_empty() {
            bail!("'flavors' must name at least one of: jpa, jdbc");
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
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config
                .validate()
                .with_context(|| format!("Invalid config file: {:?}", path))?;
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
