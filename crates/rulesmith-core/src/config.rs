use crate::error::{Result, RulesmithError};
use crate::paths;
use crate::rule::RuleLibrary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// RulesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_rules_dir")]
    pub dir: String,
    /// Documents composed when `compose` is given no names.
    #[serde(default = "default_order")]
    pub default_order: Vec<String>,
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_rules_dir() -> String {
    paths::DEFAULT_RULES_DIR.to_string()
}

fn default_order() -> Vec<String> {
    vec!["general".to_string()]
}

fn default_output() -> String {
    paths::DEFAULT_OUTPUT.to_string()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            dir: default_rules_dir(),
            default_order: default_order(),
            output: default_output(),
        }
    }
}

// ---------------------------------------------------------------------------
// LedgerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_path")]
    pub path: String,
}

fn default_ledger_path() -> String {
    paths::DEFAULT_LEDGER.to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReleaseConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Prefix on release tags, stripped from the current version before parsing.
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            tag_prefix: default_tag_prefix(),
        }
    }
}

impl ReleaseConfig {
    /// `v1.2.3` -> `1.2.3` with the default prefix. Untagged input passes
    /// through unchanged.
    pub fn strip_tag<'a>(&self, version: &'a str) -> &'a str {
        let version = version.trim();
        if self.tag_prefix.is_empty() {
            return version;
        }
        version.strip_prefix(self.tag_prefix.as_str()).unwrap_or(version)
    }

    pub fn tag(&self, version: impl std::fmt::Display) -> String {
        format!("{}{}", self.tag_prefix, version)
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            rules: RulesConfig::default(),
            ledger: LedgerConfig::default(),
            release: ReleaseConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(RulesmithError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but an uninitialized project gets defaults named
    /// after its directory.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(RulesmithError::NotInitialized) => Ok(Self::new(project_name(root))),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn rules_dir(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.rules.dir)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.rules.output)
    }

    pub fn ledger_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.ledger.path)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut warn = |level: WarnLevel, message: String| {
            warnings.push(ConfigWarning { level, message });
        };

        // 1. Ledger path must be set
        if self.ledger.path.trim().is_empty() {
            warn(WarnLevel::Error, "ledger.path is empty".to_string());
        }

        // 2. Output path must be set
        if self.rules.output.trim().is_empty() {
            warn(WarnLevel::Error, "rules.output is empty".to_string());
        }

        // 3. Rules dir should exist and hold every default document
        let rules_dir = self.rules_dir(root);
        match RuleLibrary::load(&rules_dir) {
            Ok(library) => {
                for name in &self.rules.default_order {
                    if !library.contains(name) {
                        warn(
                            WarnLevel::Warning,
                            format!(
                                "rules.default_order names '{name}' but {} does not exist",
                                paths::rule_file(&rules_dir, name).display()
                            ),
                        );
                    }
                }
            }
            Err(RulesmithError::RulesDirNotFound(_)) => warn(
                WarnLevel::Warning,
                format!("rules directory {} does not exist", rules_dir.display()),
            ),
            Err(e) => warn(
                WarnLevel::Warning,
                format!("rules directory {} could not be read: {e}", rules_dir.display()),
            ),
        }

        if self.rules.default_order.is_empty() {
            warn(
                WarnLevel::Warning,
                "rules.default_order is empty: `compose` without names writes an empty file"
                    .to_string(),
            );
        }

        // 4. Composed output inside the rules dir would be picked up as a rule
        if !self.rules.output.trim().is_empty() && self.output_path(root).starts_with(&rules_dir) {
            warn(
                WarnLevel::Warning,
                format!(
                    "rules.output '{}' is inside the rules directory",
                    self.rules.output
                ),
            );
        }

        warnings
    }
}

/// Directory name of `root`, used as the default project name.
pub fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
