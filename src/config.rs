use crate::domain::{BranchConfig, ReleaseChannel};
use crate::error::{Result, SemtagError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "semtag.toml";

/// File name looked up in the user configuration directory
pub const USER_CONFIG_FILE: &str = ".semtag.toml";

/// How the highest prior final release is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStrategy {
    /// Greatest FINAL version anywhere in HEAD's ancestry
    #[default]
    OverallLatest,
    /// Greatest FINAL release built on the nearest released ancestor,
    /// even one on a line HEAD never merged
    Latest,
    /// Smallest FINAL release built on the nearest released ancestor
    Closest,
}

/// Which release tags end a "commits since last release" walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelSensitivity {
    /// Any release channel stops the walk
    AnyRelease,
    /// Only releases at or above the branch's own channel stop the walk
    BranchChannel,
}

impl ChannelSensitivity {
    /// Minimum channel a release tag needs to end the walk on this branch
    pub fn threshold(self, branch_channel: ReleaseChannel) -> ReleaseChannel {
        match self {
            ChannelSensitivity::AnyRelease => ReleaseChannel::lowest_release(),
            ChannelSensitivity::BranchChannel => {
                if branch_channel.is_release() {
                    branch_channel
                } else {
                    ReleaseChannel::lowest_release()
                }
            }
        }
    }
}

/// Where the commits-since walk stops on merge-heavy histories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CutoffPolicy {
    /// Stop the whole walk at the first qualifying release commit
    #[default]
    Nearest,
    /// Skip everything reachable from any qualifying release commit
    ExcludeReleased,
}

fn default_version_sensitivity() -> ChannelSensitivity {
    ChannelSensitivity::AnyRelease
}

fn default_changelog_sensitivity() -> ChannelSensitivity {
    ChannelSensitivity::BranchChannel
}

fn default_force_collision() -> bool {
    true
}

/// Settings for a single resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default = "default_version_sensitivity")]
    pub version_sensitivity: ChannelSensitivity,

    #[serde(default = "default_changelog_sensitivity")]
    pub changelog_sensitivity: ChannelSensitivity,

    #[serde(default)]
    pub cutoff: CutoffPolicy,

    /// Accept a colliding tag when the pattern has no `{build}` to bump
    #[serde(default = "default_force_collision")]
    pub force_collision: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        ResolutionConfig {
            version_sensitivity: default_version_sensitivity(),
            changelog_sensitivity: default_changelog_sensitivity(),
            cutoff: CutoffPolicy::default(),
            force_collision: default_force_collision(),
        }
    }
}

/// A `[[branches]]` entry as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchEntry {
    pub branch_pattern: String,
    pub version_pattern: String,
    #[serde(default)]
    pub release_channel: ReleaseChannel,
}

impl BranchEntry {
    fn new(branch_pattern: &str, version_pattern: &str, release_channel: ReleaseChannel) -> Self {
        BranchEntry {
            branch_pattern: branch_pattern.to_string(),
            version_pattern: version_pattern.to_string(),
            release_channel,
        }
    }
}

/// Raw, serializable configuration file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub strategy: VersionStrategy,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub branches: Vec<BranchEntry>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let final_pattern = "v{major}.{minor}.{patch}";
        let topic_pattern = "v{major}.{minor}.{patch}-{branch}.{build}";

        ConfigFile {
            strategy: VersionStrategy::default(),
            resolution: ResolutionConfig::default(),
            branches: vec![
                BranchEntry::new("^master$", final_pattern, ReleaseChannel::Final),
                BranchEntry::new("^main$", final_pattern, ReleaseChannel::Final),
                BranchEntry::new("^release.*", final_pattern, ReleaseChannel::Final),
                BranchEntry::new(
                    "^gamma.*",
                    "v{major}.{minor}.{patch}-gamma.{build}",
                    ReleaseChannel::Gamma,
                ),
                BranchEntry::new(
                    "^beta.*",
                    "v{major}.{minor}.{patch}-beta.{build}",
                    ReleaseChannel::Beta,
                ),
                BranchEntry::new(
                    "^alpha.*",
                    "v{major}.{minor}.{patch}-alpha.{build}",
                    ReleaseChannel::Alpha,
                ),
                BranchEntry::new("^feat.*", topic_pattern, ReleaseChannel::None),
                BranchEntry::new("^fix.*", topic_pattern, ReleaseChannel::None),
            ],
        }
    }
}

impl ConfigFile {
    /// Parse TOML text without validating patterns
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SemtagError::config(format!("Invalid TOML: {}", e)))
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SemtagError::config(format!("Can't encode config: {}", e)))
    }

    /// Compile every branch entry and check the whole configuration
    pub fn compile(&self) -> Result<Config> {
        let branches = self
            .branches
            .iter()
            .map(|entry| {
                BranchConfig::new(
                    &entry.branch_pattern,
                    &entry.version_pattern,
                    entry.release_channel,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        if !branches
            .iter()
            .any(|b| b.release_channel == ReleaseChannel::Final)
        {
            return Err(SemtagError::config(
                "No branch with release channel FINAL configured",
            ));
        }

        Ok(Config {
            strategy: self.strategy,
            resolution: self.resolution.clone(),
            branches,
        })
    }
}

/// Validated configuration; immutable for the duration of a pass
#[derive(Debug, Clone)]
pub struct Config {
    pub strategy: VersionStrategy,
    pub resolution: ResolutionConfig,
    /// Branch rules in configured order; first match wins
    pub branches: Vec<BranchConfig>,
}

impl Config {
    /// The built-in branch rules
    pub fn builtin() -> Result<Self> {
        ConfigFile::default().compile()
    }

    /// Read and compile a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        ConfigFile::from_toml(&text)?.compile()
    }
}

/// Finds the config file to use, if any.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `semtag.toml` in current directory
/// 3. `.semtag.toml` in the user config directory
pub fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or compiled
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match find_config_file(config_path) {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            Config::from_file(&path)
        }
        None => {
            debug!("no configuration file found, using defaults");
            Config::builtin()
        }
    }
}

/// Writes the default configuration, refusing to overwrite an existing file
pub fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Err(SemtagError::config(format!(
            "File {} already exists",
            path.display()
        )));
    }

    fs::write(path, ConfigFile::default().to_toml()?)?;
    Ok(())
}
