use crate::error::{GitReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the base path
pub const CONFIG_FILE_NAME: &str = "gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Contains remote and branch settings, tag naming, and manifest bump options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub bump: BumpConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_source_branch() -> String {
    "master".to_string()
}

/// Remote and branch the release workflows operate on.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_source_branch")]
    pub source_branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            source_branch: default_source_branch(),
        }
    }
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_latest_tag() -> String {
    "latest".to_string()
}

/// Release tag naming.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_tag_prefix")]
    pub prefix: String,

    #[serde(default = "default_latest_tag")]
    pub latest: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            prefix: default_tag_prefix(),
            latest: default_latest_tag(),
        }
    }
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_commit_message() -> String {
    "Rev to v%VERSION%".to_string()
}

fn default_prerelease_name() -> String {
    "pre".to_string()
}

/// Manifest version bump options.
///
/// `commit_message` may contain `%VERSION%`, replaced by the new version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpConfig {
    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_prerelease_name")]
    pub prerelease_name: String,
}

impl Default for BumpConfig {
    fn default() -> Self {
        BumpConfig {
            manifest: default_manifest(),
            commit_message: default_commit_message(),
            prerelease_name: default_prerelease_name(),
        }
    }
}

impl BumpConfig {
    /// Commit message recording a bump to `version`
    pub fn commit_message_for(&self, version: &str) -> String {
        self.commit_message.replace("%VERSION%", version)
    }
}

impl Config {
    /// Apply command line overrides on top of the loaded file
    pub fn with_overrides(mut self, remote: Option<&str>, source_branch: Option<&str>) -> Self {
        if let Some(remote) = remote {
            self.git.remote = remote.to_string();
        }
        if let Some(branch) = source_branch {
            self.git.source_branch = branch.to_string();
        }
        self
    }

    /// Reject values that would produce unusable git refs
    pub fn validate(&self) -> Result<()> {
        if self.git.remote.trim().is_empty() {
            return Err(GitReleaseError::config("git.remote must not be empty"));
        }
        if self.git.source_branch.trim().is_empty() {
            return Err(GitReleaseError::config("git.source_branch must not be empty"));
        }
        if self.tags.latest.trim().is_empty() {
            return Err(GitReleaseError::config("tags.latest must not be empty"));
        }
        if crate::version::is_valid(&self.tags.latest) {
            return Err(GitReleaseError::config(format!(
                "tags.latest '{}' must not look like a version",
                self.tags.latest
            )));
        }
        if self.bump.prerelease_name.is_empty()
            || !self
                .bump
                .prerelease_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(GitReleaseError::config(format!(
                "bump.prerelease_name '{}' must be a non-empty alphanumeric identifier",
                self.bump.prerelease_name
            )));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the base path
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `base_path` - Working directory of the release
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>, base_path: &Path) -> Result<Config> {
    let local = base_path.join(CONFIG_FILE_NAME);

    let config_file = if let Some(path) = config_path {
        Path::new(path).to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_path.exists() {
            user_path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    log::debug!("loading configuration from {}", config_file.display());
    let config_str = fs::read_to_string(&config_file).map_err(|e| {
        GitReleaseError::config(format!("Cannot read {}: {}", config_file.display(), e))
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|e| {
        GitReleaseError::config(format!("Cannot parse {}: {}", config_file.display(), e))
    })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.git.remote, "origin");
        assert_eq!(config.git.source_branch, "master");
        assert_eq!(config.tags.prefix, "v");
        assert_eq!(config.tags.latest, "latest");
        assert_eq!(config.bump.manifest, "package.json");
        assert_eq!(config.bump.prerelease_name, "pre");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_commit_message_for() {
        let bump = BumpConfig::default();
        assert_eq!(bump.commit_message_for("1.3.0"), "Rev to v1.3.0");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[git]\nremote = \"upstream\"\n").unwrap();
        assert_eq!(config.git.remote, "upstream");
        assert_eq!(config.git.source_branch, "master");
        assert_eq!(config.tags, TagsConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some("fork"), Some("main"));
        assert_eq!(config.git.remote, "fork");
        assert_eq!(config.git.source_branch, "main");

        let untouched = Config::default().with_overrides(None, None);
        assert_eq!(untouched, Config::default());
    }

    #[test]
    fn test_validate_rejects_versioned_latest_tag() {
        let mut config = Config::default();
        config.tags.latest = "v1.0.0".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_prerelease_name() {
        let mut config = Config::default();
        config.bump.prerelease_name = "pre.1".to_string();
        assert!(config.validate().is_err());
    }
}
