//! Reading and writing the package manifest version.
//!
//! `Cargo.toml` manifests are edited with `toml_edit`; any other file is
//! treated as a JSON package manifest (`package.json`). In both cases only
//! the version value changes, formatting is preserved.

use crate::error::{GitReleaseError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of the version a release is cut from
pub trait Manifest {
    /// Read the current version string
    fn read_version(&self) -> Result<String>;

    /// Replace the version string
    fn write_version(&self, version: &str) -> Result<()>;
}

/// Manifest file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `{"version": "1.2.3", ...}`
    Json,
    /// `[package] version = "1.2.3"` or `[workspace.package]`
    CargoToml,
}

impl ManifestFormat {
    /// Pick the format from the file name
    pub fn detect(path: &Path) -> Self {
        match path.file_name().and_then(|n| n.to_str()) {
            Some("Cargo.toml") => ManifestFormat::CargoToml,
            _ => ManifestFormat::Json,
        }
    }
}

/// Manifest stored on disk
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
    format: ManifestFormat,
}

impl ManifestFile {
    /// Open a manifest, detecting its format from the file name
    ///
    /// # Returns
    /// * `Ok(ManifestFile)` - The file exists
    /// * `Err` - If the file does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(GitReleaseError::manifest(format!(
                "Manifest not found: {}",
                path.display()
            )));
        }
        let format = ManifestFormat::detect(&path);
        Ok(ManifestFile { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ManifestFormat {
        self.format
    }

    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            GitReleaseError::manifest(format!("Cannot read {}: {}", self.path.display(), e))
        })
    }
}

impl Manifest for ManifestFile {
    fn read_version(&self) -> Result<String> {
        let content = self.read()?;
        match self.format {
            ManifestFormat::Json => json_version(&content),
            ManifestFormat::CargoToml => cargo_version(&content),
        }
        .map_err(|e| GitReleaseError::manifest(format!("{}: {}", self.path.display(), e)))
    }

    fn write_version(&self, version: &str) -> Result<()> {
        let content = self.read()?;
        let updated = match self.format {
            ManifestFormat::Json => replace_json_version(&content, version),
            ManifestFormat::CargoToml => replace_cargo_version(&content, version),
        }
        .map_err(|e| GitReleaseError::manifest(format!("{}: {}", self.path.display(), e)))?;

        fs::write(&self.path, updated)?;
        Ok(())
    }
}

fn json_version(content: &str) -> std::result::Result<String, String> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))?;
    value
        .get("version")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| "no \"version\" string field".to_string())
}

/// Replace the top-level `"version": "..."` member, leaving the rest untouched
///
/// Nested objects (`engines`, `publishConfig`, ...) may carry their own
/// `version` key; only a match at object depth 1 outside any string is edited.
fn replace_json_version(content: &str, version: &str) -> std::result::Result<String, String> {
    // Validate before editing text
    json_version(content)?;

    let re = Regex::new(r#""version"\s*:\s*"([^"\\]*)""#).map_err(|e| e.to_string())?;
    let value = re
        .captures_iter(content)
        .filter(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            json_depth_at(&content[..start]) == Some(1)
        })
        .find_map(|caps| caps.get(1))
        .ok_or_else(|| "no top-level \"version\" string field".to_string())?;

    let mut updated = String::with_capacity(content.len() + version.len());
    updated.push_str(&content[..value.start()]);
    updated.push_str(version);
    updated.push_str(&content[value.end()..]);

    let written = json_version(&updated)?;
    if written != version {
        return Err(format!(
            "top-level version is '{}' after writing '{}'",
            written, version
        ));
    }
    Ok(updated)
}

/// Object/array nesting depth at the end of `prefix`, `None` inside a string
fn json_depth_at(prefix: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in prefix.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    (!in_string).then_some(depth)
}

fn cargo_version(content: &str) -> std::result::Result<String, String> {
    let doc: toml_edit::DocumentMut = content
        .parse()
        .map_err(|e| format!("invalid TOML: {}", e))?;

    doc.get("package")
        .and_then(|p| p.get("version"))
        .and_then(|v| v.as_str())
        .or_else(|| {
            doc.get("workspace")
                .and_then(|w| w.get("package"))
                .and_then(|p| p.get("version"))
                .and_then(|v| v.as_str())
        })
        .map(str::to_string)
        .ok_or_else(|| "no package version".to_string())
}

fn replace_cargo_version(content: &str, version: &str) -> std::result::Result<String, String> {
    let mut doc: toml_edit::DocumentMut = content
        .parse()
        .map_err(|e| format!("invalid TOML: {}", e))?;

    let has_package_version = doc
        .get("package")
        .and_then(|p| p.get("version"))
        .and_then(|v| v.as_str())
        .is_some();

    if has_package_version {
        doc["package"]["version"] = toml_edit::value(version);
    } else if cargo_version(content).is_ok() {
        doc["workspace"]["package"]["version"] = toml_edit::value(version);
    } else {
        return Err("no package version".to_string());
    }

    Ok(doc.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> ManifestFile {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        ManifestFile::open(path).unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            ManifestFormat::detect(Path::new("a/Cargo.toml")),
            ManifestFormat::CargoToml
        );
        assert_eq!(
            ManifestFormat::detect(Path::new("package.json")),
            ManifestFormat::Json
        );
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = ManifestFile::open(dir.path().join("package.json")).unwrap_err();
        assert!(err.to_string().contains("Manifest not found"));
    }

    #[test]
    fn test_json_round_trip_preserves_formatting() {
        let dir = TempDir::new().unwrap();
        let original = "{\n  \"name\": \"demo\",\n  \"version\": \"1.3.0-pre.2\",\n  \"dependencies\": {\n    \"x\": \"^1.0.0\"\n  }\n}\n";
        let manifest = write(&dir, "package.json", original);

        assert_eq!(manifest.read_version().unwrap(), "1.3.0-pre.2");
        manifest.write_version("1.3.0").unwrap();

        let content = fs::read_to_string(manifest.path()).unwrap();
        assert_eq!(content, original.replace("1.3.0-pre.2", "1.3.0"));
        assert_eq!(manifest.read_version().unwrap(), "1.3.0");
    }

    #[test]
    fn test_json_nested_version_before_top_level_is_untouched() {
        let dir = TempDir::new().unwrap();
        let original = "{\n  \"engines\": {\"version\": \"0.0.1\"},\n  \"publishConfig\": {\n    \"version\": \"9.9.9\"\n  },\n  \"description\": \"set \\\"version\\\": \\\"x\\\" here\",\n  \"version\": \"1.3.0-pre.2\"\n}\n";
        let manifest = write(&dir, "package.json", original);

        manifest.write_version("1.3.0").unwrap();

        let content = fs::read_to_string(manifest.path()).unwrap();
        assert_eq!(
            content,
            original.replace("\"version\": \"1.3.0-pre.2\"", "\"version\": \"1.3.0\"")
        );
        assert!(content.contains("{\"version\": \"0.0.1\"}"));
        assert!(content.contains("\"version\": \"9.9.9\""));
        assert_eq!(manifest.read_version().unwrap(), "1.3.0");
    }

    #[test]
    fn test_json_depth_tracking() {
        assert_eq!(json_depth_at("{\"a\": "), Some(1));
        assert_eq!(json_depth_at("{\"a\": {\"b\": ["), Some(3));
        assert_eq!(json_depth_at("{\"a\": {}, "), Some(1));
        assert_eq!(json_depth_at("{\"a\": \"{ \\\" "), None);
    }

    #[test]
    fn test_json_without_version_fails() {
        let dir = TempDir::new().unwrap();
        let manifest = write(&dir, "package.json", "{\"name\": \"demo\"}");
        assert!(manifest.read_version().is_err());
        assert!(manifest.write_version("1.0.0").is_err());
    }

    #[test]
    fn test_invalid_json_fails() {
        let dir = TempDir::new().unwrap();
        let manifest = write(&dir, "package.json", "{\"version\": ");
        let err = manifest.read_version().unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_cargo_toml_round_trip_preserves_comments() {
        let dir = TempDir::new().unwrap();
        let original = "[package]\nname = \"demo\"\n# bumped by git-release\nversion = \"0.4.0-pre.1\"\n\n[dependencies]\nsemver = \"1.0\"\n";
        let manifest = write(&dir, "Cargo.toml", original);

        assert_eq!(manifest.read_version().unwrap(), "0.4.0-pre.1");
        manifest.write_version("0.4.0").unwrap();

        let content = fs::read_to_string(manifest.path()).unwrap();
        assert!(content.contains("# bumped by git-release"));
        assert!(content.contains("version = \"0.4.0\""));
        assert!(content.contains("semver = \"1.0\""));
    }

    #[test]
    fn test_cargo_toml_workspace_version() {
        let dir = TempDir::new().unwrap();
        let manifest = write(
            &dir,
            "Cargo.toml",
            "[workspace]\nmembers = [\"a\"]\n\n[workspace.package]\nversion = \"2.1.0\"\n",
        );

        assert_eq!(manifest.read_version().unwrap(), "2.1.0");
        manifest.write_version("2.1.1-pre.0").unwrap();
        assert_eq!(manifest.read_version().unwrap(), "2.1.1-pre.0");
    }
}
