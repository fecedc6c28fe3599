//! Resolver configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Install locations probed when conda is neither on `PATH` nor registered.
pub const KNOWN_CONDA_LOCATIONS: [&str; 6] = [
    "~/anaconda/bin/conda",
    "~/miniconda/bin/conda",
    "~/anaconda2/bin/conda",
    "~/miniconda2/bin/conda",
    "~/anaconda3/bin/conda",
    "~/miniconda3/bin/conda",
];

/// Settings for a [`CondaResolver`](crate::CondaResolver).
///
/// Every field has a default, so a config file only needs to name what it
/// changes:
///
/// ```toml
/// command = "conda"
/// known_locations = ["~/mambaforge/bin/conda"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Bare command name; also the final fallback result
    pub command: String,
    /// Arguments that make the command print its version
    pub version_args: Vec<String>,
    /// Executable looked up next to a registry-registered interpreter
    pub windows_executable: String,
    /// Candidate paths, `~` allowed, probed in order
    pub known_locations: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            command: "conda".to_string(),
            version_args: vec!["--version".to_string()],
            windows_executable: "conda.exe".to_string(),
            known_locations: KNOWN_CONDA_LOCATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolverConfig {
    /// Load a config file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if extension != "toml" && extension != "json" {
            return Err(Error::UnsupportedFormat { extension });
        }

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        if extension == "toml" {
            toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "TOML".into(),
                message: e.to_string(),
            })
        } else {
            serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_probes_six_locations() {
        let config = ResolverConfig::default();
        assert_eq!(config.command, "conda");
        assert_eq!(config.version_args, vec!["--version"]);
        assert_eq!(config.windows_executable, "conda.exe");
        assert_eq!(config.known_locations.len(), 6);
        assert!(config.known_locations.iter().all(|l| l.starts_with("~/")));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ResolverConfig = toml::from_str(r#"command = "mamba""#).unwrap();
        assert_eq!(config.command, "mamba");
        assert_eq!(config.known_locations, ResolverConfig::default().known_locations);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<ResolverConfig, _> = toml::from_str("comand = \"conda\"");
        assert!(result.is_err());
    }
}
