use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::errors::{Error, Result};

/// Load a YAML or JSON config file, picking the parser from the extension
pub fn load_config_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Loading config file {}", path.display());
    match extension_of(path).as_deref() {
        Some("yaml" | "yml") => load_from_yaml(path),
        Some("json") => load_from_json(path),
        _ => Err(Error::UnsupportedConfig {
            path: path.to_path_buf(),
        }),
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn load_from_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_yml::from_str(&text)?)
}

fn load_from_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_yaml_and_json_entrant_lists() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("entrants.yaml");
        let json = dir.path().join("entrants.json");
        fs::write(&yaml, "- Thaya\n- Hamaon\n").unwrap();
        fs::write(&json, r#"["Thaya", "Hamaon"]"#).unwrap();

        let from_yaml: Vec<String> = load_config_file(&yaml).unwrap();
        let from_json: Vec<String> = load_config_file(&json).unwrap();

        assert_eq!(from_yaml, vec!["Thaya", "Hamaon"]);
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_unsupported_extension_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let toml = dir.path().join("entrants.toml");
        fs::write(&toml, "names = []").unwrap();

        let result: Result<Vec<String>> = load_config_file(&toml);

        assert!(matches!(result, Err(Error::UnsupportedConfig { .. })));
    }
}
