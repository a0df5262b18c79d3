//! Persisted CLI configuration.
//!
//! Lets the command surface remember the API token (and an optional
//! server override) between runs, so it does not have to be passed on
//! every invocation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Get the path to the Relwarc config file. A `relwarc.config` in the
/// current directory wins over `~/.relwarc/config.json`.
pub fn get_config_path() -> Result<PathBuf, io::Error> {
    let local_config_path = std::env::current_dir()?.join("relwarc.config");
    if local_config_path.exists() {
        return Ok(local_config_path);
    }

    let home_path = home::home_dir().ok_or(io::Error::new(
        io::ErrorKind::NotFound,
        "Home directory not found",
    ))?;
    Ok(home_path.join(".relwarc").join("config.json"))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API token presented on every submission. Empty when not logged in.
    #[serde(default)]
    pub api_token: String,

    /// Server address override. Empty means the well-known default.
    #[serde(default)]
    pub server_addr: String,
}

impl Config {
    pub fn new(api_token: String, server_addr: String) -> Self {
        Config {
            api_token,
            server_addr,
        }
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method
    /// overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Remove the saved configuration file, if any.
    pub fn clear(path: &Path) -> io::Result<()> {
        // Refuse to delete anything that is not one of our config files.
        match path.file_name().and_then(|n| n.to_str()) {
            Some("config.json") | Some("relwarc.config") => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "Path is not a Relwarc config file",
                ))
            }
        }

        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::new("tok-123".into(), "https://relwarc.example".into());
        config.save(&path).unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.api_token, "");
        assert_eq!(config.server_addr, "");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from_file(&path).is_err());
    }

    #[test]
    fn clear_removes_only_config_files() {
        let dir = tempdir().unwrap();

        let path = dir.path().join("config.json");
        Config::new("t".into(), String::new()).save(&path).unwrap();
        Config::clear(&path).unwrap();
        assert!(!path.exists());

        // Absent file is fine.
        Config::clear(&path).unwrap();

        // Anything else is refused.
        let other = dir.path().join("important.txt");
        fs::write(&other, "keep me").unwrap();
        assert!(Config::clear(&other).is_err());
        assert!(other.exists());
    }
}
