use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub format: Option<String>,
}

impl ProfileConfig {
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format.as_deref().and_then(|f| f.parse().ok())
    }

    /// Sets one of the known keys, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => {
                let parsed = url::Url::parse(value)
                    .with_context(|| format!("Invalid server URL: {value}"))?;
                self.server = Some(parsed.as_str().trim_end_matches('/').to_string());
            }
            "format" => {
                value
                    .parse::<OutputFormat>()
                    .map_err(|_| anyhow::anyhow!("Unknown format: {value}. Valid formats: table, json"))?;
                self.format = Some(value.to_ascii_lowercase());
            }
            other => anyhow::bail!("Unknown config key: {other}. Valid keys: server, format"),
        }
        Ok(())
    }
}

pub type ConfigFile = HashMap<String, ProfileConfig>;

/// `~/.clinicdir`, created on first use.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".clinicdir");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

fn load_all(dir: &Path) -> Result<ConfigFile> {
    let path = config_path(dir);
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(&path)?;
    let cfg: ConfigFile =
        toml::from_str(&content).with_context(|| format!("Invalid {}", path.display()))?;
    Ok(cfg)
}

pub fn load_profile_in(dir: &Path, profile: &str) -> Result<ProfileConfig> {
    Ok(load_all(dir)?.remove(profile).unwrap_or_default())
}

pub fn save_profile_in(dir: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all(dir)?;
    all.insert(profile.to_string(), config.clone());
    let content = toml::to_string_pretty(&all)?;
    fs::write(config_path(dir), content)?;
    Ok(())
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    load_profile_in(&config_dir()?, profile)
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_in(&config_dir()?, profile, config)
}

pub fn resolve_server(cli_server: &Option<String>, profile: &str) -> Result<String> {
    // 1. --server flag / CLINICDIR_URL env
    if let Some(s) = cli_server {
        return Ok(s.trim_end_matches('/').to_string());
    }
    // 2. config.toml profile
    let cfg = load_profile(profile)?;
    if let Some(s) = cfg.server {
        return Ok(s);
    }
    // 3. Stored session for this profile
    if let Ok(Some(session)) = crate::auth::load_session(profile) {
        return Ok(session.server);
    }
    anyhow::bail!(
        "No server URL configured. Use --server, set CLINICDIR_URL, or run: clinicdir config set server <url>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_saved_independently() {
        let dir = tempfile::tempdir().unwrap();
        let mut front = ProfileConfig::default();
        front.set("server", "http://localhost:8080/").unwrap();
        save_profile_in(dir.path(), "front", &front).unwrap();

        let mut staging = ProfileConfig::default();
        staging.set("format", "JSON").unwrap();
        save_profile_in(dir.path(), "staging", &staging).unwrap();

        let loaded = load_profile_in(dir.path(), "front").unwrap();
        assert_eq!(loaded.server.as_deref(), Some("http://localhost:8080"));
        assert_eq!(
            load_profile_in(dir.path(), "staging").unwrap().output_format(),
            Some(OutputFormat::Json)
        );
        assert_eq!(
            load_profile_in(dir.path(), "missing").unwrap(),
            ProfileConfig::default()
        );
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        let mut cfg = ProfileConfig::default();
        assert!(cfg.set("colour", "red").is_err());
        assert!(cfg.set("format", "yaml").is_err());
        assert!(cfg.set("server", "not a url").is_err());
        assert_eq!(cfg, ProfileConfig::default());
    }
}
