//! Configuration loading.
//!
//! The configuration lives at `<user config dir>/cmdgen/config.toml`. A
//! missing file is not fatal: callers fall back to the built-in defaults and
//! warn the user.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_PROMPT_TEMPLATE: &str = "\
You are a command line expert. Generate 5 shell command alternatives that \
implement the following description. Answer with a JSON array of command \
strings and nothing else.

{{ user_input }}
";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model_name: String,
    pub prompt_template: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model_name: "gpt-4o-mini".to_string(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    /// Read the configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Read the configuration from an explicit TOML file path. Fields absent
    /// from the file keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("no user config directory available")?
            .join("cmdgen")
            .join("config.toml"))
    }

    /// The computed configuration rendered as TOML, for `config show`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing configuration")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let cfg = Config::default();
        assert_eq!(cfg.llm.provider, "openai");
        assert!(!cfg.llm.model_name.is_empty());
        assert!(cfg.llm.prompt_template.contains("{{ user_input }}"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[llm]\nmodel_name = \"gpt-4o\"").unwrap();
        drop(file);

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.llm.model_name, "gpt-4o");
        assert_eq!(cfg.llm.provider, "openai");
        assert_eq!(cfg.llm.prompt_template, Config::default().llm.prompt_template);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn toml_round_trip() {
        let cfg = Config::default();
        let rendered = cfg.to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.llm.model_name, cfg.llm.model_name);
        assert_eq!(parsed.llm.prompt_template, cfg.llm.prompt_template);
    }
}
