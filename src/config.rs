use crate::markdown::{HtmlOptions, ParseOptions};
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked for in the working directory when no config file is given.
pub const DEFAULT_CONFIG_FILE: &str = "tocmark.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parse: ParseOptions,
    pub html: HtmlOptions,
    /// Page template, used when wrapping output in a full page.
    pub template: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from `path` or, without one, from
    /// [`DEFAULT_CONFIG_FILE`]. An explicitly requested file must exist; the
    /// default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            return Self::from_toml(&source)
                .with_context(|| format!("in config file {}", path.display()));
        }

        match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            // Silently proceed if the file isn't found, but crash on other errors.
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e).context(format!("reading {DEFAULT_CONFIG_FILE}")),
            Ok(s) => Self::from_toml(&s).context(format!("in {DEFAULT_CONFIG_FILE}")),
        }
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
