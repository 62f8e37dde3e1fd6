use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;

/// Configuration file looked up in the current directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "tubefetch.toml";

const ENV_PREFIX: &str = "TUBEFETCH";

/// Settings that rarely change between two runs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Where the videos are written
    pub download_dir: PathBuf,

    /// Number of retries for a single stream download
    pub max_retries: u32,

    /// Zero-padding width of the video numbers
    pub digits: usize,

    /// Prefix the file names with the video number
    pub numbering: bool,
}

impl Settings {
    /// Load the settings, from lowest to highest priority:
    /// built-in defaults, the configuration file, `TUBEFETCH_*` environment variables.
    ///
    /// A missing `path` is an error, a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .set_default("download_dir", "downloads")
            .and_then(|b| b.set_default("max_retries", 3))
            .and_then(|b| b.set_default("digits", 3))
            .and_then(|b| b.set_default("numbering", true))
            .into_diagnostic()?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .into_diagnostic()
            .wrap_err("Could not load the configuration")?
            .try_deserialize()
            .into_diagnostic()
            .wrap_err("Invalid configuration")
    }
}
