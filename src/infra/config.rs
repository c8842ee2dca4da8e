use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Usage report location
    pub report: ReportConfig,

    /// Call-site rewrite settings
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Path of the exported usage report
    pub path: PathBuf,

    /// Root directory the report's file paths are relative to
    pub root: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Function whose call sites are rewritten
    pub function: String,

    /// Replacement function name
    pub replacement: String,

    /// Leading arguments carried over into the rewritten call
    pub keep_args: usize,

    /// Diagnostic function receiving the dropped arguments; empty disables
    pub diagnostic: String,

    /// Paths with these suffixes are parsed but never rewritten
    pub declaration_suffixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report: ReportConfig::default(),
            rewrite: RewriteConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("usages.txt"),
            root: PathBuf::from("."),
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            function: "debug_print".to_string(),
            replacement: "trace_print".to_string(),
            keep_args: 1,
            diagnostic: "trace_note".to_string(),
            declaration_suffixes: vec![".h".to_string()],
        }
    }
}

pub fn load_config() -> Result<Config> {
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["resite.toml", ".resite.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with RESITE_ prefix
    builder = builder.add_source(config::Environment::with_prefix("RESITE").separator("_"));

    let cfg = builder.build().context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(args: InitArgs, ctx: &AppContext) -> Result<()> {
    let config_path = args.path.join("resite.toml");

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
