use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::str::FromStr;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format `{other}` (expected text or json)"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

// rolesctl configuration sourced from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolesCtlConfig {
    pub output: OutputFormat,
    pub log_filter: String,
}

#[derive(Debug, Deserialize)]
struct RolesCtlConfigOverride {
    output: Option<OutputFormat>,
    log_filter: Option<String>,
}

impl RolesCtlConfig {
    pub fn from_env() -> Result<Self> {
        let output = match std::env::var("WARDEN_ROLESCTL_OUTPUT") {
            Ok(value) => value
                .parse()
                .with_context(|| "parse WARDEN_ROLESCTL_OUTPUT")?,
            Err(_) => OutputFormat::default(),
        };
        let log_filter = std::env::var("WARDEN_LOG").unwrap_or_else(|_| "info".to_string());
        Ok(Self { output, log_filter })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("WARDEN_ROLESCTL_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read WARDEN_ROLESCTL_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: RolesCtlConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse rolesctl config yaml")?;
        if let Some(value) = override_cfg.output {
            self.output = value;
        }
        if let Some(value) = override_cfg.log_filter {
            self.log_filter = value;
        }
        Ok(())
    }
}
