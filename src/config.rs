use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub aws: AwsConfig,
    pub cost: CostConfig,
    pub cleanup: CleanupConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    /// Pricing API location name (human-readable, e.g. "US East (N. Virginia)").
    /// The Pricing API filters on location strings, not region codes.
    pub pricing_location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostConfig {
    /// Days of daily cost history to fetch (last day is "today")
    pub anomaly_days: i64,
    /// Alert when today's cost exceeds the baseline average by this percent
    pub anomaly_threshold_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Delete unattached volumes older than this many days
    pub volume_age_days: i64,
    /// Delete snapshots older than this many days
    pub snapshot_age_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    /// Name of the environment variable holding the SMTP password.
    /// The password itself is never stored in the config file.
    pub password_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aws: AwsConfig {
                region: "us-east-1".to_string(),
                pricing_location: "US East (N. Virginia)".to_string(),
            },
            cost: CostConfig {
                anomaly_days: 7,
                anomaly_threshold_percent: 50.0,
            },
            cleanup: CleanupConfig {
                volume_age_days: 7,
                snapshot_age_days: 30,
            },
            email: EmailConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                sender: String::new(),
                password_env: "INFRACTL_SMTP_PASSWORD".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .infractl.toml in current dir, then ~/.config/infractl/config.toml
            let local = PathBuf::from(".infractl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("infractl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".infractl.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).with_context(|| {
                let mut err = format!("Failed to parse config: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Missing required fields");
                err.push_str("\n  Tip: Run 'infractl init' to create a new config file");
                err
            })?;
            Ok(config)
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'infractl init' to create a config file.");
            }
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
