use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub aws: AwsConfig,
    pub retention: RetentionConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Default region for single-region commands
    pub region: String,
    pub default_instance_type: String,
    /// AMI name pattern used by `instance create`
    pub image_name_pattern: String,
    /// AMI owner account (Canonical's account by default)
    pub image_owner: String,
    pub image_architecture: String,
    /// Directory for downloaded private keys (default: ~/ec2_keys)
    pub key_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Days an unused AMI is kept before `reclaim images` deregisters it
    pub image_keep_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub region: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body_html: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aws: AwsConfig {
                region: "us-west-2".to_string(),
                default_instance_type: "t2.micro".to_string(),
                image_name_pattern: "ubuntu/images/hvm-ssd/ubuntu-focal-20.04-amd64-server-*"
                    .to_string(),
                image_owner: "099720109477".to_string(), // Canonical
                image_architecture: "x86_64".to_string(),
                key_dir: None, // Resolved to ~/ec2_keys at use time
            },
            retention: RetentionConfig { image_keep_days: 0 },
            email: EmailConfig {
                region: "us-west-2".to_string(),
                from: "ops@example.com".to_string(),
                to: "oncall@example.com".to_string(),
                subject: "fleetctl notification".to_string(),
                body_html: "<p>This is the body of the email.</p>".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .fleetctl.toml in current dir, then ~/.config/fleetctl/config.toml
            let local = PathBuf::from(".fleetctl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("fleetctl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".fleetctl.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'fleetctl init' to create one.");
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

    /// Validate config values at entry, rather than failing mid-operation
    pub fn validate(&self) -> Result<()> {
        crate::validation::validate_region(&self.aws.region)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        crate::validation::validate_region(&self.email.region)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        if self.retention.image_keep_days < 0 {
            anyhow::bail!(
                "retention.image_keep_days must be >= 0, got {}",
                self.retention.image_keep_days
            );
        }
        Ok(())
    }

    /// Directory where downloaded private keys are stored
    pub fn key_dir(&self) -> PathBuf {
        self.aws.key_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ec2_keys")
        })
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
