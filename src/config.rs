use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the bot token. Takes precedence over the file.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// getUpdates long-poll duration used by the dispatcher's default polling.
const LONG_POLL_SECS: u64 = 10;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    /// Fallback directive when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("telegram_bot.log")
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load `.env`, then the optional TOML file, then apply the token from the
    /// environment. Fails if no token is available from either source.
    pub fn load(path: &Path) -> Result<Self> {
        // A missing .env is fine; the variable may come from the real environment.
        dotenvy::dotenv().ok();

        let content = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?
        } else {
            String::new()
        };

        Self::from_parts(&content, std::env::var(TOKEN_ENV_VAR).ok())
            .with_context(|| format!("Invalid configuration (file: {})", path.display()))
    }

    fn from_parts(content: &str, env_token: Option<String>) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).context("Failed to parse config file")?;

        if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
            config.telegram.bot_token = token;
        }
        config.telegram.bot_token = config.telegram.bot_token.trim().to_string();

        if config.telegram.bot_token.is_empty() {
            bail!(
                "{} environment variable is not set. Please set it in your .env file.",
                TOKEN_ENV_VAR
            );
        }

        if config.network.request_timeout_secs <= LONG_POLL_SECS {
            bail!(
                "network.request_timeout_secs must be greater than {}s (long polling)",
                LONG_POLL_SECS
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_token_without_file() {
        let config = Config::from_parts("", Some("123:abc".to_string())).unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.logging.file, PathBuf::from("telegram_bot.log"));
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.network.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.network.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_token_overrides_file() {
        let content = r#"
[telegram]
bot_token = "from-file"
"#;
        let config = Config::from_parts(content, Some("from-env".to_string())).unwrap();
        assert_eq!(config.telegram.bot_token, "from-env");
    }

    #[test]
    fn test_file_token_used_when_env_blank() {
        let content = r#"
[telegram]
bot_token = "from-file"
"#;
        let config = Config::from_parts(content, Some("  ".to_string())).unwrap();
        assert_eq!(config.telegram.bot_token, "from-file");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = Config::from_parts("", None).unwrap_err();
        assert!(err.to_string().contains(TOKEN_ENV_VAR));
    }

    #[test]
    fn test_custom_sections() {
        let content = r#"
[logging]
file = "/var/log/bot.log"
filter = "debug,teloxide=info"

[network]
connect_timeout_secs = 5
request_timeout_secs = 60
"#;
        let config = Config::from_parts(content, Some("t".to_string())).unwrap();
        assert_eq!(config.logging.file, PathBuf::from("/var/log/bot.log"));
        assert_eq!(config.logging.filter, "debug,teloxide=info");
        assert_eq!(config.network.connect_timeout_secs, 5);
        assert_eq!(config.network.request_timeout_secs, 60);
    }

    #[test]
    fn test_request_timeout_must_outlast_long_poll() {
        let content = r#"
[network]
request_timeout_secs = 10
"#;
        assert!(Config::from_parts(content, Some("t".to_string())).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(Config::from_parts("[network\n", Some("t".to_string())).is_err());
    }
}
