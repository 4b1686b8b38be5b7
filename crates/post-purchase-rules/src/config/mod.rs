use crate::workflows::orders::{EditWindow, Industry, RulesConfig};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub rules: RulesConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            rules: load_rules()?,
        })
    }
}

fn load_rules() -> Result<RulesConfig, ConfigError> {
    let defaults = RulesConfig::default();

    let default_window = match env::var("RULES_DEFAULT_WINDOW") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(EditWindow::from_minutes)
            .ok_or(ConfigError::InvalidDefaultWindow { value: raw })?,
        Err(_) => defaults.default_window,
    };

    let conservative = env_flag("RULES_CONSERVATIVE", defaults.conservative)?;
    let enable_upsell = env_flag("RULES_ENABLE_UPSELL", defaults.enable_upsell)?;

    let default_industry = match env::var("RULES_INDUSTRY") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => match Industry::parse(&raw) {
            Some(industry) => Some(industry),
            None => return Err(ConfigError::UnknownIndustry { value: raw }),
        },
        Err(_) => defaults.default_industry,
    };

    Ok(RulesConfig {
        default_window,
        conservative,
        enable_upsell,
        default_industry,
    })
}

fn env_flag(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { var, value: raw }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDefaultWindow { value: String },
    InvalidFlag { var: &'static str, value: String },
    UnknownIndustry { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDefaultWindow { value } => write!(
                f,
                "RULES_DEFAULT_WINDOW must be one of 10, 15, 20, 25 or 30 (found '{}')",
                value
            ),
            ConfigError::InvalidFlag { var, value } => {
                write!(f, "{} must be true or false (found '{}')", var, value)
            }
            ConfigError::UnknownIndustry { value } => write!(
                f,
                "RULES_INDUSTRY must be one of {} (found '{}')",
                Industry::ALLOWED.join(", "),
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDefaultWindow { .. }
            | ConfigError::InvalidFlag { .. }
            | ConfigError::UnknownIndustry { .. } => None,
        }
    }
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) fn env_guard() -> &'static std::sync::Mutex<()> {
    static GUARD: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    GUARD.get_or_init(|| std::sync::Mutex::new(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn reset_env() {
        for var in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "RULES_DEFAULT_WINDOW",
            "RULES_CONSERVATIVE",
            "RULES_ENABLE_UPSELL",
            "RULES_INDUSTRY",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.rules, RulesConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_rule_settings_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RULES_DEFAULT_WINDOW", "20");
        env::set_var("RULES_CONSERVATIVE", "yes");
        env::set_var("RULES_ENABLE_UPSELL", "false");
        env::set_var("RULES_INDUSTRY", "Electronics");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(
            config.rules,
            RulesConfig {
                default_window: EditWindow::Twenty,
                conservative: true,
                enable_upsell: false,
                default_industry: Some(Industry::Electronics),
            }
        );
    }

    #[test]
    fn rejects_windows_outside_the_fixed_set() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RULES_DEFAULT_WINDOW", "12");

        let error = AppConfig::load().expect_err("12 is not a valid window");
        reset_env();

        assert!(matches!(
            error,
            ConfigError::InvalidDefaultWindow { ref value } if value == "12"
        ));
    }

    #[test]
    fn rejects_unrecognised_flags_and_industries() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RULES_CONSERVATIVE", "maybe");
        let error = AppConfig::load().expect_err("flag must be boolean");
        assert!(error.to_string().starts_with("RULES_CONSERVATIVE"));

        reset_env();
        env::set_var("RULES_INDUSTRY", "furniture");
        let error = AppConfig::load().expect_err("industry must be known");
        reset_env();
        assert!(matches!(error, ConfigError::UnknownIndustry { .. }));
    }
}
