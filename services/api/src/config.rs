use eduaccess_core::{quiz::QuizFormat, session::SessionConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// OpenAI-compatible chat completion backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Groq,
    OpenAI,
    Gemini,
}

impl Provider {
    pub fn api_base(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAI => "https://api.openai.com/v1/",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn key_var(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub provider: Provider,
    pub api_key: String,
    pub chat_model: String,
    pub quiz_format: QuizFormat,
    pub decay_interval: Duration,
    pub quiz_cooldown: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5001".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let provider_str = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "groq".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "groq" => Provider::Groq,
            "openai" => Provider::OpenAI,
            "gemini" => Provider::Gemini,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LLM_PROVIDER".to_string(),
                    format!("'{}' is not one of groq, openai, gemini", other),
                ));
            }
        };

        let api_key = std::env::var(provider.key_var()).map_err(|_| {
            ConfigError::MissingVar(format!(
                "{} must be set for '{}' provider",
                provider.key_var(),
                provider_str.to_lowercase()
            ))
        })?;

        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| "llama-3.1-8b-instant".to_string());

        let quiz_format = match std::env::var("QUIZ_FORMAT") {
            Ok(value) => value
                .parse::<QuizFormat>()
                .map_err(|e| ConfigError::InvalidValue("QUIZ_FORMAT".to_string(), e.to_string()))?,
            Err(_) => QuizFormat::default(),
        };

        let decay_interval = seconds_var("DECAY_INTERVAL_SECS", 6)?;
        let quiz_cooldown = seconds_var("QUIZ_COOLDOWN_SECS", 20)?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            provider,
            api_key,
            chat_model,
            quiz_format,
            decay_interval,
            quiz_cooldown,
            log_level,
        })
    }

    /// Focus-session tunables with the timings taken from the environment.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            decay_interval: self.decay_interval,
            quiz_cooldown: self.quiz_cooldown,
            ..SessionConfig::default()
        }
    }
}

/// Reads a positive whole number of seconds, falling back to `default`.
fn seconds_var(name: &str, default: u64) -> Result<Duration, ConfigError> {
    let secs = match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))?,
        Err(_) => default,
    };
    if secs == 0 {
        return Err(ConfigError::InvalidValue(
            name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("LLM_PROVIDER");
            env::remove_var("GROQ_API_KEY");
            env::remove_var("OPENAI_API_KEY");
            env::remove_var("GEMINI_API_KEY");
            env::remove_var("CHAT_MODEL");
            env::remove_var("QUIZ_FORMAT");
            env::remove_var("DECAY_INTERVAL_SECS");
            env::remove_var("QUIZ_COOLDOWN_SECS");
            env::remove_var("RUST_LOG");
        }
    }

    fn set_minimal_env_groq() {
        unsafe {
            env::set_var("GROQ_API_KEY", "test-groq-key");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    fn test_provider_endpoints() {
        assert_eq!(Provider::Groq.api_base(), "https://api.groq.com/openai/v1");
        assert_eq!(Provider::OpenAI.key_var(), "OPENAI_API_KEY");
        assert!(Provider::Gemini.api_base().contains("generativelanguage"));
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal_groq() {
        clear_env_vars();
        set_minimal_env_groq();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:5001");
        assert_eq!(config.provider, Provider::Groq);
        assert_eq!(config.api_key, "test-groq-key");
        assert_eq!(config.chat_model, "llama-3.1-8b-instant");
        assert_eq!(config.quiz_format, QuizFormat::Structured);
        assert_eq!(config.decay_interval, Duration::from_secs(6));
        assert_eq!(config.quiz_cooldown, Duration::from_secs(20));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("LLM_PROVIDER", "Gemini");
            env::set_var("GEMINI_API_KEY", "test-gemini-key");
            env::set_var("CHAT_MODEL", "gemini-1.5-flash");
            env::set_var("QUIZ_FORMAT", "freeform");
            env::set_var("DECAY_INTERVAL_SECS", "3");
            env::set_var("QUIZ_COOLDOWN_SECS", "45");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.api_key, "test-gemini-key");
        assert_eq!(config.chat_model, "gemini-1.5-flash");
        assert_eq!(config.quiz_format, QuizFormat::Freeform);
        assert_eq!(config.log_level, Level::DEBUG);

        let session = config.session_config();
        assert_eq!(session.decay_interval, Duration::from_secs(3));
        assert_eq!(session.quiz_cooldown, Duration::from_secs(45));
        assert_eq!(session.initial_engagement, 100);
        assert_eq!(session.quiz_threshold, 40);
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        set_minimal_env_groq();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_unknown_provider() {
        clear_env_vars();
        unsafe {
            env::set_var("LLM_PROVIDER", "anthropic");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "LLM_PROVIDER"),
            _ => panic!("Expected InvalidValue for LLM_PROVIDER"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_provider_key() {
        clear_env_vars();
        unsafe {
            env::set_var("LLM_PROVIDER", "openai");
            env::set_var("GROQ_API_KEY", "wrong-provider-key");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => assert!(msg.contains("OPENAI_API_KEY")),
            _ => panic!("Expected MissingVar for OPENAI_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_quiz_format() {
        clear_env_vars();
        set_minimal_env_groq();
        unsafe {
            env::set_var("QUIZ_FORMAT", "essay");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "QUIZ_FORMAT"),
            _ => panic!("Expected InvalidValue for QUIZ_FORMAT"),
        }
    }

    #[test]
    #[serial]
    fn test_config_zero_decay_interval_rejected() {
        clear_env_vars();
        set_minimal_env_groq();
        unsafe {
            env::set_var("DECAY_INTERVAL_SECS", "0");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "DECAY_INTERVAL_SECS"),
            _ => panic!("Expected InvalidValue for DECAY_INTERVAL_SECS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env_groq();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }
}
