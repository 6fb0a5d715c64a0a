use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use tracing::{info, warn};

// Import logging macros
use crate::{log_system_event, log_validation};

/// Complete application configuration loaded from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// Generation backend (Ollama-compatible) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Base address used to build returned file URLs
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub directory: String,
}

/// Logging system configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub console_enabled: bool,
    pub log_directory: String,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Runs before the tracing subscriber exists, so it does not log.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            generator: GeneratorConfig::from_env()?,
            server: ServerConfig::from_env()?,
            upload: UploadConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Log a summary of loaded configuration
    pub fn log_configuration_summary(&self) {
        log_system_event!(config, "Configuration loaded successfully");
        info!(
            generator_endpoint = %self.generator.endpoint,
            generator_model = %self.generator.model,
            server_address = %self.server.bind_address(),
            public_base_url = %self.server.public_base_url,
            upload_directory = %self.upload.directory,
            log_level = %self.logging.level,
            "Configuration summary"
        );
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("Server port must be greater than 0"));
        }

        if !is_http_url(&self.generator.endpoint) {
            return Err(anyhow!(
                "OLLAMA_URL must start with 'http://' or 'https://', got '{}'",
                self.generator.endpoint
            ));
        }

        if !is_http_url(&self.server.public_base_url) {
            return Err(anyhow!(
                "PUBLIC_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.server.public_base_url
            ));
        }

        if self.generator.model.trim().is_empty() {
            return Err(anyhow!("OLLAMA_MODEL must not be empty"));
        }

        if self.upload.directory.trim().is_empty() {
            return Err(anyhow!("UPLOAD_DIR must not be empty"));
        }

        if !self.logging.file_enabled && !self.logging.console_enabled {
            warn!("Both file and console logging are disabled - no log output will be produced");
        }

        log_validation!(success, "configuration", "Configuration validation completed successfully");
        Ok(())
    }
}

impl GeneratorConfig {
    fn from_env() -> Result<Self> {
        let endpoint = env::var("OLLAMA_URL")
            .unwrap_or_else(|_| "http://localhost:11434/api/generate".to_string());

        let model = env::var("OLLAMA_MODEL")
            .unwrap_or_else(|_| "mistral:7b-instruct".to_string());

        Ok(GeneratorConfig { endpoint, model })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self> {
        let port_str = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string());

        let port = port_str.parse::<u16>()
            .map_err(|_| anyhow!("Invalid PORT value: '{}'. Must be a number between 1-65535", port_str))?;

        let host = env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        Ok(ServerConfig { port, host, public_base_url })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl UploadConfig {
    fn from_env() -> Result<Self> {
        let directory = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".to_string());

        Ok(UploadConfig { directory })
    }
}

impl LoggingConfig {
    fn from_env() -> Result<Self> {
        let level = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info,quiz_generator=debug".to_string());

        let file_enabled = env::var("LOG_FILE_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        let console_enabled = env::var("LOG_CONSOLE_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        let log_directory = env::var("LOG_DIRECTORY")
            .unwrap_or_else(|_| "logs".to_string());

        Ok(LoggingConfig {
            level,
            file_enabled,
            console_enabled,
            log_directory,
        })
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn valid_config() -> Config {
        Config {
            generator: GeneratorConfig {
                endpoint: "http://localhost:11434/api/generate".to_string(),
                model: "mistral:7b-instruct".to_string(),
            },
            server: ServerConfig {
                port: 8000,
                host: "0.0.0.0".to_string(),
                public_base_url: "http://localhost:8000".to_string(),
            },
            upload: UploadConfig {
                directory: "uploads".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_enabled: true,
                console_enabled: true,
                log_directory: "logs".to_string(),
            },
        }
    }

    #[test]
    fn test_config_validation() {
        let config = valid_config();
        assert!(config.validate().is_ok());

        let mut invalid_port = config.clone();
        invalid_port.server.port = 0;
        assert!(invalid_port.validate().is_err());

        let mut invalid_endpoint = config.clone();
        invalid_endpoint.generator.endpoint = "localhost:11434".to_string();
        assert!(invalid_endpoint.validate().is_err());

        let mut empty_model = config.clone();
        empty_model.generator.model = "  ".to_string();
        assert!(empty_model.validate().is_err());

        let mut bad_base_url = config;
        bad_base_url.server.public_base_url = "ftp://files".to_string();
        assert!(bad_base_url.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = valid_config();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_configuration_summary_logged_once() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let config = Config::from_env().unwrap();
            config.log_configuration_summary();
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("Configuration summary").count(), 1);
        assert_eq!(output.matches("Configuration loaded successfully").count(), 1);
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://localhost:8000"));
        assert!(is_http_url("https://quiz.example.com"));
        assert!(!is_http_url("localhost:8000"));
    }
}
