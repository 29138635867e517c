use std::env;
use anyhow::{Result, Context};
use tracing::{info, warn};

/// Extra bytes allowed on top of the file limit for multipart framing
/// (boundaries, part headers, small sibling fields).
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub max_concurrent_requests: usize,
    pub request_timeout_seconds: u64,
    pub extraction_timeout_seconds: u64,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            max_file_size_mb: 15,
            max_concurrent_requests: 100,
            request_timeout_seconds: 60,
            extraction_timeout_seconds: 30,
            static_dir: "public".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        // PORT is what most PaaS hosts inject; it wins over SERVER_PORT.
        let server_port = match lookup("PORT") {
            Some(_) => Self::parse_var(&lookup, "PORT", defaults.server_port),
            None => Self::parse_var(&lookup, "SERVER_PORT", defaults.server_port),
        };

        let config = Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| {
                info!("SERVER_HOST not set, using default: {}", defaults.server_host);
                defaults.server_host.clone()
            }),
            server_port,
            max_file_size_mb: Self::parse_var(&lookup, "MAX_FILE_SIZE_MB", defaults.max_file_size_mb),
            max_concurrent_requests: Self::parse_var(
                &lookup,
                "MAX_CONCURRENT_REQUESTS",
                defaults.max_concurrent_requests,
            ),
            request_timeout_seconds: Self::parse_var(
                &lookup,
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            extraction_timeout_seconds: Self::parse_var(
                &lookup,
                "EXTRACTION_TIMEOUT_SECONDS",
                defaults.extraction_timeout_seconds,
            ),
            static_dir: lookup("STATIC_DIR").unwrap_or(defaults.static_dir),
        };

        config.validate().context("Invalid configuration")?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> T
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match lookup(var_name) {
            Some(val) => match val.trim().parse() {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    default
                }
            },
            None => {
                info!("{} not set, using default: {:?}", var_name, default);
                default
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_REQUESTS must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be greater than 0"));
        }
        if self.extraction_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("EXTRACTION_TIMEOUT_SECONDS must be greater than 0"));
        }
        Ok(())
    }

    /// Largest accepted file part, in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Largest accepted request body: the file limit plus multipart framing.
    pub fn max_body_bytes(&self) -> usize {
        self.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
