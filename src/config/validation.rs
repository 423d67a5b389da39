//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check TLS material and ALPN protocol names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{AppConfig, StorageBackend};

const KNOWN_ALPN: &[&str] = &["h2", "http/1.1", "http/1.0"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate every semantic constraint of `config`.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let server = &config.server;
    if server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", server.bind_address),
        ));
    }
    if server.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::new("server.shutdown_timeout_secs", "must be > 0"));
    }
    if server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be > 0"));
    }

    if let Some(tls) = &server.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("server.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new("server.tls.key_path", "must not be empty"));
        }
        if tls.alpn_protocols.is_empty() {
            errors.push(ValidationError::new("server.tls.alpn_protocols", "must not be empty"));
        }
        for proto in &tls.alpn_protocols {
            if !KNOWN_ALPN.contains(&proto.as_str()) {
                errors.push(ValidationError::new(
                    "server.tls.alpn_protocols",
                    format!("unsupported protocol '{}'", proto),
                ));
            }
        }
    }

    let storage = &config.storage;
    if storage.backend == StorageBackend::Mongodb && storage.uri.trim().is_empty() {
        errors.push(ValidationError::new("storage.uri", "required for the mongodb backend"));
    }
    if storage.database.trim().is_empty() {
        errors.push(ValidationError::new("storage.database", "must not be empty"));
    }
    if storage.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("storage.connect_timeout_secs", "must be > 0"));
    }
    if storage.query_timeout_ms == 0 {
        errors.push(ValidationError::new("storage.query_timeout_ms", "must be > 0"));
    }
    if storage.ping_timeout_ms == 0 {
        errors.push(ValidationError::new("storage.ping_timeout_ms", "must be > 0"));
    }

    let observability = &config.observability;
    if observability.service_name.trim().is_empty() {
        errors.push(ValidationError::new("observability.service_name", "must not be empty"));
    }
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
