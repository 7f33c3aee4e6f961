//! npmapi.toml configuration parsing and serialization

use std::time::Duration;
use serde::{Deserialize, Serialize};
use npmapi_core::error::NpmError;
use crate::ConfigResult;

/// Complete npmapi.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiToml {
    /// Service endpoints
    #[serde(default)]
    pub registry: RegistrySection,

    /// Transport settings
    #[serde(default)]
    pub http: HttpSection,

    /// Retry policy for single round trips
    #[serde(default)]
    pub retry: RetrySection,
}

/// Service endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistrySection {
    /// Package registry base URL
    pub url: String,

    /// Download statistics base URL
    pub downloads_url: String,

    /// npms.io API base URL
    pub score_url: String,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            url: "https://registry.npmjs.org".to_string(),
            downloads_url: "https://api.npmjs.org".to_string(),
            score_url: "https://api.npms.io/v2".to_string(),
        }
    }
}

/// Transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HttpSection {
    /// Per-request timeout in seconds, 0 disables it
    pub timeout_secs: u64,

    /// User agent override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Chunks buffered between the listing body and its decoder
    pub listing_buffer: usize,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: 0,
            user_agent: None,
            listing_buffer: 32,
        }
    }
}

impl HttpSection {
    /// Timeout as a duration, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Exponential backoff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RetrySection {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 10_000,
            multiplier: 2.0,
        }
    }
}

/// Parse TOML string to ApiToml configuration
pub fn parse_config(content: &str) -> ConfigResult<ApiToml> {
    let config: ApiToml = ::toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(content, span.start))
            .unwrap_or((0, 0));
        NpmError::TomlParse {
            message: e.message().to_string(),
            line,
            column,
        }
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize ApiToml to TOML string
pub fn serialize_config(config: &ApiToml) -> ConfigResult<String> {
    ::toml::to_string_pretty(config).map_err(|e| NpmError::TomlParse {
        message: format!("TOML serialization error: {}", e),
        line: 0,
        column: 0,
    })
}

/// Validate configuration values
pub fn validate_config(config: &ApiToml) -> ConfigResult<()> {
    validate_url("registry.url", &config.registry.url)?;
    validate_url("registry.downloads-url", &config.registry.downloads_url)?;
    validate_url("registry.score-url", &config.registry.score_url)?;

    if config.http.listing_buffer == 0 {
        return Err(NpmError::ConfigValidation {
            field: "http.listing-buffer".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if !config.retry.multiplier.is_finite() || config.retry.multiplier < 1.0 {
        return Err(NpmError::ConfigValidation {
            field: "retry.multiplier".to_string(),
            reason: format!("must be a finite number >= 1.0, got {}", config.retry.multiplier),
        });
    }

    if config.retry.initial_delay_ms > config.retry.max_delay_ms {
        return Err(NpmError::ConfigValidation {
            field: "retry.initial-delay-ms".to_string(),
            reason: format!(
                "{} exceeds retry.max-delay-ms ({})",
                config.retry.initial_delay_ms, config.retry.max_delay_ms
            ),
        });
    }

    Ok(())
}

/// Load and parse npmapi.toml from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<ApiToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| NpmError::io(format!("Failed to read {}", path), e))?;

    parse_config(&content).map_err(|e| match e {
        NpmError::TomlParse { message, line, column } => NpmError::TomlParse {
            message: format!("in file {}: {}", path, message),
            line,
            column,
        },
        NpmError::ConfigValidation { field, reason } => NpmError::ConfigValidation {
            field,
            reason: format!("{} (in file {})", reason, path),
        },
        other => other,
    })
}

fn validate_url(field: &str, value: &str) -> ConfigResult<()> {
    let parsed = url::Url::parse(value).map_err(|e| NpmError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(NpmError::ConfigValidation {
            field: field.to_string(),
            reason: format!("'{}' must use http or https", value),
        });
    }

    Ok(())
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |tail| tail.chars().count()) + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ApiToml::default());
        assert_eq!(config.registry.url, "https://registry.npmjs.org");
        assert_eq!(config.http.timeout(), None);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[registry]
url = "http://localhost:4873"
downloads-url = "http://localhost:4874"

[http]
timeout-secs = 30
user-agent = "mirror-sync/1.0"
listing-buffer = 8

[retry]
max-retries = 5
initial-delay-ms = 250
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.registry.url, "http://localhost:4873");
        assert_eq!(config.registry.downloads_url, "http://localhost:4874");
        assert_eq!(config.registry.score_url, "https://api.npms.io/v2");
        assert_eq!(config.http.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.http.user_agent.as_deref(), Some("mirror-sync/1.0"));
        assert_eq!(config.http.listing_buffer, 8);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_delay_ms, 250);
        assert_eq!(config.retry.max_delay_ms, 10_000);
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let toml = "[http]\ntimeout-secs = = 3\n";

        match parse_config(toml).unwrap_err() {
            NpmError::TomlParse { line, column, .. } => {
                assert_eq!(line, 2);
                assert!(column > 1);
            }
            other => panic!("Expected TomlParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = parse_config("[http]\ntimeout = 3\n");
        assert!(matches!(result, Err(NpmError::TomlParse { .. })));
    }

    #[test]
    fn test_invalid_url() {
        let result = parse_config("[registry]\nurl = \"ftp://example.com\"\n");
        match result.unwrap_err() {
            NpmError::ConfigValidation { field, .. } => assert_eq!(field, "registry.url"),
            other => panic!("Expected ConfigValidation error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_listing_buffer() {
        let result = parse_config("[http]\nlisting-buffer = 0\n");
        assert!(matches!(result, Err(NpmError::ConfigValidation { .. })));
    }

    #[test]
    fn test_retry_bounds() {
        assert!(parse_config("[retry]\nmultiplier = 0.5\n").is_err());
        assert!(parse_config("[retry]\ninitial-delay-ms = 20000\n").is_err());
    }

    #[test]
    fn test_round_trip_serialization() {
        let mut config = ApiToml::default();
        config.http.timeout_secs = 12;
        config.http.user_agent = Some("npmapi-test".to_string());

        let serialized = serialize_config(&config).unwrap();
        assert_eq!(parse_config(&serialized).unwrap(), config);
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(line_column("ab\ncd", 4), (2, 2));
    }
}
