//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core
//! services, so request handling never reads process-wide environment
//! variables. Binaries read the environment and hand the raw values to the
//! `*_from_env_value` helpers below.

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE, DEFAULT_SUGGESTION_LIMIT,
    MAX_PAGE_SIZE,
};
use crate::{ClinicError, ClinicResult};
use std::str::FromStr;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    api_base: String,
    page_size: u32,
    search_debounce: Duration,
    suggestion_limit: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InvalidConfig` if:
    /// - `api_base` does not start with `/`,
    /// - `page_size` is zero or above the maximum page size,
    /// - `suggestion_limit` is zero.
    pub fn new(
        api_base: impl Into<String>,
        page_size: u32,
        search_debounce: Duration,
        suggestion_limit: usize,
    ) -> ClinicResult<Self> {
        let api_base = api_base.into().trim().trim_end_matches('/').to_string();
        if !api_base.starts_with('/') {
            return Err(ClinicError::InvalidConfig(format!(
                "api base path must start with '/', got: '{api_base}'"
            )));
        }

        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ClinicError::InvalidConfig(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got: {page_size}"
            )));
        }

        if suggestion_limit == 0 {
            return Err(ClinicError::InvalidConfig(
                "suggestion limit cannot be zero".into(),
            ));
        }

        Ok(Self {
            api_base,
            page_size,
            search_debounce,
            suggestion_limit,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Joins a resource path onto the API base, e.g. `prescriptions` becomes
    /// `/api/v1/prescriptions`.
    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.api_base, resource.trim_start_matches('/'))
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    pub fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

/// Parse an optional environment value, falling back to `default` when the
/// value is absent or blank.
///
/// `name` is only used to build the error message.
pub fn parse_env_value<T>(name: &str, value: Option<String>, default: T) -> ClinicResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ClinicError::InvalidConfig(format!("{name}='{raw}': {e}"))),
    }
}

/// Resolve a `CoreConfig` from raw environment values.
///
/// Every argument is the optional raw value of one variable:
/// `DOCFLEX_API_BASE`, `DOCFLEX_PAGE_SIZE`, `DOCFLEX_SEARCH_DEBOUNCE_MS` and
/// `DOCFLEX_SUGGESTION_LIMIT`.
pub fn core_config_from_env_values(
    api_base: Option<String>,
    page_size: Option<String>,
    debounce_ms: Option<String>,
    suggestion_limit: Option<String>,
) -> ClinicResult<CoreConfig> {
    let defaults = CoreConfig::default();
    let api_base = parse_env_value("DOCFLEX_API_BASE", api_base, defaults.api_base.clone())?;
    let page_size = parse_env_value("DOCFLEX_PAGE_SIZE", page_size, defaults.page_size)?;
    let debounce_ms = parse_env_value(
        "DOCFLEX_SEARCH_DEBOUNCE_MS",
        debounce_ms,
        defaults.search_debounce.as_millis() as u64,
    )?;
    let suggestion_limit = parse_env_value(
        "DOCFLEX_SUGGESTION_LIMIT",
        suggestion_limit,
        defaults.suggestion_limit,
    )?;

    CoreConfig::new(
        api_base,
        page_size,
        Duration::from_millis(debounce_ms),
        suggestion_limit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_blank() {
        let cfg = core_config_from_env_values(None, Some("  ".into()), None, None).unwrap();
        assert_eq!(cfg, CoreConfig::default());
        assert_eq!(cfg.search_debounce(), Duration::from_millis(500));
        assert_eq!(cfg.endpoint("/patients"), "/api/v1/patients");
    }

    #[test]
    fn env_values_override_defaults() {
        let cfg = core_config_from_env_values(
            Some("/api/v2/".into()),
            Some("25".into()),
            Some("250".into()),
            Some("5".into()),
        )
        .unwrap();
        assert_eq!(cfg.api_base(), "/api/v2");
        assert_eq!(cfg.page_size(), 25);
        assert_eq!(cfg.search_debounce(), Duration::from_millis(250));
        assert_eq!(cfg.suggestion_limit(), 5);
    }

    #[test]
    fn rejects_unparseable_and_out_of_range_values() {
        let err = core_config_from_env_values(None, Some("ten".into()), None, None).unwrap_err();
        assert!(matches!(err, ClinicError::InvalidConfig(msg) if msg.contains("DOCFLEX_PAGE_SIZE")));

        let err = core_config_from_env_values(None, Some("0".into()), None, None).unwrap_err();
        assert!(matches!(err, ClinicError::InvalidConfig(_)));

        let err = CoreConfig::new("api/v1", 10, DEFAULT_SEARCH_DEBOUNCE, 10).unwrap_err();
        assert!(matches!(err, ClinicError::InvalidConfig(msg) if msg.contains("must start with")));
    }
}
