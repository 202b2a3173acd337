//! Runtime configuration, read once at startup from the environment
//! (after loading an optional `.env`).

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEV_SECRET: &str = "papeleria-dev-secret";

/// One year. Longer sessions are refused at startup.
pub const MAX_SESSION_AGE_SECS: u64 = 365 * 24 * 60 * 60;
pub const MAX_REFRESH_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Upstream REST base, e.g. `http://localhost:4000/api`.
    pub backend_url: String,
    pub auth_secret: String,
    pub session_max_age: Duration,
    pub dashboard_refresh: Duration,
    pub reports_refresh: Duration,
    pub low_stock_threshold: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            backend_url: "http://localhost:4000/api".to_string(),
            auth_secret: DEV_SECRET.to_string(),
            session_max_age: Duration::from_secs(30 * 24 * 60 * 60),
            dashboard_refresh: Duration::from_secs(45),
            reports_refresh: Duration::from_secs(60),
            low_stock_threshold: 3,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(v) = get("BIND_ADDR") {
            config.bind_addr = parse("BIND_ADDR", v)?;
        }
        if let Some(v) = get("BACKEND_URL") {
            config.backend_url = v;
        }
        match get("AUTH_SECRET") {
            Some(v) => config.auth_secret = v,
            None => tracing::warn!("AUTH_SECRET not set; using insecure dev default"),
        }
        if let Some(v) = get("SESSION_MAX_AGE_SECS") {
            config.session_max_age = Duration::from_secs(positive("SESSION_MAX_AGE_SECS", v, MAX_SESSION_AGE_SECS)?);
        }
        if let Some(v) = get("DASHBOARD_REFRESH_SECS") {
            config.dashboard_refresh = Duration::from_secs(positive("DASHBOARD_REFRESH_SECS", v, MAX_REFRESH_SECS)?);
        }
        if let Some(v) = get("REPORTS_REFRESH_SECS") {
            config.reports_refresh = Duration::from_secs(positive("REPORTS_REFRESH_SECS", v, MAX_REFRESH_SECS)?);
        }
        if let Some(v) = get("LOW_STOCK_THRESHOLD") {
            config.low_stock_threshold = parse("LOW_STOCK_THRESHOLD", v)?;
        }
        Ok(config)
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
        value,
    })
}

fn positive(name: &'static str, value: String, max: u64) -> Result<u64, ConfigError> {
    let parsed: u64 = parse(name, value.clone())?;
    if parsed == 0 || parsed > max {
        return Err(ConfigError::Invalid {
            name,
            value,
            reason: format!("must be greater than zero and at most {max}"),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.backend_url, "http://localhost:4000/api");
        assert_eq!(config.session_max_age, Duration::from_secs(2_592_000));
        assert_eq!(config.dashboard_refresh, Duration::from_secs(45));
        assert_eq!(config.reports_refresh, Duration::from_secs(60));
        assert_eq!(config.low_stock_threshold, 3);
    }

    #[test]
    fn reads_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:8081"),
            ("BACKEND_URL", "http://backend:4000/api"),
            ("AUTH_SECRET", "s3cret"),
            ("LOW_STOCK_THRESHOLD", "5"),
            ("REPORTS_REFRESH_SECS", "  "),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8081);
        assert_eq!(config.auth_secret, "s3cret");
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.reports_refresh, Duration::from_secs(60));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = ApiConfig::from_lookup(lookup(&[("DASHBOARD_REFRESH_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DASHBOARD_REFRESH_SECS", .. }));
        let err = ApiConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn rejects_sessions_longer_than_a_year() {
        let err = ApiConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", "9223372036854775807")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SESSION_MAX_AGE_SECS", .. }));

        let max = MAX_SESSION_AGE_SECS.to_string();
        let config = ApiConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", max.as_str())])).unwrap();
        assert_eq!(config.session_max_age, Duration::from_secs(MAX_SESSION_AGE_SECS));
    }
}
