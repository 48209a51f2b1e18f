use anyhow::Context;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Where calendar days begin and end.
    pub utc_offset: UtcOffset,
    pub default_range_days: i64,
    pub max_range_days: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            utc_offset: UtcOffset::UTC,
            default_range_days: 30,
            max_range_days: 3660,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://fitbuddy.db".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fitbuddy".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fitbuddy-users".into()),
        };

        let defaults = AnalyticsConfig::default();
        let utc_offset = match std::env::var("ANALYTICS_UTC_OFFSET") {
            Ok(raw) => parse_utc_offset(&raw)?,
            Err(_) => defaults.utc_offset,
        };
        let analytics = AnalyticsConfig {
            utc_offset,
            default_range_days: std::env::var("ANALYTICS_DEFAULT_RANGE_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(defaults.default_range_days),
            max_range_days: std::env::var("ANALYTICS_MAX_RANGE_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(defaults.max_range_days),
        };

        Ok(Self {
            database_url,
            jwt,
            analytics,
        })
    }
}

/// `+HH:MM` / `-HH:MM`, or `Z` for UTC.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        raw,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid ANALYTICS_UTC_OFFSET {raw:?}, expected +HH:MM"))
}
