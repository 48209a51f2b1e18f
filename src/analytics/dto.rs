use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, Duration};

use super::error::AnalyticsError;
use crate::config::AnalyticsConfig;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Merged activity for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub total_calories: i64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    /// Meters.
    pub run_distance: f64,
    pub workout_volume_kg: f64,
    pub exercise_calories: i64,
    pub water_ml: i64,
    /// `None` when nothing was weighed that day.
    pub weight_kg: Option<f64>,
}

impl DailySummary {
    pub fn empty(date: Date) -> Self {
        Self {
            date,
            total_calories: 0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
            run_distance: 0.0,
            workout_volume_kg: 0.0,
            exercise_calories: 0,
            water_ml: 0,
            weight_kg: None,
        }
    }
}

/// Monday-anchored roll-up of daily summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    #[serde(with = "iso_date")]
    pub week_start: Date,
    pub total_distance: f64,
    pub total_volume_kg: f64,
    pub avg_calories: i64,
}

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`; both optional.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeQuery {
    /// Resolve to a validated `(start, end)` pair.
    ///
    /// A missing `end` is `today`; a missing `start` is `end` minus the
    /// configured default span. Blank values count as missing.
    pub fn resolve(&self, today: Date, cfg: &AnalyticsConfig) -> Result<(Date, Date), AnalyticsError> {
        let end = match non_blank(&self.end) {
            Some(raw) => parse_day("end", raw)?,
            None => today,
        };
        let start = match non_blank(&self.start) {
            Some(raw) => parse_day("start", raw)?,
            None => end
                .checked_sub(Duration::days(cfg.default_range_days))
                .ok_or_else(|| AnalyticsError::InvalidRange("end is too early".into()))?,
        };

        if start > end {
            return Err(AnalyticsError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        let span = (end - start).whole_days() + 1;
        if span > cfg.max_range_days {
            return Err(AnalyticsError::InvalidRange(format!(
                "range of {span} days exceeds the maximum of {}",
                cfg.max_range_days
            )));
        }
        Ok((start, end))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_day(field: &str, raw: &str) -> Result<Date, AnalyticsError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AnalyticsError::InvalidRange(format!("{field} must be YYYY-MM-DD, got {raw:?}")))
}
