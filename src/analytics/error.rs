use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;
use time::Date;

/// Activity source feeding the daily rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Nutrition,
    Running,
    Resistance,
    Hydration,
    BodyWeight,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Nutrition => "nutrition",
            SourceKind::Running => "running",
            SourceKind::Resistance => "resistance",
            SourceKind::Hydration => "hydration",
            SourceKind::BodyWeight => "body weight",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A source read failed; the whole rollup is abandoned.
    #[error("failed to read {kind} activity")]
    SourceRead {
        kind: SourceKind,
        #[source]
        error: sqlx::Error,
    },

    #[error("invalid date range: {0}")]
    InvalidRange(String),

    #[error("date range {start}..={end} has no representable end instant")]
    WindowOverflow { start: Date, end: Date },
}

impl AnalyticsError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyticsError::SourceRead { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AnalyticsError::InvalidRange(_) | AnalyticsError::WindowOverflow { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
