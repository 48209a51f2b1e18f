pub mod postgres;
pub mod repo_types;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use async_trait::async_trait;
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

pub use postgres::PgActivityStore;
pub use repo_types::{
    BodyMetricRow, FoodEntryRow, RunRow, WaterLogRow, WorkoutSessionRow, WorkoutSetRow,
};
pub use sqlite::SqliteActivityStore;

pub type StoreResult<T> = Result<T, sqlx::Error>;

/// SQL dialect backing an [`ActivityStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// `postgres://` and `postgresql://` URLs select PostgreSQL, anything else is a SQLite path.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Dialect::Postgres
        } else {
            Dialect::Sqlite
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => f.write_str("postgres"),
            Dialect::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Half-open `[from, until)` span of instants covering whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: OffsetDateTime,
    pub until: OffsetDateTime,
}

impl TimeWindow {
    /// Window from local midnight of `start` to local midnight after `end`.
    ///
    /// Returns `None` when `end` is the last representable date.
    pub fn covering(start: Date, end: Date, offset: UtcOffset) -> Option<Self> {
        let after_end = end.next_day()?;
        Some(Self {
            from: start.midnight().assume_offset(offset),
            until: after_end.midnight().assume_offset(offset),
        })
    }

    pub fn contains(&self, ts: OffsetDateTime) -> bool {
        ts >= self.from && ts < self.until
    }
}

/// Per-user, per-window reads over the five activity sources.
///
/// Every read returns rows ordered by their timestamp, then row id, so float
/// sums computed over them are reproducible across dialects.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Food entries joined to their meal's `eaten_at`.
    async fn food_entries(&self, user_id: Uuid, window: TimeWindow)
        -> StoreResult<Vec<FoodEntryRow>>;

    async fn runs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<RunRow>>;

    /// Sessions with a non-null `end_time` that started inside the window.
    async fn finished_sessions(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSessionRow>>;

    /// Sets of every session that started inside the window, finished or not.
    ///
    /// Callers keep only the sets of [`ActivityStore::finished_sessions`], so a
    /// session finishing between the two reads counts whole or not at all.
    async fn session_sets(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSetRow>>;

    async fn water_logs(&self, user_id: Uuid, window: TimeWindow)
        -> StoreResult<Vec<WaterLogRow>>;

    /// Body metrics carrying a weight; rows with a null weight are skipped.
    async fn weight_measurements(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<BodyMetricRow>>;
}
