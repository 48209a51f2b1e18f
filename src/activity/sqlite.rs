use std::str::FromStr;
use std::time::Duration as StdDuration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::{
    ActivityStore, BodyMetricRow, Dialect, FoodEntryRow, RunRow, StoreResult, TimeWindow,
    WaterLogRow, WorkoutSessionRow, WorkoutSetRow,
};

// Timestamps are stored as text with arbitrary offsets, so SQL compares them
// through julianday(). That rounds to whole milliseconds, so the SQL bound is
// padded by a day on each side and the exact window is applied on the decoded
// instants in `exact`.

#[derive(Clone)]
pub struct SqliteActivityStore {
    pool: SqlitePool,
}

impl SqliteActivityStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("parse sqlite url")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(StdDuration::from_secs(5));
        // single writer
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("connect to sqlite")?;
        Ok(Self { pool })
    }

    /// Private in-memory database with the schema applied.
    ///
    /// The pool is pinned to one long-lived connection; every new connection
    /// to `sqlite::memory:` would otherwise see an empty database.
    #[cfg(test)]
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations/sqlite").run(&self.pool).await
    }
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn food_entries(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<FoodEntryRow>> {
        let padded = padded(window);
        let rows = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT fe.id, m.eaten_at, fe.calories, fe.protein_g, fe.carbs_g, fe.fat_g
              FROM meals m
              JOIN food_entries fe ON fe.meal_id = m.id
             WHERE m.user_id = ?
               AND julianday(m.eaten_at) >= julianday(?)
               AND julianday(m.eaten_at) < julianday(?)
             ORDER BY julianday(m.eaten_at) ASC, fe.id ASC
            "#,
        )
        .bind(user_id)
        .bind(padded.from)
        .bind(padded.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(exact(rows, window, |r| r.eaten_at))
    }

    async fn runs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<RunRow>> {
        let padded = padded(window);
        let rows = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, start_time, distance_meters
              FROM runs
             WHERE user_id = ?
               AND julianday(start_time) >= julianday(?)
               AND julianday(start_time) < julianday(?)
             ORDER BY julianday(start_time) ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(padded.from)
        .bind(padded.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(exact(rows, window, |r| r.start_time))
    }

    async fn finished_sessions(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSessionRow>> {
        let padded = padded(window);
        let rows = sqlx::query_as::<_, WorkoutSessionRow>(
            r#"
            SELECT id, start_time, end_time
              FROM workout_sessions
             WHERE user_id = ?
               AND end_time IS NOT NULL
               AND julianday(start_time) >= julianday(?)
               AND julianday(start_time) < julianday(?)
             ORDER BY julianday(start_time) ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(padded.from)
        .bind(padded.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(exact(rows, window, |r| r.start_time))
    }

    async fn session_sets(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSetRow>> {
        let padded = padded(window);
        let rows = sqlx::query_as::<_, WorkoutSetRow>(
            r#"
            SELECT s.session_id, ws.start_time AS session_start, s.weight_kg, s.reps
              FROM workout_sessions ws
              JOIN workout_sets s ON s.session_id = ws.id
             WHERE ws.user_id = ?
               AND julianday(ws.start_time) >= julianday(?)
               AND julianday(ws.start_time) < julianday(?)
             ORDER BY julianday(ws.start_time) ASC, ws.id ASC, s.set_order ASC, s.id ASC
            "#,
        )
        .bind(user_id)
        .bind(padded.from)
        .bind(padded.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(exact(rows, window, |r| r.session_start))
    }

    async fn water_logs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<WaterLogRow>> {
        let padded = padded(window);
        let rows = sqlx::query_as::<_, WaterLogRow>(
            r#"
            SELECT id, recorded_at, amount_ml
              FROM water_logs
             WHERE user_id = ?
               AND julianday(recorded_at) >= julianday(?)
               AND julianday(recorded_at) < julianday(?)
             ORDER BY julianday(recorded_at) ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(padded.from)
        .bind(padded.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(exact(rows, window, |r| r.recorded_at))
    }

    async fn weight_measurements(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<BodyMetricRow>> {
        let padded = padded(window);
        let rows = sqlx::query_as::<_, BodyMetricRow>(
            r#"
            SELECT id, recorded_at, weight_kg
              FROM body_metrics
             WHERE user_id = ?
               AND weight_kg IS NOT NULL
               AND julianday(recorded_at) >= julianday(?)
               AND julianday(recorded_at) < julianday(?)
             ORDER BY julianday(recorded_at) ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(padded.from)
        .bind(padded.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(exact(rows, window, |r| r.recorded_at))
    }
}

fn padded(window: TimeWindow) -> TimeWindow {
    TimeWindow {
        from: window.from.checked_sub(Duration::DAY).unwrap_or(window.from),
        until: window.until.checked_add(Duration::DAY).unwrap_or(window.until),
    }
}

/// Keep the rows inside `window`, ordered by exact instant.
///
/// The sort is stable, so rows sharing an instant keep the id order from SQL.
fn exact<T>(mut rows: Vec<T>, window: TimeWindow, at: impl Fn(&T) -> OffsetDateTime) -> Vec<T> {
    rows.retain(|r| window.contains(at(r)));
    rows.sort_by_key(|r| at(r));
    rows
}

#[cfg(test)]
pub(crate) async fn seed(pool: &SqlitePool, fixture: &super::testing::Fixture) -> anyhow::Result<()> {
    for meal in &fixture.meals {
        let meal_id = sqlx::query("INSERT INTO meals (user_id, name, eaten_at) VALUES (?, ?, ?)")
            .bind(meal.user_id)
            .bind(&meal.name)
            .bind(meal.eaten_at)
            .execute(pool)
            .await
            .context("insert meal")?
            .last_insert_rowid();
        for entry in &meal.entries {
            sqlx::query(
                r#"INSERT INTO food_entries (meal_id, name, calories, protein_g, carbs_g, fat_g)
                   VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(meal_id)
            .bind(&entry.name)
            .bind(entry.calories)
            .bind(entry.protein_g)
            .bind(entry.carbs_g)
            .bind(entry.fat_g)
            .execute(pool)
            .await
            .context("insert food entry")?;
        }
    }
    for run in &fixture.runs {
        sqlx::query("INSERT INTO runs (user_id, start_time, distance_meters) VALUES (?, ?, ?)")
            .bind(run.user_id)
            .bind(run.start_time)
            .bind(run.distance_meters)
            .execute(pool)
            .await
            .context("insert run")?;
    }
    for session in &fixture.sessions {
        let session_id = sqlx::query(
            "INSERT INTO workout_sessions (user_id, start_time, end_time) VALUES (?, ?, ?)",
        )
        .bind(session.user_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .execute(pool)
        .await
        .context("insert workout session")?
        .last_insert_rowid();
        for (order, set) in session.sets.iter().enumerate() {
            sqlx::query(
                "INSERT INTO workout_sets (session_id, set_order, weight_kg, reps) VALUES (?, ?, ?, ?)",
            )
            .bind(session_id)
            .bind(order as i32)
            .bind(set.weight_kg)
            .bind(set.reps)
            .execute(pool)
            .await
            .context("insert workout set")?;
        }
    }
    for log in &fixture.water {
        sqlx::query("INSERT INTO water_logs (user_id, amount_ml, recorded_at) VALUES (?, ?, ?)")
            .bind(log.user_id)
            .bind(log.amount_ml)
            .bind(log.recorded_at)
            .execute(pool)
            .await
            .context("insert water log")?;
    }
    for metric in &fixture.body {
        sqlx::query("INSERT INTO body_metrics (user_id, recorded_at, weight_kg) VALUES (?, ?, ?)")
            .bind(metric.user_id)
            .bind(metric.recorded_at)
            .bind(metric.weight_kg)
            .execute(pool)
            .await
            .context("insert body metric")?;
    }
    Ok(())
}
