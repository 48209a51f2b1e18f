use anyhow::Context;
use async_trait::async_trait;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{
    ActivityStore, BodyMetricRow, Dialect, FoodEntryRow, RunRow, StoreResult, TimeWindow,
    WaterLogRow, WorkoutSessionRow, WorkoutSetRow,
};

#[derive(Clone)]
pub struct PgActivityStore {
    pool: PgPool,
}

impl PgActivityStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to postgres")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations/postgres").run(&self.pool).await
    }
}

#[async_trait]
impl ActivityStore for PgActivityStore {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn food_entries(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<FoodEntryRow>> {
        sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT fe.id, m.eaten_at, fe.calories, fe.protein_g, fe.carbs_g, fe.fat_g
              FROM meals m
              JOIN food_entries fe ON fe.meal_id = m.id
             WHERE m.user_id = $1
               AND m.eaten_at >= $2
               AND m.eaten_at < $3
             ORDER BY m.eaten_at ASC, fe.id ASC
            "#,
        )
        .bind(user_id)
        .bind(window.from)
        .bind(window.until)
        .fetch_all(&self.pool)
        .await
    }

    async fn runs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<RunRow>> {
        sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, start_time, distance_meters
              FROM runs
             WHERE user_id = $1
               AND start_time >= $2
               AND start_time < $3
             ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(window.from)
        .bind(window.until)
        .fetch_all(&self.pool)
        .await
    }

    async fn finished_sessions(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSessionRow>> {
        sqlx::query_as::<_, WorkoutSessionRow>(
            r#"
            SELECT id, start_time, end_time
              FROM workout_sessions
             WHERE user_id = $1
               AND end_time IS NOT NULL
               AND start_time >= $2
               AND start_time < $3
             ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(window.from)
        .bind(window.until)
        .fetch_all(&self.pool)
        .await
    }

    async fn session_sets(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSetRow>> {
        sqlx::query_as::<_, WorkoutSetRow>(
            r#"
            SELECT s.session_id, ws.start_time AS session_start, s.weight_kg, s.reps
              FROM workout_sessions ws
              JOIN workout_sets s ON s.session_id = ws.id
             WHERE ws.user_id = $1
               AND ws.start_time >= $2
               AND ws.start_time < $3
             ORDER BY ws.start_time ASC, ws.id ASC, s.set_order ASC, s.id ASC
            "#,
        )
        .bind(user_id)
        .bind(window.from)
        .bind(window.until)
        .fetch_all(&self.pool)
        .await
    }

    async fn water_logs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<WaterLogRow>> {
        sqlx::query_as::<_, WaterLogRow>(
            r#"
            SELECT id, recorded_at, amount_ml
              FROM water_logs
             WHERE user_id = $1
               AND recorded_at >= $2
               AND recorded_at < $3
             ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(window.from)
        .bind(window.until)
        .fetch_all(&self.pool)
        .await
    }

    async fn weight_measurements(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<BodyMetricRow>> {
        sqlx::query_as::<_, BodyMetricRow>(
            r#"
            SELECT id, recorded_at, weight_kg
              FROM body_metrics
             WHERE user_id = $1
               AND weight_kg IS NOT NULL
               AND recorded_at >= $2
               AND recorded_at < $3
             ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(window.from)
        .bind(window.until)
        .fetch_all(&self.pool)
        .await
    }
}

/// Seeding helpers for the PostgreSQL half of the dialect equivalence check.
#[cfg(test)]
pub(crate) async fn seed(pool: &PgPool, fixture: &super::testing::Fixture) -> anyhow::Result<()> {
    for meal in &fixture.meals {
        let (meal_id,): (i64,) = sqlx::query_as(
            "INSERT INTO meals (user_id, name, eaten_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(meal.user_id)
        .bind(&meal.name)
        .bind(meal.eaten_at)
        .fetch_one(pool)
        .await
        .context("insert meal")?;
        for entry in &meal.entries {
            sqlx::query(
                r#"INSERT INTO food_entries (meal_id, name, calories, protein_g, carbs_g, fat_g)
                   VALUES ($1, $2, $3, $4, $5, $6)"#,
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
        sqlx::query("INSERT INTO runs (user_id, start_time, distance_meters) VALUES ($1, $2, $3)")
            .bind(run.user_id)
            .bind(run.start_time)
            .bind(run.distance_meters)
            .execute(pool)
            .await
            .context("insert run")?;
    }
    for session in &fixture.sessions {
        let (session_id,): (i64,) = sqlx::query_as(
            "INSERT INTO workout_sessions (user_id, start_time, end_time) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(session.user_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .fetch_one(pool)
        .await
        .context("insert workout session")?;
        for (order, set) in session.sets.iter().enumerate() {
            sqlx::query(
                "INSERT INTO workout_sets (session_id, set_order, weight_kg, reps) VALUES ($1, $2, $3, $4)",
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
        sqlx::query("INSERT INTO water_logs (user_id, amount_ml, recorded_at) VALUES ($1, $2, $3)")
            .bind(log.user_id)
            .bind(log.amount_ml)
            .bind(log.recorded_at)
            .execute(pool)
            .await
            .context("insert water log")?;
    }
    for metric in &fixture.body {
        sqlx::query("INSERT INTO body_metrics (user_id, recorded_at, weight_kg) VALUES ($1, $2, $3)")
            .bind(metric.user_id)
            .bind(metric.recorded_at)
            .bind(metric.weight_kg)
            .execute(pool)
            .await
            .context("insert body metric")?;
    }
    Ok(())
}
