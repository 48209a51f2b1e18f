use sqlx::FromRow;
use time::OffsetDateTime;

/// One food entry, stamped with its parent meal's `eaten_at`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FoodEntryRow {
    pub id: i64,
    pub eaten_at: OffsetDateTime,
    pub calories: i32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RunRow {
    pub id: i64,
    pub start_time: OffsetDateTime,
    pub distance_meters: f64,
}

/// A finished session; unfinished ones never leave the store.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorkoutSessionRow {
    pub id: i64,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
}

/// One set, stamped with its parent session's `start_time`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WorkoutSetRow {
    pub session_id: i64,
    pub session_start: OffsetDateTime,
    pub weight_kg: f64,
    pub reps: i32,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WaterLogRow {
    pub id: i64,
    pub recorded_at: OffsetDateTime,
    pub amount_ml: i32,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BodyMetricRow {
    pub id: i64,
    pub recorded_at: OffsetDateTime,
    pub weight_kg: f64,
}
