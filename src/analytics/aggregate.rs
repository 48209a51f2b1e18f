use std::collections::HashMap;

use time::{Date, OffsetDateTime, UtcOffset};

use crate::activity::{
    BodyMetricRow, FoodEntryRow, RunRow, WaterLogRow, WorkoutSessionRow, WorkoutSetRow,
};

use super::calories::session_minutes;

/// Calendar day of `ts` as seen from `offset`.
pub fn day_of(ts: OffsetDateTime, offset: UtcOffset) -> Date {
    ts.to_offset(offset).date()
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NutritionDay {
    pub calories: i64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ResistanceDay {
    pub volume_kg: f64,
    pub session_minutes: f64,
}

pub fn nutrition_by_day(rows: &[FoodEntryRow], offset: UtcOffset) -> HashMap<Date, NutritionDay> {
    let mut days: HashMap<Date, NutritionDay> = HashMap::new();
    for row in rows {
        let day = days.entry(day_of(row.eaten_at, offset)).or_default();
        day.calories += i64::from(row.calories);
        day.protein_g += row.protein_g;
        day.carbs_g += row.carbs_g;
        day.fat_g += row.fat_g;
    }
    days
}

/// Summed distance in meters per day.
pub fn running_by_day(rows: &[RunRow], offset: UtcOffset) -> HashMap<Date, f64> {
    let mut days: HashMap<Date, f64> = HashMap::new();
    for row in rows {
        *days.entry(day_of(row.start_time, offset)).or_default() += row.distance_meters;
    }
    days
}

/// Volume and minutes per day, keyed by each session's start.
///
/// Minutes count once per session; a session without sets still contributes
/// its duration. Sets whose session is not in `sessions` are ignored.
pub fn resistance_by_day(
    sessions: &[WorkoutSessionRow],
    sets: &[WorkoutSetRow],
    offset: UtcOffset,
) -> HashMap<Date, ResistanceDay> {
    let mut session_days: HashMap<i64, Date> = HashMap::with_capacity(sessions.len());
    let mut days: HashMap<Date, ResistanceDay> = HashMap::new();

    for session in sessions {
        let day = day_of(session.start_time, offset);
        session_days.insert(session.id, day);
        days.entry(day).or_default().session_minutes +=
            session_minutes(session.start_time, session.end_time);
    }

    for set in sets {
        if let Some(day) = session_days.get(&set.session_id) {
            days.entry(*day).or_default().volume_kg += set.weight_kg * f64::from(set.reps);
        }
    }
    days
}

pub fn water_by_day(rows: &[WaterLogRow], offset: UtcOffset) -> HashMap<Date, i64> {
    let mut days: HashMap<Date, i64> = HashMap::new();
    for row in rows {
        *days.entry(day_of(row.recorded_at, offset)).or_default() += i64::from(row.amount_ml);
    }
    days
}

/// One weight per day: the latest `recorded_at`, then the highest id on exact ties.
///
/// The pick does not depend on row order.
pub fn weight_by_day(rows: &[BodyMetricRow], offset: UtcOffset) -> HashMap<Date, f64> {
    let mut latest: HashMap<Date, &BodyMetricRow> = HashMap::new();
    for row in rows {
        latest
            .entry(day_of(row.recorded_at, offset))
            .and_modify(|current| {
                if (row.recorded_at, row.id) > (current.recorded_at, current.id) {
                    *current = row;
                }
            })
            .or_insert(row);
    }
    latest
        .into_iter()
        .map(|(day, row)| (day, row.weight_kg))
        .collect()
}
