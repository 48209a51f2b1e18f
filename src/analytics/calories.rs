//! Estimated exercise energy expenditure.
//!
//! Nothing in the activity tables records calories burned, so both estimates
//! come from fixed formulas over what is stored.

use time::OffsetDateTime;

/// Body weight used for every running estimate, regardless of the user's own.
pub const REFERENCE_BODY_WEIGHT_KG: f64 = 70.0;

/// kcal burned per km per kg of body weight while running.
pub const RUNNING_KCAL_PER_KM_KG: f64 = 1.036;

/// kcal burned per minute of a resistance session.
pub const RESISTANCE_KCAL_PER_MINUTE: f64 = 6.0;

/// Running estimate for a day's summed distance.
pub fn running_calories(distance_meters: f64) -> f64 {
    distance_meters / 1000.0 * REFERENCE_BODY_WEIGHT_KG * RUNNING_KCAL_PER_KM_KG
}

/// Resistance estimate for a day's summed session minutes.
pub fn resistance_calories(session_minutes: f64) -> f64 {
    RESISTANCE_KCAL_PER_MINUTE * session_minutes
}

pub fn session_minutes(start: OffsetDateTime, end: OffsetDateTime) -> f64 {
    (end - start).as_seconds_f64() / 60.0
}

/// Day total, floored once after both components are added.
pub fn exercise_calories(running_kcal: f64, resistance_kcal: f64) -> i64 {
    (running_kcal + resistance_kcal).floor() as i64
}
