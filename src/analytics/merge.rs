use std::collections::HashMap;

use time::Date;

use super::aggregate::{NutritionDay, ResistanceDay};
use super::axis::DateAxis;
use super::calories::{exercise_calories, resistance_calories, running_calories};
use super::dto::DailySummary;

/// Per-day aggregates of all five sources for one user and range.
#[derive(Debug, Default)]
pub struct DayAggregates {
    pub nutrition: HashMap<Date, NutritionDay>,
    pub running: HashMap<Date, f64>,
    pub resistance: HashMap<Date, ResistanceDay>,
    pub water: HashMap<Date, i64>,
    pub weight: HashMap<Date, f64>,
}

impl DayAggregates {
    /// Left-join onto the axis; absent sources default to zero, weight to `None`.
    pub fn summary_for(&self, date: Date) -> DailySummary {
        let mut summary = DailySummary::empty(date);
        if let Some(n) = self.nutrition.get(&date) {
            summary.total_calories = n.calories;
            summary.total_protein = n.protein_g;
            summary.total_carbs = n.carbs_g;
            summary.total_fat = n.fat_g;
        }
        let distance = self.running.get(&date).copied().unwrap_or_default();
        let resistance = self.resistance.get(&date).copied().unwrap_or_default();
        summary.run_distance = distance;
        summary.workout_volume_kg = resistance.volume_kg;
        summary.exercise_calories = exercise_calories(
            running_calories(distance),
            resistance_calories(resistance.session_minutes),
        );
        if let Some(ml) = self.water.get(&date) {
            summary.water_ml = *ml;
        }
        summary.weight_kg = self.weight.get(&date).copied();
        summary
    }

    /// One summary per axis day, newest first.
    pub fn merge(&self, axis: DateAxis) -> Vec<DailySummary> {
        axis.rev().map(|date| self.summary_for(date)).collect()
    }
}
