use time::{Date, Duration};

use super::dto::{DailySummary, WeeklySummary};

/// Monday on or before `date`.
pub fn week_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// Fold newest-first daily summaries into newest-first weeks.
///
/// `avg_calories` averages only days with calories logged.
pub fn roll_up_weeks(days: &[DailySummary]) -> Vec<WeeklySummary> {
    let mut weeks: Vec<WeeklySummary> = Vec::new();
    let mut logged_days = 0i64;
    let mut logged_calories = 0i64;

    for day in days {
        let start = week_start(day.date);
        if weeks.last().map(|w| w.week_start) != Some(start) {
            close_week(weeks.last_mut(), logged_calories, logged_days);
            logged_days = 0;
            logged_calories = 0;
            weeks.push(WeeklySummary {
                week_start: start,
                total_distance: 0.0,
                total_volume_kg: 0.0,
                avg_calories: 0,
            });
        }
        if let Some(week) = weeks.last_mut() {
            week.total_distance += day.run_distance;
            week.total_volume_kg += day.workout_volume_kg;
        }
        if day.total_calories > 0 {
            logged_days += 1;
            logged_calories += day.total_calories;
        }
    }
    close_week(weeks.last_mut(), logged_calories, logged_days);
    weeks
}

fn close_week(week: Option<&mut WeeklySummary>, calories: i64, days: i64) {
    if let Some(week) = week {
        if days > 0 {
            week.avg_calories = (calories as f64 / days as f64).round() as i64;
        }
    }
}
