use std::future::Future;

use time::{Date, UtcOffset};
use tracing::{debug, error};
use uuid::Uuid;

use crate::activity::{ActivityStore, StoreResult, TimeWindow};

use super::aggregate::{
    nutrition_by_day, resistance_by_day, running_by_day, water_by_day, weight_by_day,
};
use super::axis::DateAxis;
use super::dto::{DailySummary, WeeklySummary};
use super::error::{AnalyticsError, SourceKind};
use super::merge::DayAggregates;
use super::weekly::roll_up_weeks;

/// One summary per calendar day in `[start, end]`, newest first.
///
/// Calendar days are cut at midnight in `offset`. An inverted range yields
/// an empty list. Any failed read aborts the whole rollup.
pub async fn get_daily_summaries(
    store: &dyn ActivityStore,
    offset: UtcOffset,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> Result<Vec<DailySummary>, AnalyticsError> {
    let axis = DateAxis::new(start, end);
    if axis.len() == 0 {
        return Ok(Vec::new());
    }
    let window =
        TimeWindow::covering(start, end, offset).ok_or(AnalyticsError::WindowOverflow { start, end })?;

    let (food, runs, sessions, sets, water, weights) = tokio::try_join!(
        read(SourceKind::Nutrition, store.food_entries(user_id, window)),
        read(SourceKind::Running, store.runs(user_id, window)),
        read(SourceKind::Resistance, store.finished_sessions(user_id, window)),
        read(SourceKind::Resistance, store.session_sets(user_id, window)),
        read(SourceKind::Hydration, store.water_logs(user_id, window)),
        read(SourceKind::BodyWeight, store.weight_measurements(user_id, window)),
    )?;

    debug!(
        %user_id,
        %start,
        %end,
        dialect = %store.dialect(),
        food = food.len(),
        runs = runs.len(),
        sessions = sessions.len(),
        sets = sets.len(),
        water = water.len(),
        weights = weights.len(),
        "activity rows loaded"
    );

    let aggregates = DayAggregates {
        nutrition: nutrition_by_day(&food, offset),
        running: running_by_day(&runs, offset),
        resistance: resistance_by_day(&sessions, &sets, offset),
        water: water_by_day(&water, offset),
        weight: weight_by_day(&weights, offset),
    };
    Ok(aggregates.merge(axis))
}

/// Weekly roll-up of [`get_daily_summaries`] over the same range, newest week first.
pub async fn get_weekly_summaries(
    store: &dyn ActivityStore,
    offset: UtcOffset,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> Result<Vec<WeeklySummary>, AnalyticsError> {
    let days = get_daily_summaries(store, offset, user_id, start, end).await?;
    Ok(roll_up_weeks(&days))
}

async fn read<T>(
    kind: SourceKind,
    rows: impl Future<Output = StoreResult<Vec<T>>>,
) -> Result<Vec<T>, AnalyticsError> {
    rows.await.map_err(|e| {
        error!(error = %e, source = %kind, "activity read failed");
        AnalyticsError::SourceRead { kind, error: e }
    })
}
