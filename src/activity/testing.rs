//! In-memory activity data shared by the store and engine tests.

use async_trait::async_trait;
use time::macros::datetime;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analytics::error::SourceKind;

use super::{
    ActivityStore, BodyMetricRow, Dialect, FoodEntryRow, RunRow, StoreResult, TimeWindow,
    WaterLogRow, WorkoutSessionRow, WorkoutSetRow,
};

#[derive(Debug, Clone)]
pub struct FixtureFood {
    pub name: String,
    pub calories: i32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Clone)]
pub struct FixtureMeal {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub eaten_at: OffsetDateTime,
    pub entries: Vec<FixtureFood>,
}

#[derive(Debug, Clone)]
pub struct FixtureRun {
    pub user_id: Uuid,
    pub start_time: OffsetDateTime,
    pub distance_meters: f64,
}

#[derive(Debug, Clone)]
pub struct FixtureSet {
    pub weight_kg: f64,
    pub reps: i32,
}

#[derive(Debug, Clone)]
pub struct FixtureSession {
    pub user_id: Uuid,
    pub start_time: OffsetDateTime,
    pub end_time: Option<OffsetDateTime>,
    pub sets: Vec<FixtureSet>,
}

#[derive(Debug, Clone)]
pub struct FixtureWater {
    pub user_id: Uuid,
    pub recorded_at: OffsetDateTime,
    pub amount_ml: i32,
}

#[derive(Debug, Clone)]
pub struct FixtureBody {
    pub user_id: Uuid,
    pub recorded_at: OffsetDateTime,
    pub weight_kg: Option<f64>,
}

/// Rows in insertion order; ids are 1-based positions, as a fresh database assigns them.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub user_id: Uuid,
    pub meals: Vec<FixtureMeal>,
    pub runs: Vec<FixtureRun>,
    pub sessions: Vec<FixtureSession>,
    pub water: Vec<FixtureWater>,
    pub body: Vec<FixtureBody>,
}

impl Fixture {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            meals: Vec::new(),
            runs: Vec::new(),
            sessions: Vec::new(),
            water: Vec::new(),
            body: Vec::new(),
        }
    }

    /// `(calories, protein, carbs, fat)` per entry.
    pub fn meal(&mut self, user_id: Uuid, eaten_at: OffsetDateTime, entries: &[(i32, f64, f64, f64)]) {
        let entries = entries
            .iter()
            .enumerate()
            .map(|(i, &(calories, protein_g, carbs_g, fat_g))| FixtureFood {
                name: format!("item {}", i + 1),
                calories,
                protein_g,
                carbs_g,
                fat_g,
            })
            .collect();
        self.meals.push(FixtureMeal {
            user_id,
            name: None,
            eaten_at,
            entries,
        });
    }

    pub fn run(&mut self, user_id: Uuid, start_time: OffsetDateTime, distance_meters: f64) {
        self.runs.push(FixtureRun {
            user_id,
            start_time,
            distance_meters,
        });
    }

    /// `(weight_kg, reps)` per set.
    pub fn session(
        &mut self,
        user_id: Uuid,
        start_time: OffsetDateTime,
        end_time: Option<OffsetDateTime>,
        sets: &[(f64, i32)],
    ) {
        self.sessions.push(FixtureSession {
            user_id,
            start_time,
            end_time,
            sets: sets
                .iter()
                .map(|&(weight_kg, reps)| FixtureSet { weight_kg, reps })
                .collect(),
        });
    }

    pub fn water(&mut self, user_id: Uuid, recorded_at: OffsetDateTime, amount_ml: i32) {
        self.water.push(FixtureWater {
            user_id,
            recorded_at,
            amount_ml,
        });
    }

    pub fn weight(&mut self, user_id: Uuid, recorded_at: OffsetDateTime, weight_kg: Option<f64>) {
        self.body.push(FixtureBody {
            user_id,
            recorded_at,
            weight_kg,
        });
    }

    /// Two weeks of mixed activity for `user_id` in early January 2024, plus
    /// noise belonging to `other` and rows outside the usual query ranges.
    pub fn sample(user_id: Uuid, other: Uuid) -> Self {
        let mut f = Self::empty(user_id);

        f.meal(user_id, datetime!(2024-01-01 08:00 UTC), &[(350, 20.5, 40.0, 10.25), (120, 3.0, 25.5, 0.5)]);
        f.meal(user_id, datetime!(2024-01-01 19:30 UTC), &[(780, 45.0, 60.0, 30.0)]);
        f.meal(user_id, datetime!(2024-01-02 23:30 UTC), &[(410, 12.1, 55.3, 14.7)]);
        f.meal(user_id, datetime!(2024-01-04 00:15 UTC), &[(90, 0.4, 22.0, 0.2)]);
        f.meal(user_id, datetime!(2024-01-09 13:00 +1), &[(640, 38.0, 70.0, 18.0), (210, 7.5, 30.0, 6.0)]);
        f.meal(other, datetime!(2024-01-01 12:00 UTC), &[(5000, 100.0, 100.0, 100.0)]);
        f.meal(user_id, datetime!(2023-11-30 12:00 UTC), &[(999, 9.0, 9.0, 9.0)]);

        f.run(user_id, datetime!(2024-01-01 07:00 UTC), 5000.0);
        f.run(user_id, datetime!(2024-01-03 06:10 UTC), 3200.5);
        f.run(user_id, datetime!(2024-01-03 18:45 UTC), 4100.25);
        f.run(user_id, datetime!(2024-01-07 23:50 UTC), 10000.0);
        f.run(other, datetime!(2024-01-03 07:00 UTC), 42195.0);

        f.session(
            user_id,
            datetime!(2024-01-01 17:00 UTC),
            Some(datetime!(2024-01-01 17:45 UTC)),
            &[(60.0, 10), (62.5, 8), (65.0, 6)],
        );
        f.session(
            user_id,
            datetime!(2024-01-02 23:20 UTC),
            Some(datetime!(2024-01-03 00:35 UTC)),
            &[(100.0, 5), (100.0, 5)],
        );
        f.session(user_id, datetime!(2024-01-05 10:00 UTC), None, &[(80.0, 8)]);
        f.session(
            user_id,
            datetime!(2024-01-06 09:00 UTC),
            Some(datetime!(2024-01-06 09:20 UTC)),
            &[],
        );
        f.session(
            user_id,
            datetime!(2024-01-06 16:00 UTC),
            Some(datetime!(2024-01-06 16:52:30 UTC)),
            &[(40.0, 12), (42.5, 12)],
        );
        f.session(
            other,
            datetime!(2024-01-01 17:00 UTC),
            Some(datetime!(2024-01-01 19:00 UTC)),
            &[(200.0, 3)],
        );

        f.water(user_id, datetime!(2024-01-01 09:00 UTC), 500);
        f.water(user_id, datetime!(2024-01-01 15:00 UTC), 750);
        f.water(user_id, datetime!(2024-01-02 22:00 UTC), 330);
        f.water(user_id, datetime!(2024-01-08 04:00 UTC), 1000);
        f.water(other, datetime!(2024-01-01 09:00 UTC), 3000);

        f.weight(user_id, datetime!(2024-01-01 09:00 UTC), Some(80.0));
        f.weight(user_id, datetime!(2024-01-01 18:00 UTC), Some(79.5));
        f.weight(user_id, datetime!(2024-01-03 07:00 UTC), None);
        f.weight(user_id, datetime!(2024-01-04 07:00 UTC), Some(79.9));
        f.weight(user_id, datetime!(2024-01-04 07:00 UTC), Some(79.7));
        f.weight(user_id, datetime!(2024-01-08 02:00 UTC), Some(79.1));
        f.weight(other, datetime!(2024-01-01 20:00 UTC), Some(101.0));

        f
    }
}

/// Reference [`ActivityStore`] evaluating reads directly over a [`Fixture`].
pub struct MemoryStore {
    fixture: Fixture,
}

impl MemoryStore {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture }
    }

    fn sessions_in(&self, user_id: Uuid, window: TimeWindow) -> Vec<(i64, &FixtureSession)> {
        let mut sessions: Vec<(i64, &FixtureSession)> = self
            .fixture
            .sessions
            .iter()
            .enumerate()
            .map(|(i, s)| (i as i64 + 1, s))
            .filter(|(_, s)| s.user_id == user_id && window.contains(s.start_time))
            .collect();
        sessions.sort_by_key(|(id, s)| (s.start_time, *id));
        sessions
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn food_entries(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<FoodEntryRow>> {
        let mut next_id = 0i64;
        let mut rows = Vec::new();
        for meal in &self.fixture.meals {
            for entry in &meal.entries {
                next_id += 1;
                if meal.user_id == user_id && window.contains(meal.eaten_at) {
                    rows.push(FoodEntryRow {
                        id: next_id,
                        eaten_at: meal.eaten_at,
                        calories: entry.calories,
                        protein_g: entry.protein_g,
                        carbs_g: entry.carbs_g,
                        fat_g: entry.fat_g,
                    });
                }
            }
        }
        rows.sort_by_key(|r| (r.eaten_at, r.id));
        Ok(rows)
    }

    async fn runs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<RunRow>> {
        let mut rows: Vec<RunRow> = self
            .fixture
            .runs
            .iter()
            .enumerate()
            .filter(|(_, r)| r.user_id == user_id && window.contains(r.start_time))
            .map(|(i, r)| RunRow {
                id: i as i64 + 1,
                start_time: r.start_time,
                distance_meters: r.distance_meters,
            })
            .collect();
        rows.sort_by_key(|r| (r.start_time, r.id));
        Ok(rows)
    }

    async fn finished_sessions(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSessionRow>> {
        Ok(self
            .sessions_in(user_id, window)
            .into_iter()
            .filter_map(|(id, s)| {
                s.end_time.map(|end_time| WorkoutSessionRow {
                    id,
                    start_time: s.start_time,
                    end_time,
                })
            })
            .collect())
    }

    async fn session_sets(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSetRow>> {
        Ok(self
            .sessions_in(user_id, window)
            .into_iter()
            .flat_map(|(id, s)| {
                s.sets.iter().map(move |set| WorkoutSetRow {
                    session_id: id,
                    session_start: s.start_time,
                    weight_kg: set.weight_kg,
                    reps: set.reps,
                })
            })
            .collect())
    }

    async fn water_logs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<WaterLogRow>> {
        let mut rows: Vec<WaterLogRow> = self
            .fixture
            .water
            .iter()
            .enumerate()
            .filter(|(_, w)| w.user_id == user_id && window.contains(w.recorded_at))
            .map(|(i, w)| WaterLogRow {
                id: i as i64 + 1,
                recorded_at: w.recorded_at,
                amount_ml: w.amount_ml,
            })
            .collect();
        rows.sort_by_key(|r| (r.recorded_at, r.id));
        Ok(rows)
    }

    async fn weight_measurements(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<BodyMetricRow>> {
        let mut rows: Vec<BodyMetricRow> = self
            .fixture
            .body
            .iter()
            .enumerate()
            .filter(|(_, b)| b.user_id == user_id && window.contains(b.recorded_at))
            .filter_map(|(i, b)| {
                b.weight_kg.map(|weight_kg| BodyMetricRow {
                    id: i as i64 + 1,
                    recorded_at: b.recorded_at,
                    weight_kg,
                })
            })
            .collect();
        rows.sort_by_key(|r| (r.recorded_at, r.id));
        Ok(rows)
    }
}

/// Store whose reads for one source fail with a pool timeout; the rest are empty.
pub struct FailingStore {
    pub failing: SourceKind,
}

#[async_trait]
impl ActivityStore for FailingStore {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn food_entries(&self, _: Uuid, _: TimeWindow) -> StoreResult<Vec<FoodEntryRow>> {
        self.fail_if(SourceKind::Nutrition)
    }

    async fn runs(&self, _: Uuid, _: TimeWindow) -> StoreResult<Vec<RunRow>> {
        self.fail_if(SourceKind::Running)
    }

    async fn finished_sessions(&self, _: Uuid, _: TimeWindow) -> StoreResult<Vec<WorkoutSessionRow>> {
        self.fail_if(SourceKind::Resistance)
    }

    async fn session_sets(&self, _: Uuid, _: TimeWindow) -> StoreResult<Vec<WorkoutSetRow>> {
        self.fail_if(SourceKind::Resistance)
    }

    async fn water_logs(&self, _: Uuid, _: TimeWindow) -> StoreResult<Vec<WaterLogRow>> {
        self.fail_if(SourceKind::Hydration)
    }

    async fn weight_measurements(&self, _: Uuid, _: TimeWindow) -> StoreResult<Vec<BodyMetricRow>> {
        self.fail_if(SourceKind::BodyWeight)
    }
}

impl FailingStore {
    fn fail_if<T>(&self, source: SourceKind) -> StoreResult<Vec<T>> {
        if source == self.failing {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(Vec::new())
        }
    }
}

/// Answers `finished_sessions` from one fixture and every other read from
/// another, as if the data changed between the two reads.
pub struct SplitStore {
    pub sessions: MemoryStore,
    pub rest: MemoryStore,
}

#[async_trait]
impl ActivityStore for SplitStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn food_entries(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<FoodEntryRow>> {
        self.rest.food_entries(user_id, window).await
    }

    async fn runs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<RunRow>> {
        self.rest.runs(user_id, window).await
    }

    async fn finished_sessions(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkoutSessionRow>> {
        self.sessions.finished_sessions(user_id, window).await
    }

    async fn session_sets(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<WorkoutSetRow>> {
        self.rest.session_sets(user_id, window).await
    }

    async fn water_logs(&self, user_id: Uuid, window: TimeWindow) -> StoreResult<Vec<WaterLogRow>> {
        self.rest.water_logs(user_id, window).await
    }

    async fn weight_measurements(
        &self,
        user_id: Uuid,
        window: TimeWindow,
    ) -> StoreResult<Vec<BodyMetricRow>> {
        self.rest.weight_measurements(user_id, window).await
    }
}
