//! User-facing flows tying the session, stores and rules together.
//!
//! Each flow is what one screen of the app does once its form is submitted:
//! - Bio-data: compute and save the goal range, store biometrics, restart totals
//! - Dining: award points when today's calories sit inside the goal range
//! - Menu: add a picked item's calories to today's total
//! - Check-in: award points once per day
//! - Fitness: recommend workouts, add custom workouts

use crate::{
    compute_goal_range, filter_workouts, CalorieGoalRange, CheckIn, Clock, Config,
    CsvExerciseCatalog, DailyStats, DiningCenter, Difficulty, Exercise, ExerciseCatalog,
    ExerciseType, IntensityLevel, JsonMenuSource, JsonProfileStore, JsonStatsStore, MenuItem,
    MenuSource, ProfileStore, Reps, Result, RewardsConfig, Session, StatsStore, SystemClock,
    UserProfile,
};

/// Today's numbers as shown on the dashboard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailySummary {
    pub total_calories: u32,
    pub total_points: u32,
    pub goal_range: CalorieGoalRange,
    pub checked_in_today: bool,
}

/// Result of opening the dining screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiningVisit {
    pub total_calories: u32,
    pub goal_range: CalorieGoalRange,
    /// Points awarded for being inside the goal range, if any
    pub points_awarded: Option<u32>,
}

/// User input for a custom workout
#[derive(Clone, Debug)]
pub struct NewWorkout {
    pub name: String,
    pub muscle_group: String,
    pub exercise_type: ExerciseType,
    pub sets: u32,
    pub reps: Reps,
    pub difficulty: Difficulty,
}

pub struct Tracker<S, C = SystemClock> {
    session: Session,
    rewards: RewardsConfig,
    stats_store: S,
    clock: C,
    profiles: Box<dyn ProfileStore>,
    catalog: Box<dyn ExerciseCatalog>,
    menus: Box<dyn MenuSource>,
}

impl Tracker<JsonStatsStore, SystemClock> {
    /// File-backed tracker laid out under the configured data directory
    pub fn open(config: &Config, session: Session) -> Self {
        let data = &config.data;
        Tracker::new(
            session,
            config.rewards.clone(),
            JsonStatsStore::new(data.stats_dir()),
            SystemClock,
            Box::new(JsonProfileStore::new(data.profiles_dir())),
            Box::new(CsvExerciseCatalog::new(data.catalog_path())),
            Box::new(JsonMenuSource::new(data.menus_dir())),
        )
    }
}

impl<S: StatsStore, C: Clock> Tracker<S, C> {
    pub fn new(
        session: Session,
        rewards: RewardsConfig,
        stats_store: S,
        clock: C,
        profiles: Box<dyn ProfileStore>,
        catalog: Box<dyn ExerciseCatalog>,
        menus: Box<dyn MenuSource>,
    ) -> Self {
        Self {
            session,
            rewards,
            stats_store,
            clock,
            profiles,
            catalog,
            menus,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Daily stats for the signed-in user
    pub fn stats(&self) -> Result<DailyStats<&S, &C>> {
        let user = self.session.user()?.clone();
        Ok(DailyStats::with_clock(&self.stats_store, &self.clock, user))
    }

    pub fn sign_up(&mut self, name: &str, email: &str) -> Result<UserProfile> {
        let profile = self.session.sign_up(self.profiles.as_ref(), name, email)?;
        Ok(profile.clone())
    }

    pub fn profile(&mut self) -> Result<UserProfile> {
        let profile = self.session.profile(self.profiles.as_ref())?;
        Ok(profile.clone())
    }

    /// Bio-data submission.
    ///
    /// Saves the computed goal range and the new biometrics, then zeroes the
    /// calorie total (reset timestamp untouched) and the points total.
    pub fn submit_biometrics(
        &mut self,
        weight: i32,
        height: i32,
        target_weight: i32,
        intensity: Option<IntensityLevel>,
    ) -> Result<CalorieGoalRange> {
        let range = compute_goal_range(weight, height, target_weight, intensity);

        let current = self.session.profile(self.profiles.as_ref())?.clone();
        let updated = UserProfile {
            height,
            weight,
            intensity_level: intensity,
            target_weight,
            ..current
        };
        self.session
            .replace_profile(self.profiles.as_ref(), updated)?;

        let stats = self.stats()?;
        stats.save_goal_range(range)?;
        stats.reset_total_calories()?;
        stats.reset_points()?;

        tracing::info!("Bio-data submitted for {}, goal range {}", stats.user(), range);
        Ok(range)
    }

    pub fn update_settings(
        &mut self,
        name: &str,
        weight: i32,
        target_weight: i32,
        intensity: Option<IntensityLevel>,
    ) -> Result<UserProfile> {
        let profile = self.session.update_settings(
            self.profiles.as_ref(),
            name,
            weight,
            target_weight,
            intensity,
        )?;
        Ok(profile.clone())
    }

    /// Dashboard numbers; applies any pending rollover first
    pub fn summary(&self) -> Result<DailySummary> {
        let stats = self.stats()?;
        let (record, today) = stats.current_record()?;
        Ok(DailySummary {
            total_calories: record.total_calories,
            total_points: record.total_points,
            goal_range: record.goal_range(),
            checked_in_today: record.checked_in_on(&today),
        })
    }

    pub fn dining_centers(&self) -> Result<Vec<DiningCenter>> {
        self.menus.dining_centers()
    }

    pub fn menu(&self, slug: &str) -> Result<Vec<MenuItem>> {
        self.menus.fetch_menu(slug)
    }

    /// Add a menu item's calories; returns the item and the new total
    pub fn log_menu_item(&self, slug: &str, item_name: &str) -> Result<(MenuItem, u32)> {
        let stats = self.stats()?;
        let item = self.menus.find_item(slug, item_name)?;
        let total = stats.add_calories(item.total_cal)?;
        tracing::info!("Logged {} ({} kcal) from {}", item.name, item.total_cal, slug);
        Ok((item, total))
    }

    /// Dining screen: award points if today's total is within the goal range
    pub fn visit_dining(&self) -> Result<DiningVisit> {
        let stats = self.stats()?;
        let total_calories = stats.total_calories()?;
        let points = self.rewards.calorie_goal_points;
        let awarded = stats.add_points_for_calorie_range(total_calories, points)?;
        Ok(DiningVisit {
            total_calories,
            goal_range: stats.goal_range()?,
            points_awarded: awarded.then_some(points),
        })
    }

    pub fn check_in(&self) -> Result<CheckIn> {
        self.stats()?.check_in(self.rewards.check_in_points)
    }

    /// Catalog exercises matching the user's intensity and weight goal
    pub fn recommended_workouts(&mut self) -> Result<Vec<Exercise>> {
        let profile = self.session.profile(self.profiles.as_ref())?.clone();
        let exercises = self.catalog.fetch_all()?;
        Ok(filter_workouts(&exercises, &profile))
    }

    /// Add a custom workout; the catalog assigns its id
    pub fn add_workout(&self, workout: NewWorkout) -> Result<Exercise> {
        self.session.user()?;
        self.catalog.add(Exercise {
            id: 0,
            name: workout.name,
            muscle_group: workout.muscle_group,
            exercise_type: workout.exercise_type,
            sets: workout.sets,
            reps: workout.reps,
            difficulty: workout.difficulty,
        })
    }

    pub fn reset_calories(&self) -> Result<()> {
        self.stats()?.reset_calories()
    }

    pub fn reset_points(&self) -> Result<()> {
        self.stats()?.reset_points()
    }
}
