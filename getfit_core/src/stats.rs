//! Daily calorie, points and check-in tracking.
//!
//! `DailyStats` is stateless logic over one persisted `DailyStatsRecord` per
//! user. Calorie totals roll over lazily: the first calorie read or write
//! after a local calendar-day boundary zeroes the total before doing anything
//! else. Points and the goal range are not touched by rollover.

use crate::{CalorieGoalRange, Clock, Result, StatsStore, SystemClock, UserId};
use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};

/// Format of the persisted check-in date
pub const CHECK_IN_DATE_FORMAT: &str = "%Y-%m-%d";

/// The persisted per-user record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyStatsRecord {
    pub total_calories: u32,
    /// Milliseconds since the Unix epoch of the last calorie reset
    pub last_reset_timestamp: Option<i64>,
    pub total_points: u32,
    /// Local date of the last check-in, `yyyy-MM-dd`
    pub last_check_in_date: Option<String>,
    pub calorie_goal_lower: i32,
    pub calorie_goal_upper: i32,
}

impl DailyStatsRecord {
    pub fn goal_range(&self) -> CalorieGoalRange {
        CalorieGoalRange::new(self.calorie_goal_lower, self.calorie_goal_upper)
    }

    /// Zero the calorie total if a local day boundary has passed since the
    /// last reset. Returns whether a rollover happened.
    pub fn roll_over_if_due(&mut self, now: &DateTime<Local>) -> bool {
        if !is_midnight_passed(self.last_reset_timestamp, now) {
            return false;
        }
        self.total_calories = 0;
        self.last_reset_timestamp = Some(now.timestamp_millis());
        true
    }

    /// Checked in on `today` (formatted date). A zero points total always
    /// counts as never having checked in.
    pub fn checked_in_on(&self, today: &str) -> bool {
        if self.total_points == 0 {
            return false;
        }
        self.last_check_in_date.as_deref() == Some(today)
    }
}

/// Whether a rollover is due.
///
/// Due when no reset was ever recorded, when the current year is later than
/// the stored one, or when in the same year the day-of-year is later. This is
/// a calendar comparison in local time, not a 24 hour interval.
pub fn is_midnight_passed(last_reset_millis: Option<i64>, now: &DateTime<Local>) -> bool {
    let Some(millis) = last_reset_millis else {
        return true;
    };
    let Some(last) = DateTime::<Utc>::from_timestamp_millis(millis) else {
        tracing::warn!("Unreadable reset timestamp {}, treating as due", millis);
        return true;
    };
    let last = last.with_timezone(&Local);

    now.year() > last.year() || (now.year() == last.year() && now.ordinal() > last.ordinal())
}

/// Today's check-in date string
pub fn format_check_in_date(now: &DateTime<Local>) -> String {
    now.format(CHECK_IN_DATE_FORMAT).to_string()
}

/// Outcome of a check-in attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckIn {
    Awarded { points: u32, total_points: u32 },
    AlreadyCheckedIn { total_points: u32 },
}

/// Daily stats operations for a single user
pub struct DailyStats<S, C = SystemClock> {
    store: S,
    clock: C,
    user: UserId,
}

impl<S: StatsStore> DailyStats<S, SystemClock> {
    pub fn new(store: S, user: UserId) -> Self {
        Self::with_clock(store, SystemClock, user)
    }
}

impl<S: StatsStore, C: Clock> DailyStats<S, C> {
    pub fn with_clock(store: S, clock: C, user: UserId) -> Self {
        Self { store, clock, user }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// The stored record as-is, without any rollover
    pub fn snapshot(&self) -> Result<DailyStatsRecord> {
        self.store.load(&self.user)
    }

    /// Apply a pending rollover. Returns true if the total was reset.
    pub fn rollover_if_due(&self) -> Result<bool> {
        let now = self.clock.now();
        let user = &self.user;
        self.store.update(user, |record| {
            let rolled = record.roll_over_if_due(&now);
            if rolled {
                tracing::info!("Calorie total rolled over for {}", user);
            }
            Ok(rolled)
        })
    }

    /// Apply a pending rollover and return the resulting record with today's
    /// check-in date, all from one locked update.
    pub fn current_record(&self) -> Result<(DailyStatsRecord, String)> {
        let now = self.clock.now();
        let user = &self.user;
        self.store.update(user, |record| {
            if record.roll_over_if_due(&now) {
                tracing::info!("Calorie total rolled over for {}", user);
            }
            Ok((record.clone(), format_check_in_date(&now)))
        })
    }

    /// Calorie total for today.
    ///
    /// Runs the rollover check first, so this may write to the store.
    pub fn total_calories(&self) -> Result<u32> {
        let now = self.clock.now();
        let user = &self.user;
        self.store.update(user, |record| {
            if record.roll_over_if_due(&now) {
                tracing::info!("Calorie total rolled over for {}", user);
            }
            Ok(record.total_calories)
        })
    }

    /// Add calories after the rollover check; refreshes the reset timestamp.
    pub fn add_calories(&self, calories: u32) -> Result<u32> {
        let now = self.clock.now();
        let user = &self.user;
        self.store.update(user, |record| {
            if record.roll_over_if_due(&now) {
                tracing::info!("Calorie total rolled over for {}", user);
            }
            record.total_calories = record.total_calories.saturating_add(calories);
            record.last_reset_timestamp = Some(now.timestamp_millis());
            tracing::debug!(
                "Added {} calories for {}, total {}",
                calories,
                user,
                record.total_calories
            );
            Ok(record.total_calories)
        })
    }

    /// Zero the calorie total and refresh the reset timestamp
    pub fn reset_calories(&self) -> Result<()> {
        let now = self.clock.now();
        self.store.update(&self.user, |record| {
            record.total_calories = 0;
            record.last_reset_timestamp = Some(now.timestamp_millis());
            Ok(())
        })
    }

    /// Zero the calorie total, leaving the reset timestamp alone
    pub fn reset_total_calories(&self) -> Result<()> {
        self.store.update(&self.user, |record| {
            record.total_calories = 0;
            Ok(())
        })
    }

    pub fn total_points(&self) -> Result<u32> {
        Ok(self.snapshot()?.total_points)
    }

    pub fn add_points(&self, points: u32) -> Result<u32> {
        self.store.update(&self.user, |record| {
            record.total_points = record.total_points.saturating_add(points);
            Ok(record.total_points)
        })
    }

    pub fn reset_points(&self) -> Result<()> {
        self.store.update(&self.user, |record| {
            record.total_points = 0;
            Ok(())
        })
    }

    pub fn save_goal_range(&self, range: CalorieGoalRange) -> Result<()> {
        self.store.update(&self.user, |record| {
            record.calorie_goal_lower = range.lower;
            record.calorie_goal_upper = range.upper;
            Ok(())
        })?;
        tracing::info!("Saved calorie goal range {} for {}", range, self.user);
        Ok(())
    }

    /// Saved goal range, `0 - 0` if never set
    pub fn goal_range(&self) -> Result<CalorieGoalRange> {
        Ok(self.snapshot()?.goal_range())
    }

    pub fn is_within_goal_range(&self, total: u32) -> Result<bool> {
        Ok(self.goal_range()?.contains(total))
    }

    /// Award `points` iff `total` lies within the saved goal range
    pub fn add_points_for_calorie_range(&self, total: u32, points: u32) -> Result<bool> {
        let user = &self.user;
        self.store.update(user, |record| {
            if !record.goal_range().contains(total) {
                return Ok(false);
            }
            record.total_points = record.total_points.saturating_add(points);
            tracing::info!(
                "{} calories within goal range, awarded {} points to {}",
                total,
                points,
                user
            );
            Ok(true)
        })
    }

    /// Record today as the last check-in date
    pub fn update_check_in_date(&self) -> Result<()> {
        let today = format_check_in_date(&self.clock.now());
        self.store.update(&self.user, |record| {
            record.last_check_in_date = Some(today);
            Ok(())
        })
    }

    /// False whenever the points total is zero, otherwise whether the last
    /// check-in date is today.
    pub fn has_checked_in_today(&self) -> Result<bool> {
        let today = format_check_in_date(&self.clock.now());
        Ok(self.snapshot()?.checked_in_on(&today))
    }

    /// Award `points` and record today's date unless already checked in today
    pub fn check_in(&self, points: u32) -> Result<CheckIn> {
        let today = format_check_in_date(&self.clock.now());
        let user = &self.user;
        self.store.update(user, |record| {
            if record.checked_in_on(&today) {
                return Ok(CheckIn::AlreadyCheckedIn {
                    total_points: record.total_points,
                });
            }
            record.total_points = record.total_points.saturating_add(points);
            record.last_check_in_date = Some(today);
            tracing::info!("{} checked in, awarded {} points", user, points);
            Ok(CheckIn::Awarded {
                points,
                total_points: record.total_points,
            })
        })
    }
}
