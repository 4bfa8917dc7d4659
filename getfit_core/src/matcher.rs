//! Workout matching against a user's profile.
//!
//! Two rules decide which catalog exercises are recommended:
//! - **Weight trend**: gaining toward a heavier target calls for strength
//!   work, everything else (losing or maintaining) calls for cardio
//! - **Intensity**: Beginner → Easy, Moderate → Medium, Hard-core → Hard
//!
//! An exercise survives only if it satisfies both. The result is a new
//! sequence in catalog order; the input is never mutated.

use crate::{Difficulty, Exercise, ExerciseType, IntensityLevel, UserProfile};

/// Workout type implied by the profile's weight goal
pub fn required_workout_type(profile: &UserProfile) -> ExerciseType {
    if profile.weight < profile.target_weight {
        ExerciseType::Strength
    } else {
        ExerciseType::Cardio
    }
}

/// Difficulty that matches an intensity level
pub fn required_difficulty(intensity: IntensityLevel) -> Difficulty {
    match intensity {
        IntensityLevel::Beginner => Difficulty::Easy,
        IntensityLevel::Moderate => Difficulty::Medium,
        IntensityLevel::HardCore => Difficulty::Hard,
    }
}

/// Whether a single exercise fits the profile
pub fn matches_profile(exercise: &Exercise, profile: &UserProfile) -> bool {
    let Some(intensity) = profile.intensity_level else {
        return false;
    };
    exercise.difficulty == required_difficulty(intensity)
        && exercise.exercise_type == required_workout_type(profile)
}

/// Filter a catalog down to the exercises recommended for `profile`
///
/// A profile without an intensity level matches nothing. An empty result is
/// a normal outcome.
pub fn filter_workouts(exercises: &[Exercise], profile: &UserProfile) -> Vec<Exercise> {
    let matched: Vec<Exercise> = exercises
        .iter()
        .filter(|e| matches_profile(e, profile))
        .cloned()
        .collect();

    tracing::debug!(
        "Matched {} of {} exercises (want {} / {:?})",
        matched.len(),
        exercises.len(),
        required_workout_type(profile),
        profile.intensity_level.map(required_difficulty)
    );

    matched
}
