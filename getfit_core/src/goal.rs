//! Daily calorie goal estimation.
//!
//! Simplified Harris-Benedict estimate with the age term fixed at 30 years:
//! - BMR from weight and height
//! - TDEE from an intensity-driven activity multiplier
//! - ±500 kcal adjustment toward the target weight
//! - ±10% band around the resulting goal
//!
//! Intermediate values are truncated to integers after the BMR step and again
//! after the TDEE step. Inputs are not validated.

use crate::{CalorieGoalRange, IntensityLevel};

/// Age used by the BMR term
const FIXED_AGE_YEARS: f64 = 30.0;

/// Daily adjustment applied when losing or gaining weight
const WEIGHT_CHANGE_ADJUSTMENT: i32 = 500;

/// Activity multiplier for an intensity level
///
/// Missing intensity falls back to the lowest multiplier.
pub fn activity_factor(intensity: Option<IntensityLevel>) -> f64 {
    match intensity {
        Some(IntensityLevel::Beginner) | None => 1.2,
        Some(IntensityLevel::Moderate) => 1.55,
        Some(IntensityLevel::HardCore) => 1.9,
    }
}

/// Activity multiplier for a raw intensity label; unknown labels yield 1.2
pub fn activity_factor_for_label(label: &str) -> f64 {
    activity_factor(IntensityLevel::parse_label(label))
}

/// Basal metabolic rate, truncated toward zero
pub fn basal_metabolic_rate(weight: i32, height: i32) -> i32 {
    (10.0 * f64::from(weight) + 6.25 * f64::from(height) - 5.0 * FIXED_AGE_YEARS + 5.0) as i32
}

/// Compute the daily calorie goal range
///
/// ## Steps
///
/// 1. `bmr = trunc(10*weight + 6.25*height - 150 + 5)`
/// 2. `tdee = trunc(bmr * activity_factor)`
/// 3. goal is `tdee - 500` when losing, `tdee + 500` when gaining, else `tdee`
/// 4. `lower = trunc(goal * 0.9)`, `upper = trunc(goal * 1.1)`
pub fn compute_goal_range(
    weight: i32,
    height: i32,
    target_weight: i32,
    intensity: Option<IntensityLevel>,
) -> CalorieGoalRange {
    let bmr = basal_metabolic_rate(weight, height);
    let tdee = (f64::from(bmr) * activity_factor(intensity)) as i32;

    let goal = if target_weight < weight {
        tdee - WEIGHT_CHANGE_ADJUSTMENT
    } else if target_weight > weight {
        tdee + WEIGHT_CHANGE_ADJUSTMENT
    } else {
        tdee
    };

    let range = CalorieGoalRange {
        lower: (f64::from(goal) * 0.9) as i32,
        upper: (f64::from(goal) * 1.1) as i32,
    };

    tracing::debug!(
        "Goal range for weight={} height={} target={}: bmr={} tdee={} goal={} range={}",
        weight,
        height,
        target_weight,
        bmr,
        tdee,
        goal,
        range
    );

    range
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_loss_goal_moderate() {
        // bmr = trunc(700 + 1093.75 - 150 + 5) = 1648
        // tdee = trunc(1648 * 1.55) = 2554, goal = 2054
        let range = compute_goal_range(70, 175, 65, Some(IntensityLevel::Moderate));
        assert_eq!(basal_metabolic_rate(70, 175), 1648);
        assert_eq!(range, CalorieGoalRange::new(1848, 2259));
    }

    #[test]
    fn test_weight_gain_goal_hardcore() {
        // bmr = trunc(600 + 1062.5 - 145) = 1517, tdee = trunc(2882.3) = 2882
        let range = compute_goal_range(60, 170, 70, Some(IntensityLevel::HardCore));
        assert_eq!(range, CalorieGoalRange::new(3043, 3720));
    }

    #[test]
    fn test_maintenance_goal_beginner() {
        // bmr = trunc(800 + 1125 - 145) = 1780, tdee = 2136
        let range = compute_goal_range(80, 180, 80, Some(IntensityLevel::Beginner));
        assert_eq!(range, CalorieGoalRange::new(1922, 2349));
    }

    #[test]
    fn test_truncation_happens_per_step() {
        // height 175 leaves .75 on the BMR; truncating only at the end would
        // give trunc(1648.75 * 1.2) = 1978 instead of trunc(1648 * 1.2) = 1977
        let range = compute_goal_range(70, 175, 70, Some(IntensityLevel::Beginner));
        assert_eq!(range.lower, (1977.0 * 0.9) as i32);
        assert_eq!(range.upper, (1977.0 * 1.1) as i32);
    }

    #[test]
    fn test_activity_factor_is_monotonic() {
        let factors: Vec<f64> = IntensityLevel::ALL
            .iter()
            .map(|i| activity_factor(Some(*i)))
            .collect();
        assert!(factors.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(activity_factor_for_label("Low"), 1.2);
        assert_eq!(activity_factor_for_label("Medium"), 1.55);
        assert_eq!(activity_factor_for_label("High"), 1.9);
    }

    #[test]
    fn test_unknown_intensity_defaults_to_low_factor() {
        assert_eq!(activity_factor_for_label("turbo"), 1.2);
        assert_eq!(activity_factor_for_label(""), 1.2);
        assert_eq!(activity_factor(None), 1.2);
    }

    #[test]
    fn test_lower_never_exceeds_upper_for_positive_goals() {
        for weight in [45, 70, 120] {
            for target in [40, 70, 130] {
                for intensity in IntensityLevel::ALL {
                    let range = compute_goal_range(weight, 170, target, Some(intensity));
                    assert!(range.lower <= range.upper);
                }
            }
        }
    }

    #[test]
    fn test_nonsense_input_does_not_panic() {
        let range = compute_goal_range(0, 0, -10, None);
        // bmr = trunc(-145) = -145, tdee = trunc(-174.0) = -174, goal = -674
        assert_eq!(range, CalorieGoalRange::new(-606, -741));
    }
}
