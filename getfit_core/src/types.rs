//! Core domain types for the GetFit tracker.
//!
//! This module defines the plain data shapes exchanged with the profile store,
//! the exercise catalog and the dining menu source:
//! - User identity and profile (biometrics, intensity preference)
//! - Exercises and their polymorphic rep targets
//! - Dining centers and menu items
//! - Calorie goal ranges

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identity and Profile
// ============================================================================

/// Identity used to key profile and daily-stats lookups
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-system safe stem for per-user documents.
    ///
    /// Bytes outside `[A-Za-z0-9.-]` are written as `_XX` hex escapes
    /// (including `_` itself), so distinct ids never share a stem.
    pub fn file_stem(&self) -> String {
        let mut stem = String::with_capacity(self.0.len());
        for byte in self.0.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
                stem.push(char::from(byte));
            } else {
                stem.push_str(&format!("_{:02X}", byte));
            }
        }
        stem
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared workout intensity preference
///
/// The canonical vocabulary is Beginner / Moderate / Hard-core. The bio-data
/// form historically offered Low / Medium / High for the same field, so those
/// labels are accepted as aliases when parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntensityLevel {
    Beginner,
    Moderate,
    HardCore,
}

impl IntensityLevel {
    pub const ALL: [IntensityLevel; 3] = [
        IntensityLevel::Beginner,
        IntensityLevel::Moderate,
        IntensityLevel::HardCore,
    ];

    /// Canonical stored label
    pub fn label(&self) -> &'static str {
        match self {
            IntensityLevel::Beginner => "Beginner",
            IntensityLevel::Moderate => "Moderate",
            IntensityLevel::HardCore => "Hard-core",
        }
    }

    /// Label in the Low / Medium / High vocabulary
    pub fn activity_label(&self) -> &'static str {
        match self {
            IntensityLevel::Beginner => "Low",
            IntensityLevel::Moderate => "Medium",
            IntensityLevel::HardCore => "High",
        }
    }

    /// Parse a label from either vocabulary, case-insensitively.
    ///
    /// Returns `None` for empty or unrecognized labels.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "beginner" | "low" => Some(IntensityLevel::Beginner),
            "moderate" | "medium" => Some(IntensityLevel::Moderate),
            "hard-core" | "hardcore" | "hard core" | "high" => Some(IntensityLevel::HardCore),
            _ => None,
        }
    }
}

impl fmt::Display for IntensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stores an optional intensity as its label, `""` meaning unset.
mod intensity_label {
    use super::IntensityLevel;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<IntensityLevel>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(value.map(|v| v.label()).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<IntensityLevel>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(IntensityLevel::parse_label))
    }
}

/// Snapshot of a user's profile document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Height in centimetres
    #[serde(default)]
    pub height: i32,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: i32,
    #[serde(default, with = "intensity_label")]
    pub intensity_level: Option<IntensityLevel>,
    #[serde(default)]
    pub target_weight: i32,
}

impl UserProfile {
    /// Blank profile written at sign-up, before bio-data is entered
    pub fn new_signup(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            height: 0,
            weight: 0,
            intensity_level: None,
            target_weight: 0,
        }
    }
}

// ============================================================================
// Exercise Types
// ============================================================================

/// Kind of workout
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExerciseType {
    Cardio,
    Strength,
    Other(String),
}

impl From<String> for ExerciseType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "cardio" => ExerciseType::Cardio,
            "strength" => ExerciseType::Strength,
            _ => ExerciseType::Other(raw),
        }
    }
}

impl From<ExerciseType> for String {
    fn from(value: ExerciseType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseType::Cardio => f.write_str("Cardio"),
            ExerciseType::Strength => f.write_str("Strength"),
            ExerciseType::Other(s) => f.write_str(s),
        }
    }
}

/// Difficulty rating of an exercise
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl From<String> for Difficulty {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(raw),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("Easy"),
            Difficulty::Medium => f.write_str("Medium"),
            Difficulty::Hard => f.write_str("Hard"),
            Difficulty::Other(s) => f.write_str(s),
        }
    }
}

/// Rep target: a plain count or a free-form label such as "AMRAP"
///
/// Documents store reps as text in some places (the catalog CSV), so a label
/// made only of digits is not distinct from a count: `Label("12")` is written
/// as `12` and reads back as `Count(12)`. `Reps::parse` never builds one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RepsRepr", into = "RepsRepr")]
pub enum Reps {
    Count(u32),
    Label(String),
}

impl Reps {
    /// Numeric strings become counts, anything else is kept as a label.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<u32>() {
            Ok(n) => Reps::Count(n),
            Err(_) => Reps::Label(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reps::Count(n) => write!(f, "{}", n),
            Reps::Label(s) => f.write_str(s),
        }
    }
}

/// Wire form of `Reps`: documents carry either a number or a string
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RepsRepr {
    Count(u32),
    Text(String),
}

impl From<RepsRepr> for Reps {
    fn from(repr: RepsRepr) -> Self {
        match repr {
            RepsRepr::Count(n) => Reps::Count(n),
            RepsRepr::Text(s) => Reps::parse(&s),
        }
    }
}

impl From<Reps> for RepsRepr {
    fn from(reps: Reps) -> Self {
        match reps {
            Reps::Count(n) => RepsRepr::Count(n),
            Reps::Label(s) => RepsRepr::Text(s),
        }
    }
}

/// A single exercise from the catalog or entered by the user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Catalog id; 0 is a placeholder left for the catalog to assign
    pub id: i64,
    pub name: String,
    pub muscle_group: String,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub sets: u32,
    pub reps: Reps,
    pub difficulty: Difficulty,
}

// ============================================================================
// Dining Types
// ============================================================================

/// A dining location; `slug` keys its menu
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningCenter {
    pub name: String,
    pub slug: String,
}

/// One item on a dining menu
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(rename = "totalCal")]
    pub total_cal: u32,
}

// ============================================================================
// Goal Range
// ============================================================================

/// Daily calorie goal band, inclusive on both ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieGoalRange {
    pub lower: i32,
    pub upper: i32,
}

impl CalorieGoalRange {
    pub fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    /// Inclusive membership test
    pub fn contains(&self, total: u32) -> bool {
        let total = i64::from(total);
        i64::from(self.lower) <= total && total <= i64::from(self.upper)
    }
}

impl fmt::Display for CalorieGoalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.lower, self.upper)
    }
}
