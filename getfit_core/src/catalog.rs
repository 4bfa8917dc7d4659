//! Exercise catalog: built-in seed workouts and a CSV-backed store.
//!
//! The CSV file plays the role of the remote exercise catalog. Custom
//! workouts are appended with a fresh id when they arrive with the
//! placeholder id 0.

use crate::types::*;
use crate::{Error, Result};
use fs2::FileExt;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Source of exercises, and sink for custom ones
pub trait ExerciseCatalog {
    fn fetch_all(&self) -> Result<Vec<Exercise>>;

    /// Store an exercise, returning it with its assigned id
    fn add(&self, exercise: Exercise) -> Result<Exercise>;
}

/// Cached seed catalog - built once and reused
static DEFAULT_EXERCISES: Lazy<Vec<Exercise>> = Lazy::new(build_default_exercises);

/// Reference to the cached seed catalog
pub fn default_exercises() -> &'static [Exercise] {
    &DEFAULT_EXERCISES
}

fn seed(
    id: i64,
    name: &str,
    muscle_group: &str,
    exercise_type: ExerciseType,
    sets: u32,
    reps: Reps,
    difficulty: Difficulty,
) -> Exercise {
    Exercise {
        id,
        name: name.into(),
        muscle_group: muscle_group.into(),
        exercise_type,
        sets,
        reps,
        difficulty,
    }
}

fn build_default_exercises() -> Vec<Exercise> {
    use Difficulty::*;
    use ExerciseType::*;

    vec![
        // Cardio
        seed(1, "Brisk Walk", "Legs", Cardio, 1, Reps::Label("20 min".into()), Easy),
        seed(2, "Jumping Jacks", "Full Body", Cardio, 3, Reps::Count(30), Easy),
        seed(3, "Stationary Bike", "Legs", Cardio, 1, Reps::Label("30 min".into()), Medium),
        seed(4, "Jump Rope", "Full Body", Cardio, 4, Reps::Count(100), Medium),
        seed(5, "Sprint Intervals", "Legs", Cardio, 8, Reps::Label("30 sec".into()), Hard),
        seed(6, "Burpees", "Full Body", Cardio, 5, Reps::Label("AMRAP".into()), Hard),
        // Strength
        seed(7, "Bodyweight Squat", "Legs", Strength, 3, Reps::Count(12), Easy),
        seed(8, "Knee Push-up", "Chest", Strength, 3, Reps::Count(10), Easy),
        seed(9, "Dumbbell Row", "Back", Strength, 4, Reps::Count(10), Medium),
        seed(10, "Goblet Squat", "Legs", Strength, 4, Reps::Count(10), Medium),
        seed(11, "Barbell Deadlift", "Back", Strength, 5, Reps::Count(5), Hard),
        seed(12, "Weighted Pull-up", "Back", Strength, 5, Reps::Label("AMRAP".into()), Hard),
    ]
}

/// A row in the catalog CSV
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    id: i64,
    name: String,
    muscle_group: String,
    #[serde(rename = "type")]
    exercise_type: String,
    sets: u32,
    reps: String,
    difficulty: String,
}

impl From<&Exercise> for CsvRow {
    fn from(exercise: &Exercise) -> Self {
        CsvRow {
            id: exercise.id,
            name: exercise.name.clone(),
            muscle_group: exercise.muscle_group.clone(),
            exercise_type: exercise.exercise_type.to_string(),
            sets: exercise.sets,
            reps: exercise.reps.to_string(),
            difficulty: exercise.difficulty.to_string(),
        }
    }
}

impl From<CsvRow> for Exercise {
    fn from(row: CsvRow) -> Self {
        Exercise {
            id: row.id,
            name: row.name,
            muscle_group: row.muscle_group,
            exercise_type: ExerciseType::from(row.exercise_type),
            sets: row.sets,
            reps: Reps::parse(&row.reps),
            difficulty: Difficulty::from(row.difficulty),
        }
    }
}

/// Catalog kept in a CSV file; serves the seed catalog until the file exists
#[derive(Clone, Debug)]
pub struct CsvExerciseCatalog {
    path: PathBuf,
}

impl CsvExerciseCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(file: &File) -> Result<Vec<Exercise>> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut exercises = Vec::new();
        for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| {
                Error::ParseFailure(format!("exercise catalog row {}: {}", idx + 1, e))
            })?;
            exercises.push(Exercise::from(row));
        }
        Ok(exercises)
    }

    fn write_all(&self, exercises: &[Exercise]) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let temp = tempfile::NamedTempFile::new_in(parent)?;
        {
            let mut writer = csv::Writer::from_writer(temp.as_file());
            for exercise in exercises {
                writer.serialize(CsvRow::from(exercise))?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn lock_file(&self) -> Result<File> {
        let lock_path = self.path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_path)?;
        Ok(file)
    }

    fn load_unlocked(&self) -> Result<Vec<Exercise>> {
        if !self.path.exists() {
            tracing::debug!("No catalog at {:?}, serving seed exercises", self.path);
            return Ok(default_exercises().to_vec());
        }
        let file = File::open(&self.path)?;
        Self::read_rows(&file)
    }
}

impl ExerciseCatalog for CsvExerciseCatalog {
    fn fetch_all(&self) -> Result<Vec<Exercise>> {
        let lock = self.lock_file()?;
        lock.lock_shared()?;
        let exercises = self.load_unlocked();
        lock.unlock()?;

        let exercises = exercises?;
        tracing::debug!("Fetched {} exercises from {:?}", exercises.len(), self.path);
        Ok(exercises)
    }

    fn add(&self, mut exercise: Exercise) -> Result<Exercise> {
        let lock = self.lock_file()?;
        lock.lock_exclusive()?;

        let result = self.load_unlocked().and_then(|mut exercises| {
            if exercise.id == 0 {
                exercise.id = exercises.iter().map(|e| e.id).max().unwrap_or(0) + 1;
            } else if exercises.iter().any(|e| e.id == exercise.id) {
                return Err(Error::RemoteFailure(format!(
                    "exercise id {} already exists",
                    exercise.id
                )));
            }
            exercises.push(exercise.clone());
            self.write_all(&exercises)?;
            Ok(exercise)
        });

        lock.unlock()?;

        let added = result?;
        tracing::info!("Added exercise {} ({})", added.id, added.name);
        Ok(added)
    }
}
