use clap::{Parser, Subcommand, ValueEnum};
use getfit_core::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "getfit")]
#[command(about = "Fitness and dining tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Identity to act as (defaults to [session] user in the config)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a profile for a new user
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// Enter biometrics and compute the daily calorie goal
    Biodata {
        /// Weight in kg
        #[arg(long)]
        weight: i32,
        /// Height in cm
        #[arg(long)]
        height: i32,
        /// Target weight in kg
        #[arg(long)]
        target_weight: i32,
        /// Beginner, Moderate or Hard-core (Low, Medium, High also accepted)
        #[arg(long, value_parser = parse_intensity)]
        intensity: IntensityLevel,
    },

    /// Update name, weight, target weight and intensity
    Settings {
        #[arg(long)]
        name: String,
        #[arg(long)]
        weight: i32,
        #[arg(long)]
        target_weight: i32,
        #[arg(long, value_parser = parse_intensity)]
        intensity: IntensityLevel,
    },

    /// Show the stored profile
    Profile,

    /// Show today's calories, goal range, points and check-in status
    Stats,

    /// List dining centers
    Centers,

    /// Show the menu for a dining location
    Menu { slug: String },

    /// Add a menu item's calories to today's total
    Eat { slug: String, item: String },

    /// Award points if today's calories are within the goal range
    Dining,

    /// Daily check-in for points
    CheckIn,

    /// List workouts matching your intensity and weight goal
    Workouts,

    /// Add a custom workout to the catalog
    AddWorkout {
        #[arg(long)]
        name: String,
        #[arg(long)]
        muscle_group: String,
        /// Cardio or Strength
        #[arg(long = "type", default_value = "Cardio")]
        exercise_type: String,
        #[arg(long)]
        sets: u32,
        /// A count or a label such as AMRAP
        #[arg(long)]
        reps: String,
        /// Easy, Medium or Hard
        #[arg(long, default_value = "Easy")]
        difficulty: String,
    },

    /// Reset today's calories or the points total
    Reset {
        #[arg(value_enum)]
        target: ResetTarget,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResetTarget {
    Calories,
    Points,
}

fn parse_intensity(raw: &str) -> std::result::Result<IntensityLevel, String> {
    IntensityLevel::parse_label(raw).ok_or_else(|| {
        format!(
            "unknown intensity '{}' (expected Beginner, Moderate or Hard-core)",
            raw
        )
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    getfit_core::logging::init_with_level(level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    tracing::debug!("Using data directory {:?}", config.data.data_dir);

    // Sign-up without an explicit identity keys the account by email
    let user = match (&cli.user, &cli.command) {
        (Some(user), _) => Some(user.clone()),
        (None, Commands::Signup { email, .. }) => Some(email.clone()),
        (None, _) => config.session.user.clone(),
    };
    let session = match user {
        Some(user) => Session::signed_in(UserId::new(user)),
        None => Session::anonymous(),
    };

    let mut tracker = Tracker::open(&config, session);

    match cli.command {
        Commands::Signup { name, email } => cmd_signup(&mut tracker, &name, &email),
        Commands::Biodata {
            weight,
            height,
            target_weight,
            intensity,
        } => cmd_biodata(&mut tracker, weight, height, target_weight, intensity),
        Commands::Settings {
            name,
            weight,
            target_weight,
            intensity,
        } => cmd_settings(&mut tracker, &name, weight, target_weight, intensity),
        Commands::Profile => cmd_profile(&mut tracker),
        Commands::Stats => cmd_stats(&tracker),
        Commands::Centers => cmd_centers(&tracker),
        Commands::Menu { slug } => cmd_menu(&tracker, &slug),
        Commands::Eat { slug, item } => cmd_eat(&tracker, &slug, &item),
        Commands::Dining => cmd_dining(&tracker),
        Commands::CheckIn => cmd_check_in(&tracker),
        Commands::Workouts => cmd_workouts(&mut tracker),
        Commands::AddWorkout {
            name,
            muscle_group,
            exercise_type,
            sets,
            reps,
            difficulty,
        } => cmd_add_workout(
            &tracker,
            NewWorkout {
                name,
                muscle_group,
                exercise_type: ExerciseType::from(exercise_type),
                sets,
                reps: Reps::parse(&reps),
                difficulty: Difficulty::from(difficulty),
            },
        ),
        Commands::Reset { target } => cmd_reset(&tracker, target),
    }
}

type FileTracker = Tracker<JsonStatsStore>;

fn cmd_signup(tracker: &mut FileTracker, name: &str, email: &str) -> Result<()> {
    let profile = tracker.sign_up(name, email)?;
    println!("✓ Registered {} ({})", profile.name, profile.email);
    println!("  Next: enter your bio-data with `getfit biodata`");
    Ok(())
}

fn cmd_biodata(
    tracker: &mut FileTracker,
    weight: i32,
    height: i32,
    target_weight: i32,
    intensity: IntensityLevel,
) -> Result<()> {
    let range = tracker.submit_biometrics(weight, height, target_weight, Some(intensity))?;
    println!("✓ Data submitted!");
    println!("  Daily calorie goal: {} kcal", range);
    Ok(())
}

fn cmd_settings(
    tracker: &mut FileTracker,
    name: &str,
    weight: i32,
    target_weight: i32,
    intensity: IntensityLevel,
) -> Result<()> {
    let profile = tracker.update_settings(name, weight, target_weight, Some(intensity))?;
    println!("✓ User data updated successfully");
    print_profile(&profile);
    Ok(())
}

fn cmd_profile(tracker: &mut FileTracker) -> Result<()> {
    let profile = tracker.profile()?;
    println!("Hello {}", profile.name);
    print_profile(&profile);
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("  Email: {}", profile.email);
    println!("  Height: {} cm", profile.height);
    println!("  Weight: {} kg", profile.weight);
    println!("  Target weight: {} kg", profile.target_weight);
    println!(
        "  Intensity: {}",
        profile
            .intensity_level
            .map(|i| i.label())
            .unwrap_or("not set")
    );
}

fn cmd_stats(tracker: &FileTracker) -> Result<()> {
    let summary = tracker.summary()?;
    println!("Total Calories: {}", summary.total_calories);
    println!("Goal Range: {}", summary.goal_range);
    println!("Points: {}", summary.total_points);
    println!(
        "Checked in today: {}",
        if summary.checked_in_today { "yes" } else { "no" }
    );
    Ok(())
}

fn cmd_centers(tracker: &FileTracker) -> Result<()> {
    let centers = tracker.dining_centers()?;
    if centers.is_empty() {
        println!("No dining centers available.");
    }
    for center in centers {
        println!("  {} ({})", center.name, center.slug);
    }
    Ok(())
}

fn cmd_menu(tracker: &FileTracker, slug: &str) -> Result<()> {
    let items = tracker.menu(slug)?;
    if items.is_empty() {
        println!("No menu items for {}.", slug);
    }
    for item in items {
        println!("  {:<32} {:>5} kcal", item.name, item.total_cal);
    }
    Ok(())
}

fn cmd_eat(tracker: &FileTracker, slug: &str, item: &str) -> Result<()> {
    let (item, total) = tracker.log_menu_item(slug, item)?;
    println!("✓ Added {} ({} kcal)", item.name, item.total_cal);
    println!("  Total Calories: {}", total);
    Ok(())
}

fn cmd_dining(tracker: &FileTracker) -> Result<()> {
    let visit = tracker.visit_dining()?;
    println!("Total Calories: {}", visit.total_calories);
    println!("Goal Range: {}", visit.goal_range);
    match visit.points_awarded {
        Some(points) => println!("✓ Within your goal range: +{} points", points),
        None => println!("Outside your goal range: no points awarded"),
    }
    Ok(())
}

fn cmd_check_in(tracker: &FileTracker) -> Result<()> {
    match tracker.check_in()? {
        CheckIn::Awarded {
            points,
            total_points,
        } => {
            println!("✓ You've earned {} points for today!", points);
            println!("  Points: {}", total_points);
        }
        CheckIn::AlreadyCheckedIn { total_points } => {
            println!("You've already checked in today!");
            println!("  Points: {}", total_points);
        }
    }
    Ok(())
}

fn cmd_workouts(tracker: &mut FileTracker) -> Result<()> {
    let workouts = tracker.recommended_workouts()?;
    if workouts.is_empty() {
        println!("No workouts match your profile.");
        return Ok(());
    }
    for workout in workouts {
        println!(
            "  #{:<3} {:<24} {:<10} {:<8} {} x {:<8} {}",
            workout.id,
            workout.name,
            workout.muscle_group,
            workout.exercise_type,
            workout.sets,
            workout.reps,
            workout.difficulty
        );
    }
    Ok(())
}

fn cmd_add_workout(tracker: &FileTracker, workout: NewWorkout) -> Result<()> {
    let added = tracker.add_workout(workout)?;
    println!("✓ Added workout #{}: {}", added.id, added.name);
    Ok(())
}

fn cmd_reset(tracker: &FileTracker, target: ResetTarget) -> Result<()> {
    match target {
        ResetTarget::Calories => {
            tracker.reset_calories()?;
            println!("✓ Calories reset");
        }
        ResetTarget::Points => {
            tracker.reset_points()?;
            println!("✓ Points reset");
        }
    }
    Ok(())
}
