//! groove - Personal workout tracker

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use groove::fields::{format_number, format_target};
use groove::loader;
use groove::tui::App;
use groove::workout::{blocks, DaySession, Exertion, ExerciseSet, WeekPlan, WorkoutDay};

#[derive(Parser)]
#[command(name = "groove")]
#[command(author, version, about = "groove - Personal workout tracker")]
struct Cli {
    /// Week plan JSON file (defaults to the bundled plan)
    #[arg(long, global = true, env = "GROOVE_WEEK")]
    week: Option<PathBuf>,

    /// Profile JSON file (defaults to the bundled profile)
    #[arg(long, global = true, env = "GROOVE_PROFILE")]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI
    Tui {
        /// Open today's workout directly
        #[arg(short, long)]
        today: bool,
    },

    /// List the days of the plan
    Week,

    /// Show a day grouped into exercise blocks
    Show {
        /// Day name (e.g. "monday") or number
        day: String,
    },

    /// Show the workout planned for today
    Today,

    /// Move an exercise block and print the new order (not saved)
    Reorder {
        /// Day name or number
        day: String,

        /// Block number to move, as printed by `show`
        from: usize,

        /// Position to move it to, counted after taking it out
        to: usize,
    },

    /// Show the user profile
    Profile,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let week_path = cli.week.as_deref();

    match cli.command {
        Some(Commands::Tui { today }) => {
            let week = loader::load_week(week_path)?;
            let profile = loader::load_profile(cli.profile.as_deref())?;
            let open = if today {
                week.day_for(Local::now().weekday()).map(|(i, _)| i)
            } else {
                None
            };
            let mut app = App::new(week, profile);
            if let Some(index) = open {
                app = app.with_day(index);
            }
            app.run()?;
        }

        Some(Commands::Week) => {
            let week = loader::load_week(week_path)?;
            println!("Weekly plan:");
            println!("{:-<60}", "");
            for (n, day) in week.days.iter().enumerate() {
                let names = blocks::block_names(&day.workout);
                println!(
                    "{}. {:12} | {:2} sets | {}",
                    n + 1,
                    day.day,
                    day.workout.len(),
                    names.join(", ")
                );
            }
        }

        Some(Commands::Show { day }) => {
            let week = loader::load_week(week_path)?;
            let (_, day) = find_day(&week, &day)?;
            print_day(&day.day, &day.workout);
        }

        Some(Commands::Today) => {
            let week = loader::load_week(week_path)?;
            let weekday = Local::now().weekday();
            let (_, day) = week.day_for(weekday).context("Week plan has no days")?;
            print_day(&day.day, &day.workout);
        }

        Some(Commands::Reorder { day, from, to }) => {
            let week = loader::load_week(week_path)?;
            let (_, day) = find_day(&week, &day)?;
            let source = from.checked_sub(1).context("Block numbers start at 1")?;
            let destination = to.checked_sub(1).context("Block numbers start at 1")?;

            let mut session = DaySession::new(day);
            session
                .move_block(source, destination)
                .with_context(|| format!("Cannot move block {} to {}", from, to))?;
            print_day(session.day_name(), session.sets());
        }

        Some(Commands::Profile) => {
            let profile = loader::load_profile(cli.profile.as_deref())?;
            let range = &profile.desired_workouts_per_week;
            println!("{}", profile.name);
            println!("{:-<40}", "");
            println!("Age:            {}", profile.age);
            println!("Gender:         {}", profile.gender);
            println!("Activity level: {}", profile.activity_level);
            println!("Workouts/week:  {}-{}", range.start, range.end);
            println!("Favorites:      {}", profile.favorite_exercises.join(", "));
            for interest in &profile.interests {
                println!("Interest:       {} ({})", interest.name, interest.skill);
            }
        }

        None => {
            // Default: show TUI
            let week = loader::load_week(week_path)?;
            let profile = loader::load_profile(cli.profile.as_deref())?;
            let mut app = App::new(week, profile);
            app.run()?;
        }
    }

    Ok(())
}

fn find_day<'a>(week: &'a WeekPlan, query: &str) -> Result<(usize, &'a WorkoutDay)> {
    week.find_day(query)
        .with_context(|| format!("No day {:?} in the week plan", query))
}

fn print_day(name: &str, sets: &[ExerciseSet]) {
    let done = sets.iter().filter(|s| s.done).count();
    println!("{} ({}/{} done)", name, done, sets.len());
    println!("{:-<60}", "");

    for (n, block) in blocks::group(sets).iter().enumerate() {
        println!("{}. {}", n + 1, block.exercise);
        for &index in &block.members {
            println!("   {}", format_set(&sets[index]));
        }
    }
}

fn format_set(set: &ExerciseSet) -> String {
    let intensity = if set.has_intensity() {
        format!(
            "{} (actual {})",
            format_target(set.intensity, &set.intensity_unit),
            format_number(set.actual_intensity)
        )
    } else {
        "-".to_string()
    };
    format!(
        "{:>10} (actual {:>4}) | {:24} | {:6} | {}",
        format_target(set.amount, &set.amount_unit),
        format_number(set.actual_amount),
        intensity,
        Exertion::display(set.perceived_exertion),
        if set.done { "done" } else { "" }
    )
}
