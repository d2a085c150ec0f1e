use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use fitlog_core::history::{last_performance, load_recent_history};
use fitlog_core::nutrition::add_entry;
use fitlog_core::schedule::{day_name, exercise_history, is_logged_today};
use fitlog_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Workout and nutrition tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's scheduled workout (default)
    Today,

    /// Log today's workout
    Log {
        /// Accept the prescribed sets without prompting
        #[arg(long)]
        auto_complete: bool,

        /// Set values as EXERCISE:SET:REPS:WEIGHT (1-based indices)
        #[arg(long = "set", value_name = "EX:SET:REPS:WEIGHT")]
        sets: Vec<String>,

        /// Append an extra set to an exercise (1-based index)
        #[arg(long = "add-set", value_name = "EX")]
        add_sets: Vec<usize>,
    },

    /// Show current and longest streaks
    Streak,

    /// Show weekly workout counts and volume
    Progress,

    /// List logged workouts
    History {
        /// Only show dates this exercise was performed
        #[arg(long)]
        exercise: Option<String>,

        /// Only include workouts from the last N days
        #[arg(long)]
        days: Option<i64>,
    },

    /// View or change profile settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Show calorie targets and today's balance
    Calories,

    /// Manage today's food log
    Food {
        #[command(subcommand)]
        action: FoodAction,
    },

    /// Add calories burned through exercise today
    Burn { amount: f64 },

    /// Export history to CSV files in a directory
    Export { dir: PathBuf },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set(SettingsArgs),
}

#[derive(Args)]
struct SettingsArgs {
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    gender: Option<Gender>,
    /// Weight in pounds
    #[arg(long)]
    weight: Option<f64>,
    /// Height in inches
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    activity: Option<ActivityLevel>,
    #[arg(long)]
    goal: Option<Goal>,
}

#[derive(Subcommand)]
enum FoodAction {
    /// Add a food by name lookup, or by explicit values
    Add(FoodArgs),
    /// Add a food by barcode
    Scan { barcode: String },
    /// Remove an entry by id
    Remove { id: Uuid },
    /// List today's entries
    List,
}

#[derive(Args)]
struct FoodArgs {
    /// Food to look up (e.g. "1 apple")
    query: Option<String>,
    #[arg(long, requires = "calories")]
    name: Option<String>,
    #[arg(long)]
    calories: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    protein: f64,
    #[arg(long, default_value_t = 0.0)]
    carbs: f64,
    #[arg(long, default_value_t = 0.0)]
    fat: f64,
}

/// Resolved paths and settings shared by every command
struct Context {
    config: Config,
    store: JsonlStore,
    profile_path: PathBuf,
    today: NaiveDate,
}

fn main() -> Result<()> {
    // Initialize logging
    fitlog_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;

    let mut ctx = Context {
        store: JsonlStore::new(&data_dir),
        profile_path: data_dir.join("profile.json"),
        today: cli.date.unwrap_or_else(|| Local::now().date_naive()),
        config,
    };

    match cli.command {
        Some(Commands::Today) | None => cmd_today(&ctx),
        Some(Commands::Log {
            auto_complete,
            sets,
            add_sets,
        }) => cmd_log(&mut ctx, auto_complete, &sets, &add_sets),
        Some(Commands::Streak) => cmd_streak(&ctx),
        Some(Commands::Progress) => cmd_progress(&ctx),
        Some(Commands::History { exercise, days }) => cmd_history(&ctx, exercise, days),
        Some(Commands::Settings { action }) => cmd_settings(&ctx, action),
        Some(Commands::Calories) => cmd_calories(&ctx),
        Some(Commands::Food { action }) => cmd_food(&mut ctx, action),
        Some(Commands::Burn { amount }) => cmd_burn(&ctx, amount),
        Some(Commands::Export { dir }) => cmd_export(&ctx, dir),
    }
}

fn load_schedule(ctx: &Context) -> Result<WorkoutSchedule> {
    WorkoutSchedule::load_or_default(ctx.config.schedule.path.as_deref())
}

fn cmd_today(ctx: &Context) -> Result<()> {
    let schedule = load_schedule(ctx)?;
    let plan = plan_for(&schedule, ctx.today.weekday());
    let history = load_history(&ctx.store)?;

    println!(
        "It's {}, a Week {} day.",
        day_name(ctx.today.weekday()),
        plan.week
    );
    println!("Today's focus: {}", plan.day.workout_type);

    if plan.day.is_rest() {
        println!("Time to recover and grow.");
        return Ok(());
    }

    if is_logged_today(&history, &plan.day.day, ctx.today) {
        println!("✓ Completed");
    }

    println!();
    for (index, exercise) in plan.day.exercises.iter().enumerate() {
        println!("  {}. {} ({})", index + 1, exercise.name, exercise.sets);
    }

    Ok(())
}

fn cmd_log(ctx: &mut Context, auto_complete: bool, sets: &[String], add_sets: &[usize]) -> Result<()> {
    let schedule = load_schedule(ctx)?;
    let plan = plan_for(&schedule, ctx.today.weekday());

    if plan.day.is_rest() {
        println!("Rest day - nothing to log.");
        return Ok(());
    }

    let history = load_history(&ctx.store)?;
    if is_logged_today(&history, &plan.day.day, ctx.today) {
        println!("{} is already logged for {}.", plan.day.day, ctx.today);
        return Ok(());
    }

    let mut draft = build_draft(&plan.day);

    for exercise in add_sets {
        if let Some(index) = exercise.checked_sub(1) {
            draft.add_set(index);
        }
    }
    for spec in sets {
        apply_set_arg(&mut draft, spec)?;
    }

    if !auto_complete && sets.is_empty() {
        prompt_sets(&mut draft)?;
    }

    let log = finalize_on(draft, &plan.day, plan.week, ctx.today);
    ctx.store.append_log(&log)?;

    println!("\n✓ Workout logged!");
    println!("  {} - {}", log.day, log.workout_type);
    println!("  Volume: {}", weekly::log_volume(&log));
    Ok(())
}

/// Apply an `EX:SET:REPS:WEIGHT` argument to the draft
fn apply_set_arg(draft: &mut Draft, spec: &str) -> Result<()> {
    let parts: Vec<&str> = spec.split(':').collect();
    let [exercise, set, reps, weight] = parts.as_slice() else {
        return Err(Error::Parse(format!(
            "expected EXERCISE:SET:REPS:WEIGHT, got {:?}",
            spec
        )));
    };

    let index = |value: &str| -> Result<usize> {
        value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| Error::Parse(format!("invalid index {:?} in {:?}", value, spec)))
    };

    let exercise = index(*exercise)?;
    let set = index(*set)?;
    draft.set_field(exercise, set, SetField::Reps, reps);
    draft.set_field(exercise, set, SetField::Weight, weight);
    Ok(())
}

/// Ask for reps and weight of every set; empty input keeps the default
fn prompt_sets(draft: &mut Draft) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let layout: Vec<(String, Vec<CompletedSet>)> = draft
        .exercises()
        .iter()
        .map(|e| (e.name.clone(), e.sets.clone()))
        .collect();

    for (ex_index, (name, sets)) in layout.iter().enumerate() {
        println!("\n{}", name);
        for (set_index, set) in sets.iter().enumerate() {
            print!("  Set {} [reps weight, default {} 0]> ", set_index + 1, set.reps);
            io::stdout().flush()?;

            let Some(line) = lines.next().transpose()? else {
                return Ok(());
            };
            let mut fields = line.split_whitespace();
            if let Some(reps) = fields.next() {
                draft.set_field(ex_index, set_index, SetField::Reps, reps);
            }
            if let Some(weight) = fields.next() {
                draft.set_field(ex_index, set_index, SetField::Weight, weight);
            }
        }
    }

    Ok(())
}

fn cmd_streak(ctx: &Context) -> Result<()> {
    let history = load_history(&ctx.store)?;
    let streaks = calculate_streaks(&history, ctx.today);

    println!("Current streak: {} days", streaks.current);
    println!("Longest streak: {} days", streaks.longest);
    Ok(())
}

fn cmd_progress(ctx: &Context) -> Result<()> {
    let history = load_history(&ctx.store)?;
    let weeks = weekly_summaries(&history);

    if weeks.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }

    println!("{:<12} {:>8} {:>12}", "Week of", "Workouts", "Volume (lbs)");
    for week in weeks {
        println!(
            "{:<12} {:>8} {:>12}",
            week.week_start.format("%Y-%m-%d"),
            week.workout_count,
            week.volume
        );
    }
    Ok(())
}

fn cmd_history(ctx: &Context, exercise: Option<String>, days: Option<i64>) -> Result<()> {
    let history = match days {
        Some(days) if days < 0 => {
            return Err(Error::Parse(format!("--days must not be negative, got {}", days)))
        }
        Some(days) => load_recent_history(&ctx.store, ctx.today, days)?,
        None => load_history(&ctx.store)?,
    };

    if let Some(name) = exercise {
        let dates = exercise_history(&history, &name);
        if dates.is_empty() {
            println!("{} has not been logged yet.", name);
        } else {
            println!("{} - logged {} times", name, dates.len());
        }
        for date in dates {
            println!("  {}", date.format("%A, %B %-d %Y"));
        }
        if let Some(log) = last_performance(&history, &name) {
            let sets = log
                .exercises
                .iter()
                .filter(|e| e.name == name)
                .flat_map(|e| e.sets.iter())
                .map(|s| format!("{}x{}", s.reps, s.weight))
                .collect::<Vec<_>>();
            println!("Last time: {}", sets.join(", "));
        }
        return Ok(());
    }

    if history.is_empty() {
        match days {
            Some(days) => println!("No workouts in the last {} days.", days),
            None => println!("No workouts logged yet."),
        }
        return Ok(());
    }

    for log in &history {
        println!(
            "{}  Week {}  {} - {}",
            log.date.format("%Y-%m-%d"),
            log.week,
            log.day,
            log.workout_type
        );
        for exercise in &log.exercises {
            println!("    {}", exercise.name);
            for (index, set) in exercise.sets.iter().enumerate() {
                if set.weight > 0.0 {
                    println!("      Set {}: {} reps @ {} lbs", index + 1, set.reps, set.weight);
                } else {
                    println!("      Set {}: {} reps", index + 1, set.reps);
                }
            }
        }
    }
    Ok(())
}

fn cmd_settings(ctx: &Context, action: Option<SettingsAction>) -> Result<()> {
    let profile = match action {
        Some(SettingsAction::Set(args)) => {
            let updates: Vec<SettingsUpdate> = [
                args.age.map(SettingsUpdate::Age),
                args.gender.map(SettingsUpdate::Gender),
                args.weight.map(SettingsUpdate::Weight),
                args.height.map(SettingsUpdate::Height),
                args.activity.map(SettingsUpdate::ActivityLevel),
                args.goal.map(SettingsUpdate::Goal),
            ]
            .into_iter()
            .flatten()
            .collect();

            let profile = Profile::update(&ctx.profile_path, |profile| {
                let settings = updates
                    .iter()
                    .fold(profile.settings_or_default(), |s, u| s.with(*u));
                profile.settings = Some(settings);
                Ok(())
            })?;
            println!("✓ Settings saved");
            profile
        }
        Some(SettingsAction::Show) | None => Profile::load(&ctx.profile_path)?,
    };

    let settings = profile.settings_or_default();
    if profile.settings.is_none() {
        println!("(defaults - run `fitlog settings set` to save your profile)");
    }
    println!("  Age:      {}", settings.age);
    println!("  Gender:   {:?}", settings.gender);
    println!("  Weight:   {} lbs", settings.weight);
    println!("  Height:   {} in", settings.height);
    println!("  Activity: {:?}", settings.activity_level);
    println!("  Goal:     {}", settings.goal.label());
    Ok(())
}

fn cmd_calories(ctx: &Context) -> Result<()> {
    let profile = Profile::load(&ctx.profile_path)?;
    let settings = profile.settings_or_default();
    let goals = calculate_goals(&settings);
    let target = goals.goals.target_for(settings.goal);

    let entries = ctx.store.load_food_entries(ctx.today)?;
    let balance = DailyBalance::compute(&entries, profile.burned_on(ctx.today), target as f64);

    println!("BMR:  {:.1} kcal", goals.bmr);
    println!("TDEE: {} kcal", goals.tdee);
    println!(
        "Goals: loss {} / maintenance {} / gain {}",
        goals.goals.loss, goals.goals.maintenance, goals.goals.gain
    );
    println!();
    println!("{} goal: {} kcal", settings.goal.label(), target);
    println!("  Consumed:  {}", balance.totals.calories);
    println!("  Burned:    {}", balance.burned);
    println!("  Net:       {}", balance.net);
    println!("  Remaining: {}", balance.remaining);
    println!("  Progress:  {:.0}%", balance.progress_percent);
    if balance.is_over_target() {
        println!("  ⚠ Over budget");
    }
    println!(
        "  Macros:    {}g protein, {}g carbs, {}g fat",
        balance.totals.protein, balance.totals.carbs, balance.totals.fat
    );
    Ok(())
}

fn cmd_food(ctx: &mut Context, action: FoodAction) -> Result<()> {
    let lookup = ctx.config.nutrition.lookup();

    let info = match action {
        FoodAction::Add(args) => match (args.name, args.calories, args.query) {
            (Some(name), Some(calories), _) => Some(FoodInfo {
                name,
                calories,
                protein: args.protein,
                carbs: args.carbs,
                fat: args.fat,
            }),
            (_, _, Some(query)) => lookup.lookup_food(&query),
            _ => {
                return Err(Error::Parse(
                    "give a food to look up or --name with --calories".into(),
                ))
            }
        },
        FoodAction::Scan { barcode } => lookup.lookup_food_by_barcode(&barcode),
        FoodAction::Remove { id } => {
            if ctx.store.remove_food_entry(ctx.today, id)? {
                println!("✓ Removed {}", id);
            } else {
                println!("No entry {} for {}", id, ctx.today);
            }
            return Ok(());
        }
        FoodAction::List => {
            let entries = ctx.store.load_food_entries(ctx.today)?;
            if entries.is_empty() {
                println!("No food logged for {}.", ctx.today);
            }
            for entry in &entries {
                println!(
                    "{}  {}  {} kcal (P {}g / C {}g / F {}g)",
                    entry.id, entry.name, entry.calories, entry.protein, entry.carbs, entry.fat
                );
            }
            let sum = nutrition::totals(&entries);
            println!("Total: {} kcal", sum.calories);
            return Ok(());
        }
    };

    let Some(info) = info else {
        println!("Food not found.");
        return Ok(());
    };

    let entries = ctx.store.load_food_entries(ctx.today)?;
    let updated = add_entry(&entries, info);
    if let Some(entry) = updated.last() {
        ctx.store.append_food_entry(ctx.today, entry)?;
        println!("✓ Added {} ({} kcal)", entry.name, entry.calories);
        println!("  id: {}", entry.id);
    }
    Ok(())
}

fn cmd_burn(ctx: &Context, amount: f64) -> Result<()> {
    let today = ctx.today;
    let profile = Profile::update(&ctx.profile_path, |profile| {
        profile.record_burn(today, amount);
        Ok(())
    })?;

    println!("Burned today: {} kcal", profile.burned_on(today));
    Ok(())
}

fn cmd_export(ctx: &Context, dir: PathBuf) -> Result<()> {
    let history = load_history(&ctx.store)?;
    let paths = fitlog_core::export::export_history(&history, &dir)?;

    println!("✓ Exported {} workouts", history.len());
    println!("  Sets:   {}", paths.sets.display());
    println!("  Weekly: {}", paths.weekly.display());
    Ok(())
}
