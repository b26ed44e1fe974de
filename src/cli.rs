//! Command-line surface and its handlers.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::goal::{self, ActivityLevel, Climate};
use crate::history;
use crate::intake::IntakeTracker;
use crate::prefs::{self, Preferences, VolumeUnit, WeightUnit};
use crate::reminders::{ReminderManager, TokioScheduler};
use crate::server::{self, LanguageSettings, ProfileRecord, StubState};
use crate::storage::{JsonFileStore, KeyValueStore, StoreError, KEY_DAILY_GOAL};
use crate::client;

#[derive(Parser)]
#[command(name = "aqualog", version, about = "a smol headless tracker to remind you to drink")]
pub struct Cli {
    /// Override the data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute and save the daily water goal from your profile
    Goal {
        /// Body weight, in the configured weight unit
        weight: f64,
        #[arg(long, value_enum, default_value_t = ActivityLevel::Sedentary)]
        activity: ActivityLevel,
        #[arg(long, value_enum, default_value_t = Climate::Temperate)]
        climate: Climate,
    },

    /// Log a drink against today's goal
    Drink {
        /// Amount in milliliters
        #[arg(default_value_t = 250.0)]
        amount: f64,
    },

    /// Show today's intake and what's left of the day
    Status,

    /// Per-day intake totals
    History,

    /// Show or change display units
    Prefs {
        #[arg(long, value_enum)]
        unit: Option<VolumeUnit>,
        #[arg(long, value_enum)]
        weight: Option<WeightUnit>,
    },

    /// Run repeating daily reminders until interrupted
    Remind {
        /// One or more HH:MM times of day
        #[arg(long = "at", required = true)]
        times: Vec<ReminderTime>,
    },

    /// Run the single-record profile/settings stub
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },

    /// Talk to a running stub
    Sync {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
        #[command(subcommand)]
        action: SyncAction,
    },
}

#[derive(Subcommand)]
pub enum SyncAction {
    /// Send a profile (and its derived goal) to the stub
    Push {
        /// Body weight, in the configured weight unit
        weight: f64,
        #[arg(long, value_enum, default_value_t = ActivityLevel::Sedentary)]
        activity: ActivityLevel,
        #[arg(long, value_enum, default_value_t = Climate::Temperate)]
        climate: Climate,
    },
    /// Fetch the stub's record and adopt its daily goal
    Pull,
    /// Read or change the stub's language setting
    Language {
        #[arg(long)]
        set: Option<String>,
    },
}

/// A wall-clock time of day, parsed from `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderTime {
    pub hour: u32,
    pub minute: u32,
}

impl std::str::FromStr for ReminderTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got {s:?}"))?;
        let hour: u32 = hour.parse().map_err(|_| format!("bad hour in {s:?}"))?;
        let minute: u32 = minute.parse().map_err(|_| format!("bad minute in {s:?}"))?;
        if hour > 23 || minute > 59 {
            return Err(format!("{s:?} is not a valid time of day"));
        }
        Ok(Self { hour, minute })
    }
}

pub async fn run(data_dir: &Path, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Goal {
            weight,
            activity,
            climate,
        } => handle_goal(data_dir, weight, activity, climate).await,
        Commands::Drink { amount } => handle_drink(data_dir, amount).await,
        Commands::Status => handle_status(data_dir).await,
        Commands::History => handle_history(data_dir).await,
        Commands::Prefs { unit, weight } => handle_prefs(data_dir, unit, weight).await,
        Commands::Remind { times } => handle_remind(times).await,
        Commands::Serve { addr } => handle_serve(addr).await,
        Commands::Sync { server, action } => handle_sync(data_dir, &server, action).await,
    }
}

async fn open_store(data_dir: &Path) -> Result<JsonFileStore, StoreError> {
    JsonFileStore::open(data_dir.join("store.json")).await
}

async fn handle_goal(
    data_dir: &Path,
    weight: f64,
    activity: ActivityLevel,
    climate: Climate,
) -> anyhow::Result<()> {
    let mut store = open_store(data_dir).await?;
    let prefs = prefs::load(&store).await?;

    let goal = goal::compute_goal(prefs.weight.to_kg(weight), activity, climate)?;
    store.set(KEY_DAILY_GOAL, &goal.to_string()).await?;

    println!("Daily water goal: {goal} mL ({activity}, {climate})");
    Ok(())
}

async fn handle_drink(data_dir: &Path, amount: f64) -> anyhow::Result<()> {
    let store = open_store(data_dir).await?;
    let prefs = prefs::load(&store).await?;

    let mut tracker = IntakeTracker::load(store, Local::now().date_naive()).await?;
    let state = tracker.drink(amount).await?;

    println!(
        "You've drunk {} today",
        prefs.unit.format(state.current_intake_ml)
    );
    print_remaining(&prefs, state.remaining_ml);
    Ok(())
}

async fn handle_status(data_dir: &Path) -> anyhow::Result<()> {
    let store = open_store(data_dir).await?;
    let prefs = prefs::load(&store).await?;

    let tracker = IntakeTracker::load(store, Local::now().date_naive()).await?;
    let state = tracker.state();

    let percent = (state.current_intake_ml / state.daily_goal_ml * 100.0).round();

    println!("{}", state.date);
    println!(
        "{}",
        motivational_message(state.current_intake_ml, state.daily_goal_ml)
    );
    println!(
        "You've drunk {} today ({percent:.0}% of {})",
        prefs.unit.format(state.current_intake_ml),
        prefs.unit.format(state.daily_goal_ml),
    );
    print_remaining(&prefs, state.remaining_ml);

    let left = time_until_midnight(Local::now().naive_local());
    println!(
        "{:02}h {:02}m {:02}s left to hydrate",
        left.num_hours(),
        left.num_minutes() % 60,
        left.num_seconds() % 60
    );
    Ok(())
}

fn print_remaining(prefs: &Preferences, remaining_ml: f64) {
    if remaining_ml > 0.0 {
        println!(
            "You need {} more to reach your goal",
            prefs.unit.format(remaining_ml)
        );
    } else {
        println!("You've reached your daily goal!");
    }
}

async fn handle_history(data_dir: &Path) -> anyhow::Result<()> {
    let store = open_store(data_dir).await?;
    let prefs = prefs::load(&store).await?;

    let totals = history::daily_totals(&history::load_history(&store).await?);
    if totals.is_empty() {
        println!("No history available yet!");
        return Ok(());
    }

    for (date, total) in totals {
        println!("{date}  {}", prefs.unit.format(total));
    }
    Ok(())
}

async fn handle_prefs(
    data_dir: &Path,
    unit: Option<VolumeUnit>,
    weight: Option<WeightUnit>,
) -> anyhow::Result<()> {
    let mut store = open_store(data_dir).await?;
    let mut current = prefs::load(&store).await?;

    if unit.is_some() || weight.is_some() {
        if let Some(unit) = unit {
            current.unit = unit;
        }
        if let Some(weight) = weight {
            current.weight = weight;
        }
        prefs::save(&mut store, current).await?;
    }

    println!(
        "Units: {}, {}",
        current.unit.as_key(),
        current.weight.as_key()
    );
    Ok(())
}

async fn handle_remind(times: Vec<ReminderTime>) -> anyhow::Result<()> {
    let mut manager = ReminderManager::new(TokioScheduler::new());

    for time in &times {
        let reminder = manager
            .add(time.hour, time.minute, Local::now().naive_local())
            .await?;
        println!("Reminder set for {:02}:{:02}", reminder.hour, reminder.minute);
    }

    println!("Press Ctrl-C to stop.");
    tokio::signal::ctrl_c().await?;

    let ids: Vec<u64> = manager.list().iter().map(|reminder| reminder.id).collect();
    for id in ids {
        if let Err(err) = manager.cancel(id).await {
            warn!(%err, "failed to cancel reminder on shutdown");
        }
    }
    Ok(())
}

async fn handle_serve(addr: String) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || server::run(&addr, StubState::default())).await??;
    Ok(())
}

async fn handle_sync(data_dir: &Path, server: &str, action: SyncAction) -> anyhow::Result<()> {
    match action {
        SyncAction::Push {
            weight,
            activity,
            climate,
        } => {
            let store = open_store(data_dir).await?;
            let prefs = prefs::load(&store).await?;

            let goal = goal::compute_goal(prefs.weight.to_kg(weight), activity, climate)?;
            let profile = ProfileRecord {
                weight: weight.to_string(),
                activity_level: activity.to_string(),
                climate: climate.to_string(),
                daily_goal: goal,
            };

            client::push_profile(server, &profile).await?;
            println!("Profile saved to {server} (goal {goal} mL)");
        }

        SyncAction::Pull => {
            let profile = client::fetch_profile(server).await?;

            let mut store = open_store(data_dir).await?;
            store
                .set(KEY_DAILY_GOAL, &profile.daily_goal.to_string())
                .await?;

            println!(
                "Adopted daily goal {} mL from {server} ({}, {})",
                profile.daily_goal, profile.activity_level, profile.climate
            );
        }

        SyncAction::Language { set } => match set {
            Some(language) => {
                client::push_settings(server, &LanguageSettings { language: language.clone() })
                    .await?;
                println!("Language set to {language}");
            }
            None => {
                let settings = client::fetch_settings(server).await?;
                println!("Language: {}", settings.language);
            }
        },
    }
    Ok(())
}

/// Encouragement copy keyed to quarter-goal thresholds.
fn motivational_message(intake_ml: f64, goal_ml: f64) -> &'static str {
    if intake_ml >= goal_ml {
        "Congrats! You've reached your daily goal! Keep hydrating!"
    } else if intake_ml > goal_ml * 0.75 {
        "Almost there! You're doing great, just a little more!"
    } else if intake_ml > goal_ml * 0.5 {
        "You're halfway there! Keep going!"
    } else if intake_ml > goal_ml * 0.25 {
        "Keep it up! You're making progress!"
    } else {
        "Start strong! Hydrate and feel energized!"
    }
}

fn time_until_midnight(now: NaiveDateTime) -> chrono::Duration {
    match now.date().succ_opt() {
        Some(tomorrow) => tomorrow.and_time(NaiveTime::MIN) - now,
        None => chrono::Duration::zero(),
    }
}
