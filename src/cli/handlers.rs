use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::cli::args::GoalCommands;
use crate::config::AppConfig;
use crate::db::repository::{AchievementRepo, EntryRepo, GoalRepo, MetaRepo, StatsRepo};
use crate::models::entry::validate_weight_kg;
use crate::models::{AchievementKind, Unit};
use crate::utils::format::{format_delta, format_weight, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const TEAL: &str = "\x1b[38;2;86;182;194m";

// ─── Setup wizard ────────────────────────────────────────────────────────────

pub fn handle_setup(conn: &Connection, config: &mut AppConfig, reset: bool) -> Result<()> {
    if !reset {
        if let Some(done) = MetaRepo::get(conn, "setup_done")? {
            if done == "1" {
                println!("libra is already configured. Use --reset to reconfigure.");
                return Ok(());
            }
        }
    }

    println!();
    println_colored!(TEAL, "  Welcome to libra");
    println!();

    let unit_input = prompt("  Display unit [kg/lb] (default kg): ")?;
    config.display.unit = if unit_input.trim().is_empty() {
        Unit::Kg
    } else {
        Unit::from_str(unit_input.trim())?
    };

    let height_input = prompt("  Height in cm, for BMI (blank to skip): ")?;
    config.profile.height_cm = if height_input.trim().is_empty() {
        None
    } else {
        let h: f64 = height_input
            .trim()
            .parse()
            .map_err(|_| anyhow!("'{}' is not a valid height", height_input.trim()))?;
        if !(50.0..=280.0).contains(&h) {
            return Err(anyhow!("Height {} cm looks wrong", h));
        }
        Some(h)
    };

    config.save()?;

    let target_input = prompt(&format!(
        "  Goal weight in {}, to set a goal now (blank to skip): ",
        config.display.unit
    ))?;
    if !target_input.trim().is_empty() {
        let target: f64 = target_input
            .trim()
            .parse()
            .map_err(|_| anyhow!("'{}' is not a valid weight", target_input.trim()))?;
        let start_input = prompt(&format!("  Current weight in {}: ", config.display.unit))?;
        let start: f64 = start_input
            .trim()
            .parse()
            .map_err(|_| anyhow!("'{}' is not a valid weight", start_input.trim()))?;
        set_goal(conn, config, target, Some(start), None)?;
    }

    MetaRepo::set(conn, "setup_done", "1")?;
    println!();
    println_colored!(GREEN, "  ✓ Setup complete — run `libra log <weight>` daily");
    println!();
    Ok(())
}

// ─── Log ─────────────────────────────────────────────────────────────────────

pub fn handle_log(
    conn: &Connection,
    config: &AppConfig,
    weight: f64,
    date: Option<&str>,
    note: Option<&str>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let recorded_on = match date {
        Some(s) => parse_user_date(s)?,
        None => today,
    };
    if recorded_on > today {
        return Err(anyhow!("Cannot log a weight in the future ({})", recorded_on));
    }

    let kg = config.display.unit.to_kg(weight);
    let kg = validate_weight_kg(kg)?;

    let previous = EntryRepo::latest(conn)?;
    EntryRepo::add(conn, recorded_on, kg, note)?;

    println_colored!(
        GREEN,
        "  ✓ Logged {} on {}",
        format_weight(kg, config.display.unit),
        recorded_on
    );
    if let Some(prev) = previous {
        println_colored!(
            DIM,
            "    {} since {}",
            format_delta(kg - prev.value, config.display.unit),
            prev.recorded_on
        );
    }

    // Goal completion check before the achievement pass, so GoalReached
    // can unlock in the same invocation.
    if let Some((goal, progress)) = StatsRepo::goal_progress(conn)? {
        if progress.is_complete() && !goal.is_completed() {
            GoalRepo::mark_completed(conn, goal.id)?;
            println_colored!(
                GREEN,
                "  ★ Goal reached: {}!",
                format_weight(goal.target_weight, config.display.unit)
            );
        } else if !progress.is_complete() {
            println_colored!(
                DIM,
                "    Goal: {}% there, {} to go",
                progress.percent(),
                format_weight(progress.remaining, config.display.unit)
            );
        }
    }

    let streak = StatsRepo::streaks(conn, today)?;
    if streak.current > 1 {
        println_colored!(AMBER, "  ▲ {} day streak (best: {})", streak.current, streak.best);
    }

    announce_unlocks(&AchievementRepo::refresh(conn, today)?);
    Ok(())
}

fn announce_unlocks(fresh: &[AchievementKind]) {
    for kind in fresh {
        println_colored!(TEAL, "  ◆ Achievement unlocked: {}", kind.title());
    }
}

// ─── Goal ────────────────────────────────────────────────────────────────────

pub fn handle_goal(conn: &Connection, config: &AppConfig, action: &GoalCommands) -> Result<()> {
    match action {
        GoalCommands::Set { target, start, by } => {
            let target_date = by.as_deref().map(parse_user_date).transpose()?;
            set_goal(conn, config, *target, *start, target_date)?;
        }
        GoalCommands::Show => show_goal(conn, config)?,
        GoalCommands::Clear => {
            GoalRepo::clear(conn)?;
            println_colored!(DIM, "  Goal cleared");
        }
    }
    Ok(())
}

fn set_goal(
    conn: &Connection,
    config: &AppConfig,
    target: f64,
    start: Option<f64>,
    target_date: Option<NaiveDate>,
) -> Result<()> {
    let unit = config.display.unit;
    let target_kg = validate_weight_kg(unit.to_kg(target))?;

    let start_kg = match start {
        Some(s) => validate_weight_kg(unit.to_kg(s))?,
        None => EntryRepo::latest(conn)?
            .map(|e| e.value)
            .ok_or_else(|| anyhow!("No entries yet — pass --start or log a weight first"))?,
    };

    let today = Local::now().date_naive();
    GoalRepo::set(conn, start_kg, target_kg, today, target_date)?;

    let direction = if target_kg < start_kg { "lose" } else if target_kg > start_kg { "gain" } else { "maintain" };
    println_colored!(
        GREEN,
        "  ✓ Goal set: {} → {} ({})",
        format_weight(start_kg, unit),
        format_weight(target_kg, unit),
        direction
    );
    if let Some(by) = target_date {
        println_colored!(DIM, "    Deadline: {}", by);
    }
    Ok(())
}

fn show_goal(conn: &Connection, config: &AppConfig) -> Result<()> {
    let unit = config.display.unit;
    println!();
    match StatsRepo::goal_progress(conn)? {
        None => println_colored!(DIM, "  No goal set. Use `libra goal set <target>`."),
        Some((goal, progress)) => {
            println_colored!(
                TEAL,
                "  Goal: {} → {}  ({})",
                format_weight(goal.start_weight, unit),
                format_weight(goal.target_weight, unit),
                goal.direction().display_name()
            );
            println!();
            println_colored!(
                BOLD,
                "  {}  {}%",
                progress_bar(progress.fraction, 24),
                progress.percent()
            );
            if progress.is_complete() {
                println_colored!(GREEN, "  ★ Complete!");
            } else {
                println_colored!(
                    DIM,
                    "  {} to go",
                    format_weight(progress.remaining, unit)
                );
            }
            if let Some(by) = goal.target_date {
                let days_left = (by - Local::now().date_naive()).num_days();
                if days_left >= 0 {
                    println_colored!(DIM, "  Deadline: {} ({} days left)", by, days_left);
                } else {
                    println_colored!(AMBER, "  Deadline: {} (passed)", by);
                }
            }
        }
    }
    println!();
    Ok(())
}

// ─── History ─────────────────────────────────────────────────────────────────

pub fn handle_history(conn: &Connection, config: &AppConfig, limit: Option<u32>) -> Result<()> {
    let unit = config.display.unit;
    let limit = limit.unwrap_or(config.display.history_limit);
    let entries = EntryRepo::get_recent(conn, limit)?;

    println!();
    if entries.is_empty() {
        println_colored!(DIM, "  No entries yet. Use `libra log <weight>`.");
        println!();
        return Ok(());
    }

    println_colored!(TEAL, "  History (latest {})", entries.len());
    println!();
    // entries are newest-first; delta compares each row to the one below it
    for pair in entries.windows(2) {
        print_entry_line(&pair[0], Some(pair[1].value), unit);
    }
    if let Some(last) = entries.last() {
        print_entry_line(last, None, unit);
    }
    println!();
    Ok(())
}

fn print_entry_line(entry: &crate::models::WeightEntry, prev_value: Option<f64>, unit: Unit) {
    let delta = prev_value
        .map(|p| format!("  {}", format_delta(entry.value - p, unit)))
        .unwrap_or_default();
    let note = entry
        .note
        .as_deref()
        .map(|n| format!("  — {}", n))
        .unwrap_or_default();
    println!(
        "  #{:<4} {}  {:>9}{}{}",
        entry.id,
        entry.recorded_on,
        format_weight(entry.value, unit),
        delta,
        note
    );
}

pub fn handle_delete(conn: &Connection, id: i64) -> Result<()> {
    if EntryRepo::delete(conn, id)? {
        println_colored!(GREEN, "  ✓ Deleted entry #{}", id);
    } else {
        println_colored!(RED, "  ✗ No entry with id {}", id);
    }
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(conn: &Connection, config: &AppConfig, month: bool) -> Result<()> {
    let unit = config.display.unit;
    let today = Local::now().date_naive();

    let streak = StatsRepo::streaks(conn, today)?;
    let trend = StatsRepo::trend(conn, today)?;
    let latest = EntryRepo::latest(conn)?;
    let count = EntryRepo::count(conn)?;

    println!();
    println_colored!(TEAL, "  Statistics");
    println!();
    println_colored!(
        BOLD,
        "  Streak:      {} days current  |  {} days best",
        streak.current,
        streak.best
    );
    println!("  Entries:     {}", count);

    if let Some(entry) = &latest {
        println!(
            "  Current:     {}  ({})",
            format_weight(entry.value, unit),
            entry.recorded_on
        );
        if let Some(bmi) = config.bmi(entry.value) {
            println!("  BMI:         {:.1} ({})", bmi, bmi_category(bmi));
        }
    }

    match trend.change_7d {
        Some(d) => println!("  7-day:       {}", format_delta(d, unit)),
        None => println_colored!(DIM, "  7-day:       not enough data"),
    }
    match trend.change_30d {
        Some(d) => println!("  30-day:      {}", format_delta(d, unit)),
        None => println_colored!(DIM, "  30-day:      not enough data"),
    }
    println!("  Trend:       {}", trend.direction());

    if let Some((goal, progress)) = StatsRepo::goal_progress(conn)? {
        println!();
        println_colored!(
            BOLD,
            "  Goal:        {}  {}%  ({} to go)",
            progress_bar(progress.fraction, 16),
            progress.percent(),
            format_weight(progress.remaining, unit)
        );
        if let Some(by) = goal.target_date {
            println_colored!(DIM, "  Deadline:    {}", by);
        }
    }

    if month {
        println!();
        println_colored!(DIM, "  Last 30 days");
        println!();
        let since = today - chrono::Duration::days(29);
        let series = EntryRepo::daily_series(conn, since)?;
        if series.len() < 2 {
            println_colored!(DIM, "  (need at least two days of entries)");
        } else {
            let min = series.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
            let max = series.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
            let span = (max - min).max(0.1);
            for point in &series {
                let filled = (((point.value - min) / span) * 20.0).round() as usize;
                println!(
                    "  {}  {}{}  {}",
                    point.date,
                    "▇".repeat(filled.max(1)),
                    " ".repeat(20usize.saturating_sub(filled.max(1))),
                    format_weight(point.value, unit)
                );
            }
        }
    }

    println!();
    Ok(())
}

fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "underweight"
    } else if bmi < 25.0 {
        "normal"
    } else if bmi < 30.0 {
        "overweight"
    } else {
        "obese"
    }
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ExportSummary {
    generated_on: String,
    unit: Unit,
    entry_count: u64,
    current_weight: Option<f64>,
    streak_current: u32,
    streak_best: u32,
    change_7d: Option<f64>,
    change_30d: Option<f64>,
    trend: &'static str,
    goal: Option<ExportGoal>,
    achievements: Vec<String>,
}

#[derive(Serialize)]
struct ExportGoal {
    start_weight: f64,
    target_weight: f64,
    fraction: f64,
    remaining: f64,
    target_date: Option<String>,
    completed: bool,
}

pub fn handle_export(conn: &Connection, config: &AppConfig, json: bool) -> Result<()> {
    let unit = config.display.unit;
    let today = Local::now().date_naive();

    let streak = StatsRepo::streaks(conn, today)?;
    let trend = StatsRepo::trend(conn, today)?;
    let latest = EntryRepo::latest(conn)?;
    let goal_progress = StatsRepo::goal_progress(conn)?;
    let achievements = AchievementRepo::unlocked(conn)?;

    if json {
        let summary = ExportSummary {
            generated_on: today.to_string(),
            unit,
            entry_count: EntryRepo::count(conn)?,
            current_weight: latest.as_ref().map(|e| unit.from_kg(e.value)),
            streak_current: streak.current,
            streak_best: streak.best,
            change_7d: trend.change_7d.map(|d| unit.from_kg(d)),
            change_30d: trend.change_30d.map(|d| unit.from_kg(d)),
            trend: trend.direction(),
            goal: goal_progress.as_ref().map(|(goal, progress)| ExportGoal {
                start_weight: unit.from_kg(goal.start_weight),
                target_weight: unit.from_kg(goal.target_weight),
                fraction: progress.fraction,
                remaining: unit.from_kg(progress.remaining),
                target_date: goal.target_date.map(|d| d.to_string()),
                completed: goal.is_completed(),
            }),
            achievements: achievements.iter().map(|a| a.kind.title().to_string()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("# libra — Summary");
    println!("# {}", today);
    println!();
    if let Some(entry) = &latest {
        println!("Current:  {}  ({})", format_weight(entry.value, unit), entry.recorded_on);
    }
    println!("Streak:   {} days (best: {})", streak.current, streak.best);
    if let Some(d) = trend.change_7d {
        println!("7 days:   {}", format_delta(d, unit));
    }
    if let Some(d) = trend.change_30d {
        println!("30 days:  {}", format_delta(d, unit));
    }
    if let Some((goal, progress)) = &goal_progress {
        println!();
        println!("## Goal");
        println!(
            "  {} → {}  [{}] {}%",
            format_weight(goal.start_weight, unit),
            format_weight(goal.target_weight, unit),
            progress_bar(progress.fraction, 10),
            progress.percent()
        );
    }
    if !achievements.is_empty() {
        println!();
        println!("## Achievements");
        for a in &achievements {
            println!("  ◆ {}  ({})", a.kind.title(), a.unlocked_at);
        }
    }
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').to_string())
}

fn parse_user_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow!("'{}' is not a valid date (expected YYYY-MM-DD)", s))
}
