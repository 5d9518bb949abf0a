use anyhow::{anyhow, Result};
use chrono::{Days, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::str::FromStr;

use crate::core;
use crate::models::{Achievement, AchievementKind, Goal, Progress, Streak, Trend, TrendPoint, WeightEntry};

const DATE_FMT: &str = "%Y-%m-%d";

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

fn fmt_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

// ─── Entries ─────────────────────────────────────────────────────────────────

pub struct EntryRepo;

impl EntryRepo {
    pub fn add(conn: &Connection, recorded_on: NaiveDate, value: f64, note: Option<&str>) -> Result<i64> {
        conn.execute(
            "INSERT INTO entries (recorded_on, value, note) VALUES (?1, ?2, ?3)",
            params![fmt_date(recorded_on), value, note],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("logged entry #{} {:.1} kg on {}", id, value, recorded_on);
        Ok(id)
    }

    pub fn get_recent(conn: &Connection, limit: u32) -> Result<Vec<WeightEntry>> {
        let mut stmt = conn.prepare(
            "SELECT id, recorded_on, value, note, created_at
             FROM entries ORDER BY recorded_on DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, recorded_on, value, note, created_at) = r?;
            result.push(WeightEntry {
                id,
                recorded_on: parse_date(&recorded_on)?,
                value,
                note,
                created_at,
            });
        }
        Ok(result)
    }

    /// The most recent entry by effective date (ties broken by insertion order).
    pub fn latest(conn: &Connection) -> Result<Option<WeightEntry>> {
        Ok(Self::get_recent(conn, 1)?.into_iter().next())
    }

    /// Unique calendar days with at least one entry. Input to the streak
    /// calculator; duplicates are already collapsed by the query.
    pub fn distinct_dates(conn: &Connection) -> Result<Vec<NaiveDate>> {
        let mut stmt = conn.prepare("SELECT DISTINCT recorded_on FROM entries")?;
        let rows: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.iter().map(|s| parse_date(s)).collect()
    }

    pub fn count(conn: &Connection) -> Result<u64> {
        conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
            .map_err(anyhow::Error::from)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let n = conn.execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    /// One point per day (the day's last reading) since `since`, ascending.
    /// Feeds the chart widget and the export summary.
    pub fn daily_series(conn: &Connection, since: NaiveDate) -> Result<Vec<TrendPoint>> {
        let mut stmt = conn.prepare(
            "SELECT recorded_on, value, MAX(id)
             FROM entries WHERE recorded_on >= ?1
             GROUP BY recorded_on ORDER BY recorded_on",
        )?;

        let rows = stmt.query_map(params![fmt_date(since)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (date, value) = r?;
            result.push(TrendPoint {
                date: parse_date(&date)?,
                value,
            });
        }
        Ok(result)
    }

    /// Last known weight on or before `date`, for change-over-period math.
    pub fn value_on_or_before(conn: &Connection, date: NaiveDate) -> Result<Option<f64>> {
        conn.query_row(
            "SELECT value FROM entries WHERE recorded_on <= ?1
             ORDER BY recorded_on DESC, id DESC LIMIT 1",
            params![fmt_date(date)],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }
}

// ─── Goal ────────────────────────────────────────────────────────────────────

pub struct GoalRepo;

impl GoalRepo {
    /// Replace the active goal. Only one goal exists at a time.
    pub fn set(
        conn: &Connection,
        start_weight: f64,
        target_weight: f64,
        start_date: NaiveDate,
        target_date: Option<NaiveDate>,
    ) -> Result<()> {
        conn.execute("DELETE FROM goals", [])?;
        conn.execute(
            "INSERT INTO goals (start_weight, target_weight, start_date, target_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                start_weight,
                target_weight,
                fmt_date(start_date),
                target_date.map(fmt_date),
            ],
        )?;
        Ok(())
    }

    pub fn get_active(conn: &Connection) -> Result<Option<Goal>> {
        let row = conn
            .query_row(
                "SELECT id, start_weight, target_weight, start_date, target_date, completed_at
                 FROM goals ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((id, start_weight, target_weight, start_date, target_date, completed_at)) => {
                Ok(Some(Goal {
                    id,
                    start_weight,
                    target_weight,
                    start_date: parse_date(&start_date)?,
                    target_date: target_date.as_deref().map(parse_date).transpose()?,
                    completed_at,
                }))
            }
        }
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM goals", [])?;
        Ok(())
    }

    /// Stamp the goal as reached. Idempotent — an already-completed goal
    /// keeps its original timestamp.
    pub fn mark_completed(conn: &Connection, id: i64) -> Result<()> {
        conn.execute(
            "UPDATE goals SET completed_at = datetime('now')
             WHERE id = ?1 AND completed_at IS NULL",
            params![id],
        )?;
        Ok(())
    }
}

// ─── Achievements ────────────────────────────────────────────────────────────

pub struct AchievementRepo;

impl AchievementRepo {
    pub fn unlocked(conn: &Connection) -> Result<Vec<Achievement>> {
        let mut stmt = conn.prepare(
            "SELECT kind, unlocked_at FROM achievements ORDER BY unlocked_at, kind",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (kind, unlocked_at) = r?;
            result.push(Achievement {
                kind: AchievementKind::from_str(&kind)
                    .map_err(|e| anyhow!("achievements table: {}", e))?,
                unlocked_at,
            });
        }
        Ok(result)
    }

    /// Recompute the achievement state from the current history and persist
    /// anything newly earned. Called after every mutation that can unlock a
    /// badge (logging, goal changes).
    pub fn refresh(conn: &Connection, today: NaiveDate) -> Result<Vec<AchievementKind>> {
        let streak = StatsRepo::streaks(conn, today)?;
        let count = EntryRepo::count(conn)?;
        let fraction = StatsRepo::goal_progress(conn)?.map(|(_, p)| p.fraction);
        let earned = core::achievements::earned(&streak, count, fraction);
        Self::sync(conn, &earned)
    }

    /// Persist every earned kind that is not already unlocked; returns the
    /// newly unlocked ones so the caller can announce them.
    pub fn sync(conn: &Connection, earned: &[AchievementKind]) -> Result<Vec<AchievementKind>> {
        let have: HashSet<AchievementKind> =
            Self::unlocked(conn)?.into_iter().map(|a| a.kind).collect();

        let mut fresh = Vec::new();
        for kind in earned {
            if have.contains(kind) {
                continue;
            }
            conn.execute(
                "INSERT OR IGNORE INTO achievements (kind, unlocked_at)
                 VALUES (?1, datetime('now'))",
                params![kind.as_str()],
            )?;
            log::debug!("achievement unlocked: {}", kind.as_str());
            fresh.push(*kind);
        }
        Ok(fresh)
    }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub struct StatsRepo;

impl StatsRepo {
    /// Streaks from the full entry history, max-merged with the persisted
    /// best-ever value (the calculator only sees the current table; entries
    /// deleted since a long run would otherwise shrink `best`).
    pub fn streaks(conn: &Connection, today: NaiveDate) -> Result<Streak> {
        let dates = EntryRepo::distinct_dates(conn)?;
        let mut streak = core::compute_streaks(dates, today);

        let persisted_best: u32 = MetaRepo::get(conn, "best_streak")?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        streak.best = streak.best.max(persisted_best);

        if streak.best > persisted_best {
            MetaRepo::set(conn, "best_streak", &streak.best.to_string())?;
        }
        Ok(streak)
    }

    /// Weight change over the trailing 7 and 30 days, anchored at the
    /// latest entry.
    pub fn trend(conn: &Connection, today: NaiveDate) -> Result<Trend> {
        let Some(latest) = EntryRepo::latest(conn)? else {
            return Ok(Trend::default());
        };

        let change = |days_back: u64| -> Result<Option<f64>> {
            let cutoff = today
                .checked_sub_days(Days::new(days_back))
                .unwrap_or(NaiveDate::MIN);
            Ok(EntryRepo::value_on_or_before(conn, cutoff)?.map(|then| latest.value - then))
        };

        Ok(Trend {
            change_7d: change(7)?,
            change_30d: change(30)?,
        })
    }

    /// Active goal with its progress against the latest weight. Falls back
    /// to the goal's start weight when no entries exist yet, so a fresh goal
    /// reads as 0% rather than erroring.
    pub fn goal_progress(conn: &Connection) -> Result<Option<(Goal, Progress)>> {
        let Some(goal) = GoalRepo::get_active(conn)? else {
            return Ok(None);
        };
        let current = EntryRepo::latest(conn)?
            .map(|e| e.value)
            .unwrap_or(goal.start_weight);
        let progress = core::compute_progress(&goal, current);
        Ok(Some((goal, progress)))
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn latest_prefers_effective_date_over_insertion_order() {
        let conn = test_conn();
        EntryRepo::add(&conn, date(2025, 6, 10), 81.0, None).unwrap();
        // Backdated entry inserted later must not become "latest".
        EntryRepo::add(&conn, date(2025, 6, 1), 83.0, Some("vacation")).unwrap();

        let latest = EntryRepo::latest(&conn).unwrap().unwrap();
        assert_eq!(latest.recorded_on, date(2025, 6, 10));
        assert_eq!(latest.value, 81.0);
    }

    #[test]
    fn distinct_dates_collapse_same_day_entries() {
        let conn = test_conn();
        EntryRepo::add(&conn, date(2025, 6, 10), 81.0, None).unwrap();
        EntryRepo::add(&conn, date(2025, 6, 10), 80.6, None).unwrap();
        EntryRepo::add(&conn, date(2025, 6, 11), 80.4, None).unwrap();

        let mut dates = EntryRepo::distinct_dates(&conn).unwrap();
        dates.sort();
        assert_eq!(dates, vec![date(2025, 6, 10), date(2025, 6, 11)]);
    }

    #[test]
    fn daily_series_uses_last_reading_per_day() {
        let conn = test_conn();
        EntryRepo::add(&conn, date(2025, 6, 10), 81.0, None).unwrap();
        EntryRepo::add(&conn, date(2025, 6, 10), 80.6, None).unwrap();

        let series = EntryRepo::daily_series(&conn, date(2025, 6, 1)).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, 80.6);
    }

    #[test]
    fn setting_a_goal_replaces_the_previous_one() {
        let conn = test_conn();
        GoalRepo::set(&conn, 85.0, 78.0, date(2025, 1, 1), None).unwrap();
        GoalRepo::set(&conn, 84.0, 75.0, date(2025, 3, 1), Some(date(2025, 9, 1))).unwrap();

        let goal = GoalRepo::get_active(&conn).unwrap().unwrap();
        assert_eq!(goal.target_weight, 75.0);
        assert_eq!(goal.target_date, Some(date(2025, 9, 1)));
        assert!(!goal.is_completed());
    }

    #[test]
    fn goal_progress_falls_back_to_start_weight() {
        let conn = test_conn();
        GoalRepo::set(&conn, 85.0, 78.0, date(2025, 1, 1), None).unwrap();

        let (_, progress) = StatsRepo::goal_progress(&conn).unwrap().unwrap();
        assert_eq!(progress.fraction, 0.0);
        assert_eq!(progress.remaining, 7.0);
    }

    #[test]
    fn streaks_merge_with_persisted_best() {
        let conn = test_conn();
        let today = date(2025, 6, 15);
        EntryRepo::add(&conn, today, 80.0, None).unwrap();

        // A longer run from entries since pruned.
        MetaRepo::set(&conn, "best_streak", "9").unwrap();

        let streak = StatsRepo::streaks(&conn, today).unwrap();
        assert_eq!(streak.current, 1);
        assert_eq!(streak.best, 9);
    }

    #[test]
    fn streaks_persist_a_new_best() {
        let conn = test_conn();
        let today = date(2025, 6, 15);
        EntryRepo::add(&conn, today, 80.0, None).unwrap();
        EntryRepo::add(&conn, date(2025, 6, 14), 80.2, None).unwrap();

        let streak = StatsRepo::streaks(&conn, today).unwrap();
        assert_eq!(streak.best, 2);
        assert_eq!(
            MetaRepo::get(&conn, "best_streak").unwrap().as_deref(),
            Some("2")
        );
    }

    #[test]
    fn achievement_sync_only_reports_new_unlocks() {
        let conn = test_conn();
        let earned = vec![AchievementKind::FirstEntry, AchievementKind::Streak3];

        let fresh = AchievementRepo::sync(&conn, &earned).unwrap();
        assert_eq!(fresh.len(), 2);

        let again = AchievementRepo::sync(&conn, &earned).unwrap();
        assert!(again.is_empty());
        assert_eq!(AchievementRepo::unlocked(&conn).unwrap().len(), 2);
    }

    #[test]
    fn trend_compares_against_week_old_reading() {
        let conn = test_conn();
        let today = date(2025, 6, 15);
        EntryRepo::add(&conn, date(2025, 6, 8), 82.0, None).unwrap();
        EntryRepo::add(&conn, today, 80.5, None).unwrap();

        let trend = StatsRepo::trend(&conn, today).unwrap();
        assert_eq!(trend.change_7d, Some(-1.5));
        assert_eq!(trend.direction(), "losing");
    }
}
