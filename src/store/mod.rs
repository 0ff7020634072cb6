//! Flat-file persistence boundary.
//!
//! Loads picks and draw-record files, normalizes loosely-typed source
//! fields into the strict data model in one adapter step, and writes
//! reports atomically (temp + rename) so a concurrent reader never sees
//! a partially written file.
//!
//! All loaders distinguish "absent" (`Ok(None)` — a normal short-circuit)
//! from "unreadable/corrupt" (`Err` — fatal).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::engine::report::EvaluationReport;
use crate::types::{DrawRecord, Game, PickLine, PickSet};

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

pub fn picks_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("daily_picks_{date}.json"))
}

pub fn draws_path(dir: &Path, game: Game) -> PathBuf {
    dir.join(format!("{game}_draws.json"))
}

pub fn report_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("report_{date}.json"))
}

// ---------------------------------------------------------------------------
// Input adapters
// ---------------------------------------------------------------------------

/// A pick line as it appears on disk. Source payloads have drifted across
/// field names over time; the aliases here are the single normalization
/// point — nothing downstream ever looks at alternate names.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPickLine {
    pub game: Game,
    #[serde(default, alias = "white_balls", alias = "numbers")]
    pub white_numbers: Vec<u8>,
    #[serde(
        default,
        alias = "bonus_ball",
        alias = "powerball",
        alias = "mega_ball",
        alias = "bonus"
    )]
    pub bonus_number: Option<u8>,
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

fn default_strategy() -> String {
    "baseline_random".to_string()
}

impl RawPickLine {
    /// Normalize to the strict model. A missing bonus becomes 0, which the
    /// aggregator's validity check rejects as "missing bonus".
    pub fn normalize(self) -> PickLine {
        PickLine {
            game: self.game,
            white_numbers: self.white_numbers,
            bonus_number: self.bonus_number.unwrap_or(0),
            strategy: self.strategy,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPicksFile {
    run_date: NaiveDate,
    lines: Vec<RawPickLine>,
}

/// A draw record as it appears in the canonical per-game files. The
/// `draw_date` may be a plain date or an ISO datetime string; only the
/// date portion is used.
#[derive(Debug, Clone, Deserialize)]
struct RawDrawRecord {
    draw_date: String,
    #[serde(default)]
    white_numbers: Vec<u8>,
    #[serde(default, alias = "bonus_ball", alias = "mega_ball")]
    bonus_number: Option<u8>,
}

/// Extract the calendar date from a date or datetime string
/// ("2006-10-17" or "2025-12-24T00:00:00.000").
pub fn parse_draw_date(value: &str) -> Option<NaiveDate> {
    let head = value.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Picks
// ---------------------------------------------------------------------------

/// Load the picks file for a date. `Ok(None)` means no picks were
/// generated for that date (terminate, no report).
pub fn load_picks(dir: &Path, date: NaiveDate) -> Result<Option<Vec<PickLine>>> {
    let path = picks_path(dir, date);
    if !path.exists() {
        info!(path = %path.display(), "No picks file for this date");
        return Ok(None);
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read picks file {}", path.display()))?;
    let raw: RawPicksFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse picks file {}", path.display()))?;

    if raw.run_date != date {
        warn!(
            expected = %date,
            found = %raw.run_date,
            "Picks file run_date does not match its filename date"
        );
    }

    let lines: Vec<PickLine> = raw.lines.into_iter().map(RawPickLine::normalize).collect();
    debug!(path = %path.display(), count = lines.len(), "Picks loaded");
    Ok(Some(lines))
}

/// Write a generated pick set to its dated file.
pub fn write_picks(dir: &Path, picks: &PickSet) -> Result<PathBuf> {
    let path = picks_path(dir, picks.run_date);
    write_json_atomic(&path, picks)?;
    info!(path = %path.display(), lines = picks.lines.len(), "Picks written");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Draw records
// ---------------------------------------------------------------------------

/// Load the full canonical draw file for a game. `Ok(None)` if the file
/// has not been ingested yet. Rows with unparseable dates or missing
/// fields are skipped with a warning.
pub fn load_draws(dir: &Path, game: Game) -> Result<Option<Vec<DrawRecord>>> {
    let path = draws_path(dir, game);
    if !path.exists() {
        info!(path = %path.display(), %game, "No draw file for this game");
        return Ok(None);
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read draw file {}", path.display()))?;
    let raw: Vec<RawDrawRecord> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse draw file {}", path.display()))?;

    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    for row in raw {
        let Some(draw_date) = parse_draw_date(&row.draw_date) else {
            warn!(%game, draw_date = %row.draw_date, "Unparseable draw date — skipping row");
            skipped += 1;
            continue;
        };
        let Some(bonus_number) = row.bonus_number else {
            warn!(%game, %draw_date, "Draw row missing bonus number — skipping row");
            skipped += 1;
            continue;
        };
        if row.white_numbers.len() != game.rules().white_count {
            warn!(
                %game,
                %draw_date,
                found = row.white_numbers.len(),
                "Draw row with wrong white-number cardinality — skipping row"
            );
            skipped += 1;
            continue;
        }
        records.push(DrawRecord {
            game,
            draw_date,
            white_numbers: row.white_numbers,
            bonus_number,
        });
    }

    debug!(path = %path.display(), count = records.len(), skipped, "Draw records loaded");
    Ok(Some(records))
}

/// Write a game's canonical draw file.
pub fn write_draws(dir: &Path, game: Game, records: &[DrawRecord]) -> Result<PathBuf> {
    let path = draws_path(dir, game);
    write_json_atomic(&path, records)?;
    info!(path = %path.display(), %game, count = records.len(), "Draw records written");
    Ok(path)
}

/// Find the draw for an exact calendar date within a game's records.
///
/// More than one record for the same (game, date) is a data-integrity
/// violation from upstream — surfaced loudly, first record wins.
pub fn draw_for_date(records: &[DrawRecord], game: Game, date: NaiveDate) -> Option<DrawRecord> {
    let mut matches = records.iter().filter(|r| r.draw_date == date);
    let first = matches.next()?.clone();
    let extra = matches.count();
    if extra > 0 {
        error!(
            %game,
            %date,
            duplicates = extra,
            "Duplicate draw records for the same game and date — upstream defect, using first"
        );
    }
    Some(first)
}

/// Build the per-game draw lookup for a target date from whatever canonical
/// files exist. Missing files or missing dates simply leave that game out.
pub fn draws_for_date(dir: &Path, date: NaiveDate) -> Result<BTreeMap<Game, DrawRecord>> {
    let mut out = BTreeMap::new();
    for &game in Game::ALL {
        if let Some(records) = load_draws(dir, game)? {
            if let Some(draw) = draw_for_date(&records, game, date) {
                out.insert(game, draw);
            } else {
                info!(%game, %date, "No draw record for this date");
            }
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Write an evaluation report for its date, deterministically overwriting
/// any prior report (idempotent regeneration).
pub fn write_report(dir: &Path, report: &EvaluationReport) -> Result<PathBuf> {
    let path = report_path(dir, report.evaluated_date);
    write_json_atomic(&path, report)?;
    info!(path = %path.display(), outcome = %report.outcome, "Report written");
    Ok(path)
}

/// Load the report for a date. `Ok(None)` means no evaluation is
/// available — consumers treat that as a normal condition.
pub fn load_report(dir: &Path, date: NaiveDate) -> Result<Option<EvaluationReport>> {
    let path = report_path(dir, date);
    if !path.exists() {
        debug!(path = %path.display(), "No report for this date");
        return Ok(None);
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    let report: EvaluationReport = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse report {}", path.display()))?;
    Ok(Some(report))
}

// ---------------------------------------------------------------------------
// Atomic JSON write
// ---------------------------------------------------------------------------

/// Serialize pretty JSON to a temp file in the target directory, then
/// rename over the destination. Rename within one directory is atomic on
/// the platforms we care about.
fn write_json_atomic<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let json = serde_json::to_string_pretty(value).context("Failed to serialise JSON")?;

    let tmp = dir.join(format!(
        ".{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "drawlab".to_string())
    ));
    fs::write(&tmp, &json)
        .with_context(|| format!("Failed to write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move temp file into place at {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::report;
    use chrono::Utc;

    fn temp_dir() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("drawlab_store_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&p).unwrap();
        p
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_load_picks_absent() {
        let dir = temp_dir();
        let loaded = load_picks(&dir, date()).unwrap();
        assert!(loaded.is_none());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_picks_corrupt_is_fatal() {
        let dir = temp_dir();
        fs::write(picks_path(&dir, date()), "{not json").unwrap();
        assert!(load_picks(&dir, date()).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_picks_field_name_aliases() {
        let dir = temp_dir();
        // Older generator variants used white_balls / bonus_ball
        let json = r#"{
            "run_date": "2026-03-02",
            "lines": [
                {"game": "powerball", "white_balls": [1,2,3,4,5], "bonus_ball": 10},
                {"game": "megamillions", "white_numbers": [6,7,8,9,10], "mega_ball": 11},
                {"game": "powerball", "numbers": [11,12,13,14,15]}
            ]
        }"#;
        fs::write(picks_path(&dir, date()), json).unwrap();

        let lines = load_picks(&dir, date()).unwrap().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].white_numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(lines[0].bonus_number, 10);
        assert_eq!(lines[0].strategy, "baseline_random");
        assert_eq!(lines[1].bonus_number, 11);
        // Missing bonus normalizes to 0 (rejected later by validation)
        assert_eq!(lines[2].bonus_number, 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_and_load_picks_round_trip() {
        let dir = temp_dir();
        let picks = PickSet {
            run_date: date(),
            generated_at: Utc::now(),
            lines: vec![PickLine {
                game: Game::Powerball,
                white_numbers: vec![3, 14, 15, 42, 69],
                bonus_number: 7,
                strategy: "baseline_random".to_string(),
            }],
        };
        write_picks(&dir, &picks).unwrap();

        let lines = load_picks(&dir, date()).unwrap().unwrap();
        assert_eq!(lines, picks.lines);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_parse_draw_date_variants() {
        assert_eq!(
            parse_draw_date("2025-12-24T00:00:00.000"),
            NaiveDate::from_ymd_opt(2025, 12, 24)
        );
        assert_eq!(
            parse_draw_date("2006-10-17"),
            NaiveDate::from_ymd_opt(2006, 10, 17)
        );
        assert_eq!(parse_draw_date("not a date"), None);
        assert_eq!(parse_draw_date(""), None);
    }

    #[test]
    fn test_load_draws_skips_malformed_rows() {
        let dir = temp_dir();
        let json = r#"[
            {"draw_date": "2026-03-02", "white_numbers": [1,2,3,4,5], "bonus_ball": 10},
            {"draw_date": "garbage", "white_numbers": [1,2,3,4,5], "bonus_ball": 10},
            {"draw_date": "2026-03-01", "white_numbers": [1,2,3], "bonus_ball": 10},
            {"draw_date": "2026-02-28", "white_numbers": [1,2,3,4,5]}
        ]"#;
        fs::write(draws_path(&dir, Game::Powerball), json).unwrap();

        let records = load_draws(&dir, Game::Powerball).unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].draw_date, date());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_draw_for_date_duplicate_uses_first() {
        let a = DrawRecord {
            game: Game::Powerball,
            draw_date: date(),
            white_numbers: vec![1, 2, 3, 4, 5],
            bonus_number: 10,
        };
        let mut b = a.clone();
        b.bonus_number = 11;

        let found = draw_for_date(&[a.clone(), b], Game::Powerball, date()).unwrap();
        assert_eq!(found, a);
    }

    #[test]
    fn test_draws_for_date_partial_data() {
        let dir = temp_dir();
        let json = r#"[{"draw_date": "2026-03-02", "white_numbers": [1,2,3,4,5], "bonus_ball": 10}]"#;
        fs::write(draws_path(&dir, Game::Powerball), json).unwrap();
        // No megamillions file at all

        let draws = draws_for_date(&dir, date()).unwrap();
        assert_eq!(draws.len(), 1);
        assert!(draws.contains_key(&Game::Powerball));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_report_write_overwrites_deterministically() {
        let dir = temp_dir();
        let first = report::build_empty(date(), "No draw record found yet.");
        write_report(&dir, &first).unwrap();

        let second = report::build_empty(date(), "No draw record found yet.");
        write_report(&dir, &second).unwrap();

        let loaded = load_report(&dir, date()).unwrap().unwrap();
        assert_eq!(loaded, second);
        // No stray temp files left behind
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_report_absent() {
        let dir = temp_dir();
        assert!(load_report(&dir, date()).unwrap().is_none());
        fs::remove_dir_all(&dir).unwrap();
    }
}
