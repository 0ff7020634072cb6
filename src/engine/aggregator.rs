//! Aggregator — single-pass scoring of a day's pick lines.
//!
//! Walks the lines in input order, skipping lines whose game has no draw
//! for the target date (normal on off-days) and lines that fail basic
//! validity, and maintains running totals plus the best line.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::engine::scoring;
use crate::types::{DrawRecord, Game, PickLine, ReportTotals, ScoredLine, WinningNumbers};

/// Why a line was dropped before scoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedLine {
    #[error("expected {expected} white numbers, found {found}")]
    WrongWhiteCardinality { expected: usize, found: usize },
    #[error("missing bonus number")]
    MissingBonus,
    #[error("bonus number {found} outside valid range {min}-{max}")]
    BonusOutOfRange { found: u8, min: u8, max: u8 },
}

/// Check a line's basic validity against its game's rules.
///
/// A zero bonus means the field was absent in the source payload — the
/// input adapter maps "no bonus field" to 0, which is below every game's
/// minimum.
pub fn validate_line(line: &PickLine) -> Result<(), MalformedLine> {
    let rules = line.game.rules();
    if line.white_numbers.len() != rules.white_count {
        return Err(MalformedLine::WrongWhiteCardinality {
            expected: rules.white_count,
            found: line.white_numbers.len(),
        });
    }
    if line.bonus_number == 0 {
        return Err(MalformedLine::MissingBonus);
    }
    if line.bonus_number < rules.bonus_min || line.bonus_number > rules.bonus_max {
        return Err(MalformedLine::BonusOutOfRange {
            found: line.bonus_number,
            min: rules.bonus_min,
            max: rules.bonus_max,
        });
    }
    Ok(())
}

/// Result of aggregating one day's lines.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub evaluated_date: NaiveDate,
    /// Winning numbers actually used, per game that had a draw.
    pub winning: BTreeMap<Game, WinningNumbers>,
    /// All scored lines, in original input order.
    pub scored: Vec<ScoredLine>,
    pub totals: ReportTotals,
    /// Best line by prize rank; first-encountered wins ties.
    pub best: Option<ScoredLine>,
}

impl Aggregation {
    /// Whether any game actually had a resolvable draw.
    pub fn any_draws(&self) -> bool {
        !self.winning.is_empty()
    }
}

/// Score all lines for a target date against the available draws.
///
/// `draws` holds at most one record per game; games without a draw for the
/// date simply have their lines counted as "not evaluated", never as
/// losses. An empty line set yields zero totals and no best line.
pub fn evaluate(
    date: NaiveDate,
    lines: &[PickLine],
    draws: &BTreeMap<Game, DrawRecord>,
) -> Aggregation {
    let winning: BTreeMap<Game, WinningNumbers> = draws
        .iter()
        .map(|(game, draw)| (*game, WinningNumbers::from(draw)))
        .collect();

    let mut totals = ReportTotals::default();
    let mut scored: Vec<ScoredLine> = Vec::new();
    let mut best: Option<ScoredLine> = None;

    for (idx, line) in lines.iter().enumerate() {
        totals.lines_considered += 1;

        let Some(draw) = draws.get(&line.game) else {
            debug!(line = idx + 1, game = %line.game, "No draw for this game on the target date — skipping");
            totals.lines_skipped_no_draw += 1;
            continue;
        };

        if let Err(reason) = validate_line(line) {
            warn!(line = idx + 1, game = %line.game, %reason, "Malformed pick line — skipping");
            totals.lines_skipped_malformed += 1;
            continue;
        }

        let row = scoring::score_line(line, draw);

        totals.lines_scored += 1;
        match line.game {
            Game::Powerball => totals.lines_scored_powerball += 1,
            Game::MegaMillions => totals.lines_scored_megamillions += 1,
        }
        if row.prize.is_winning() {
            totals.winning_lines += 1;
        }
        if row.prize == crate::types::Prize::Jackpot {
            totals.jackpot_hits += 1;
            info!(line = idx + 1, game = %line.game, "JACKPOT hit");
        }
        totals.estimated_winnings += row.prize.additive_amount();

        // Strictly-greater keeps the first-encountered line on ties, so
        // re-runs over the same input reproduce the same best line.
        if best.as_ref().map_or(true, |b| row.prize > b.prize) {
            best = Some(row.clone());
        }

        scored.push(row);
    }

    info!(
        date = %date,
        considered = totals.lines_considered,
        scored = totals.lines_scored,
        skipped_no_draw = totals.lines_skipped_no_draw,
        skipped_malformed = totals.lines_skipped_malformed,
        winning = totals.winning_lines,
        jackpots = totals.jackpot_hits,
        winnings = totals.estimated_winnings,
        "Aggregation complete"
    );

    Aggregation {
        evaluated_date: date,
        winning,
        scored,
        totals,
        best,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
