//! Report Builder — assembles the immutable evaluation report.
//!
//! The report is a pure function of the picks and draws for a date, apart
//! from the `generated_at` stamp, which is explicitly excluded from
//! equality so idempotent re-runs compare clean.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::aggregator::Aggregation;
use crate::types::{EvaluationOutcome, Game, ReportTotals, ScoredLine, WinningNumbers};

/// The final structured report for one evaluated date.
///
/// Field declaration order is the JSON key order (serde preserves it), so
/// written reports diff cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluated_date: NaiveDate,
    pub outcome: EvaluationOutcome,
    /// Human-readable status, set on minimal reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Wall-clock stamp; not part of report equality.
    pub generated_at: DateTime<Utc>,
    /// Winning numbers actually used, only for games that had a draw.
    pub winning: BTreeMap<Game, WinningNumbers>,
    /// All scored lines in original input order (never sorted by prize).
    pub lines: Vec<ScoredLine>,
    pub totals: ReportTotals,
    pub best: Option<ScoredLine>,
}

/// Equality over report content, ignoring `generated_at`.
impl PartialEq for EvaluationReport {
    fn eq(&self, other: &Self) -> bool {
        self.evaluated_date == other.evaluated_date
            && self.outcome == other.outcome
            && self.message == other.message
            && self.winning == other.winning
            && self.lines == other.lines
            && self.totals == other.totals
            && self.best == other.best
    }
}

impl EvaluationReport {
    /// One-line summary for logs and digests.
    pub fn summary(&self) -> String {
        match self.outcome {
            EvaluationOutcome::NothingToEvaluate => format!(
                "{}: {}",
                self.evaluated_date,
                self.message.as_deref().unwrap_or("nothing to evaluate"),
            ),
            EvaluationOutcome::Evaluated => format!(
                "{}: {} lines scored, {} winning, {} jackpot, est ${}",
                self.evaluated_date,
                self.totals.lines_scored,
                self.totals.winning_lines,
                self.totals.jackpot_hits,
                self.totals.estimated_winnings,
            ),
        }
    }
}

/// Build a full report from an aggregation pass.
pub fn build(agg: Aggregation) -> EvaluationReport {
    EvaluationReport {
        evaluated_date: agg.evaluated_date,
        outcome: EvaluationOutcome::Evaluated,
        message: None,
        generated_at: Utc::now(),
        winning: agg.winning,
        lines: agg.scored,
        totals: agg.totals,
        best: agg.best,
    }
}

/// Build the minimal "nothing to evaluate" report, emitted when no draw
/// record was resolvable for either game on the target date.
pub fn build_empty(date: NaiveDate, message: impl Into<String>) -> EvaluationReport {
    EvaluationReport {
        evaluated_date: date,
        outcome: EvaluationOutcome::NothingToEvaluate,
        message: Some(message.into()),
        generated_at: Utc::now(),
        winning: BTreeMap::new(),
        lines: Vec::new(),
        totals: ReportTotals::default(),
        best: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
