//! Notification adapters.
//!
//! Consume the day's picks and yesterday's report to build a compact
//! digest, then push it through a `Notifier`. A missing report is a
//! normal condition ("no evaluation available"), never a failure.

pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

use crate::engine::report::EvaluationReport;
use crate::types::{EvaluationOutcome, PickSet};

/// Abstraction over outbound notification channels.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a plain-text digest.
    async fn send(&self, body: &str) -> Result<()>;

    /// Channel name for logging.
    fn name(&self) -> &str;
}

/// Build the daily digest: today's lines, then yesterday's results.
///
/// Either input may be absent; the digest says so instead of failing.
pub fn build_digest(picks: Option<&PickSet>, report: Option<&EvaluationReport>) -> String {
    let mut out = String::new();

    match picks {
        Some(picks) if !picks.lines.is_empty() => {
            out.push_str(&format!("Picks for {}\n", picks.run_date));
            for line in &picks.lines {
                out.push_str(&format!("{line}\n"));
            }
        }
        _ => out.push_str("No picks generated today.\n"),
    }

    out.push('\n');

    match report {
        None => out.push_str("Yesterday: no evaluation available."),
        Some(report) => match report.outcome {
            EvaluationOutcome::NothingToEvaluate => {
                out.push_str(&format!("Yesterday: {}", report.summary()));
            }
            EvaluationOutcome::Evaluated => {
                out.push_str(&format!(
                    "Yesterday ({}): {} winning of {} scored, est ${}",
                    report.evaluated_date,
                    report.totals.winning_lines,
                    report.totals.lines_scored,
                    report.totals.estimated_winnings,
                ));
                if report.totals.jackpot_hits > 0 {
                    out.push_str(&format!(" — {} JACKPOT hit(s)!", report.totals.jackpot_hits));
                }
                if let Some(best) = &report.best {
                    out.push_str(&format!("\nBest line: {best}"));
                }
            }
        },
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{aggregator, report};
    use crate::types::{DrawRecord, Game, PickLine};
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeMap;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn make_picks() -> PickSet {
        PickSet {
            run_date: date(),
            generated_at: Utc::now(),
            lines: vec![PickLine {
                game: Game::Powerball,
                white_numbers: vec![3, 14, 15, 42, 69],
                bonus_number: 7,
                strategy: "baseline_random".to_string(),
            }],
        }
    }

    #[test]
    fn test_digest_tolerates_all_missing() {
        let digest = build_digest(None, None);
        assert!(digest.contains("No picks generated today."));
        assert!(digest.contains("no evaluation available"));
    }

    #[test]
    fn test_digest_with_picks_and_report() {
        let lines = vec![PickLine {
            game: Game::Powerball,
            white_numbers: vec![1, 2, 3, 4, 5],
            bonus_number: 10,
            strategy: "baseline_random".to_string(),
        }];
        let mut draws = BTreeMap::new();
        draws.insert(
            Game::Powerball,
            DrawRecord {
                game: Game::Powerball,
                draw_date: date(),
                white_numbers: vec![1, 2, 3, 4, 5],
                bonus_number: 10,
            },
        );
        let rep = report::build(aggregator::evaluate(date(), &lines, &draws));

        let digest = build_digest(Some(&make_picks()), Some(&rep));
        assert!(digest.contains("PB 3-14-15-42-69 + 7"));
        assert!(digest.contains("1 winning of 1 scored"));
        assert!(digest.contains("JACKPOT hit(s)!"));
        assert!(digest.contains("Best line:"));
    }

    #[test]
    fn test_digest_minimal_report() {
        let rep = report::build_empty(date(), "No draw record found yet for 2026-03-02.");
        let digest = build_digest(Some(&make_picks()), Some(&rep));
        assert!(digest.contains("No draw record found yet"));
        assert!(!digest.contains("Best line"));
    }
}
