//! Shared types for the drawlab pipeline.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that ingest, picks, engine,
//! and notify modules can depend on them without circular references.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// One of the two supported drawing games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Powerball,
    MegaMillions,
}

impl Game {
    /// Both games (useful for iteration).
    pub const ALL: &'static [Game] = &[Game::Powerball, Game::MegaMillions];

    /// The static drawing rules for this game.
    pub fn rules(&self) -> &'static GameRules {
        match self {
            Game::Powerball => &POWERBALL_RULES,
            Game::MegaMillions => &MEGAMILLIONS_RULES,
        }
    }

    /// Whether this game holds a drawing on the given weekday.
    ///
    /// Used only for status messages ("no draw expected today") — the
    /// evaluator always goes by the presence of an actual draw record.
    pub fn draws_on(&self, weekday: Weekday) -> bool {
        match self {
            Game::Powerball => matches!(weekday, Weekday::Mon | Weekday::Wed | Weekday::Sat),
            Game::MegaMillions => matches!(weekday, Weekday::Tue | Weekday::Fri),
        }
    }

    /// Short display tag for digest messages.
    pub fn tag(&self) -> &'static str {
        match self {
            Game::Powerball => "PB",
            Game::MegaMillions => "MM",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::Powerball => write!(f, "powerball"),
            Game::MegaMillions => write!(f, "megamillions"),
        }
    }
}

impl std::str::FromStr for Game {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "powerball" | "pb" => Ok(Game::Powerball),
            "megamillions" | "mega_millions" | "mm" => Ok(Game::MegaMillions),
            _ => Err(anyhow::anyhow!("Unknown game: {s}")),
        }
    }
}

/// Static drawing rules for one game.
#[derive(Debug, Clone)]
pub struct GameRules {
    pub white_min: u8,
    pub white_max: u8,
    pub white_count: usize,
    pub bonus_min: u8,
    pub bonus_max: u8,
    /// Display name of the bonus ball ("powerball" / "mega_ball").
    pub bonus_name: &'static str,
}

pub static POWERBALL_RULES: GameRules = GameRules {
    white_min: 1,
    white_max: 69,
    white_count: 5,
    bonus_min: 1,
    bonus_max: 26,
    bonus_name: "powerball",
};

pub static MEGAMILLIONS_RULES: GameRules = GameRules {
    white_min: 1,
    white_max: 70,
    white_count: 5,
    bonus_min: 1,
    bonus_max: 25,
    bonus_name: "mega_ball",
};

// ---------------------------------------------------------------------------
// Draw records & pick lines
// ---------------------------------------------------------------------------

/// One official draw result. Immutable once ingested; exactly one record
/// may exist per (game, draw_date) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub game: Game,
    pub draw_date: NaiveDate,
    /// 5 distinct white-ball numbers, stored sorted ascending.
    pub white_numbers: Vec<u8>,
    pub bonus_number: u8,
}

impl fmt::Display for DrawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} + {}",
            self.game,
            self.draw_date,
            join_numbers(&self.white_numbers),
            self.bonus_number,
        )
    }
}

/// One generated combination, tagged with its game and provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickLine {
    pub game: Game,
    pub white_numbers: Vec<u8>,
    pub bonus_number: u8,
    /// Free-form provenance tag (currently always "baseline_random").
    pub strategy: String,
}

impl fmt::Display for PickLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} + {}",
            self.game.tag(),
            join_numbers(&self.white_numbers),
            self.bonus_number,
        )
    }
}

fn join_numbers(nums: &[u8]) -> String {
    nums.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

// ---------------------------------------------------------------------------
// Prizes
// ---------------------------------------------------------------------------

/// A prize tier amount.
///
/// `Jackpot` is the unbounded sentinel: it ranks strictly above every fixed
/// dollar amount (the derived `Ord` gives later variants precedence) and
/// contributes nothing to additive winnings totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum Prize {
    Fixed(u64),
    Jackpot,
}

impl Prize {
    /// Whether this prize pays anything at all.
    pub fn is_winning(&self) -> bool {
        !matches!(self, Prize::Fixed(0))
    }

    /// Dollar amount for additive totals. Jackpot contributes zero — its
    /// true value is unbounded, so it is tracked via the jackpot-hit
    /// counter instead.
    pub fn additive_amount(&self) -> u64 {
        match self {
            Prize::Fixed(amount) => *amount,
            Prize::Jackpot => 0,
        }
    }

    /// Human-readable label ("$50,000", "JACKPOT").
    pub fn label(&self) -> String {
        match self {
            Prize::Jackpot => "JACKPOT".to_string(),
            Prize::Fixed(amount) => format!("${}", group_thousands(*amount)),
        }
    }
}

impl fmt::Display for Prize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Scored lines & reports
// ---------------------------------------------------------------------------

/// A pick line after scoring against the draw for its game and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredLine {
    pub game: Game,
    pub white_numbers: Vec<u8>,
    pub bonus_number: u8,
    pub strategy: String,
    /// Size of the intersection with the winning white numbers (0–5).
    pub white_match_count: u8,
    pub bonus_match: bool,
    pub prize: Prize,
    pub prize_label: String,
}

impl fmt::Display for ScoredLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} + {} | {}w{} | {}",
            self.game.tag(),
            join_numbers(&self.white_numbers),
            self.bonus_number,
            self.white_match_count,
            if self.bonus_match { "+b" } else { "" },
            self.prize_label,
        )
    }
}

/// The winning numbers a game's lines were scored against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningNumbers {
    pub white_numbers: Vec<u8>,
    pub bonus_number: u8,
}

impl From<&DrawRecord> for WinningNumbers {
    fn from(draw: &DrawRecord) -> Self {
        Self {
            white_numbers: draw.white_numbers.clone(),
            bonus_number: draw.bonus_number,
        }
    }
}

/// Aggregate counters for one evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    /// Lines present in the picks file for the date.
    pub lines_considered: u32,
    /// Lines actually scored against a draw.
    pub lines_scored: u32,
    pub lines_scored_powerball: u32,
    pub lines_scored_megamillions: u32,
    /// Lines whose game had no draw for the date (normal on off-days).
    pub lines_skipped_no_draw: u32,
    /// Lines dropped for failing basic validity.
    pub lines_skipped_malformed: u32,
    /// Lines with a nonzero prize.
    pub winning_lines: u32,
    pub jackpot_hits: u32,
    /// Summed fixed-dollar winnings; jackpot hits contribute zero here.
    pub estimated_winnings: u64,
}

/// Terminal outcome of an evaluation run. "Nothing to evaluate" and
/// "evaluated with zero wins" are distinct, both non-error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Evaluated,
    NothingToEvaluate,
}

impl fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationOutcome::Evaluated => write!(f, "evaluated"),
            EvaluationOutcome::NothingToEvaluate => write!(f, "nothing to evaluate"),
        }
    }
}

/// The daily picks payload as written by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickSet {
    pub run_date: NaiveDate,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub lines: Vec<PickLine>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_game_rules() {
        assert_eq!(Game::Powerball.rules().white_max, 69);
        assert_eq!(Game::Powerball.rules().bonus_max, 26);
        assert_eq!(Game::MegaMillions.rules().white_max, 70);
        assert_eq!(Game::MegaMillions.rules().bonus_max, 25);
        for game in Game::ALL {
            assert_eq!(game.rules().white_count, 5);
            assert_eq!(game.rules().white_min, 1);
        }
    }

    #[test]
    fn test_game_parse() {
        assert_eq!("powerball".parse::<Game>().unwrap(), Game::Powerball);
        assert_eq!("MegaMillions".parse::<Game>().unwrap(), Game::MegaMillions);
        assert!("euromillions".parse::<Game>().is_err());
    }

    #[test]
    fn test_game_serde_tags() {
        assert_eq!(
            serde_json::to_string(&Game::MegaMillions).unwrap(),
            "\"megamillions\""
        );
        let g: Game = serde_json::from_str("\"powerball\"").unwrap();
        assert_eq!(g, Game::Powerball);
    }

    #[test]
    fn test_draw_schedule() {
        assert!(Game::Powerball.draws_on(Weekday::Mon));
        assert!(Game::Powerball.draws_on(Weekday::Sat));
        assert!(!Game::Powerball.draws_on(Weekday::Tue));
        assert!(Game::MegaMillions.draws_on(Weekday::Fri));
        assert!(!Game::MegaMillions.draws_on(Weekday::Sun));
    }

    #[test]
    fn test_prize_ordering() {
        assert!(Prize::Jackpot > Prize::Fixed(1_000_000));
        assert!(Prize::Fixed(100) > Prize::Fixed(7));
        assert_eq!(Prize::Fixed(7), Prize::Fixed(7));
    }

    #[test]
    fn test_prize_additive_amount() {
        assert_eq!(Prize::Jackpot.additive_amount(), 0);
        assert_eq!(Prize::Fixed(50_000).additive_amount(), 50_000);
    }

    #[test]
    fn test_prize_labels() {
        assert_eq!(Prize::Jackpot.label(), "JACKPOT");
        assert_eq!(Prize::Fixed(0).label(), "$0");
        assert_eq!(Prize::Fixed(7).label(), "$7");
        assert_eq!(Prize::Fixed(50_000).label(), "$50,000");
        assert_eq!(Prize::Fixed(1_000_000).label(), "$1,000,000");
    }

    #[test]
    fn test_prize_is_winning() {
        assert!(!Prize::Fixed(0).is_winning());
        assert!(Prize::Fixed(4).is_winning());
        assert!(Prize::Jackpot.is_winning());
    }
}
