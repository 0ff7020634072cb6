//! Per-line scoring against an official draw.
//!
//! `match_counts` is a pure set-intersection; `prize_for` is a static
//! per-game tier lookup with an explicit "no tier → zero" total fallback.

use std::collections::BTreeSet;
use tracing::error;

use crate::types::{DrawRecord, Game, PickLine, Prize, ScoredLine};

// ---------------------------------------------------------------------------
// Prize tables (immutable static configuration)
// ---------------------------------------------------------------------------

/// Powerball prize tiers, keyed by (white matches, bonus match).
/// Combinations absent here pay nothing.
const POWERBALL_TIERS: &[(u8, bool, Prize)] = &[
    (5, true, Prize::Jackpot),
    (5, false, Prize::Fixed(1_000_000)),
    (4, true, Prize::Fixed(50_000)),
    (4, false, Prize::Fixed(100)),
    (3, true, Prize::Fixed(100)),
    (3, false, Prize::Fixed(7)),
    (2, true, Prize::Fixed(7)),
    (1, true, Prize::Fixed(4)),
    (0, true, Prize::Fixed(4)),
];

/// Mega Millions prize tiers. Same shape, different amounts.
const MEGAMILLIONS_TIERS: &[(u8, bool, Prize)] = &[
    (5, true, Prize::Jackpot),
    (5, false, Prize::Fixed(1_000_000)),
    (4, true, Prize::Fixed(10_000)),
    (4, false, Prize::Fixed(500)),
    (3, true, Prize::Fixed(200)),
    (3, false, Prize::Fixed(10)),
    (2, true, Prize::Fixed(10)),
    (1, true, Prize::Fixed(4)),
    (0, true, Prize::Fixed(2)),
];

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Count white-number matches (set semantics — duplicates collapse, order
/// irrelevant) and check bonus equality. Pure and deterministic.
pub fn match_counts(line: &PickLine, draw: &DrawRecord) -> (u8, bool) {
    let picked: BTreeSet<u8> = line.white_numbers.iter().copied().collect();
    let drawn: BTreeSet<u8> = draw.white_numbers.iter().copied().collect();
    let white_matches = picked.intersection(&drawn).count() as u8;
    let bonus_match = line.bonus_number == draw.bonus_number;
    (white_matches, bonus_match)
}

/// Look up the prize for a (white matches, bonus match) combination.
///
/// Total function: combinations not in the game's table pay `Fixed(0)`.
/// A white count above 5 is impossible with valid records and indicates an
/// upstream defect, so it is logged loudly before resolving to zero.
pub fn prize_for(game: Game, white_matches: u8, bonus_match: bool) -> Prize {
    if white_matches > 5 {
        error!(
            %game,
            white_matches,
            "Impossible white match count — upstream data defect"
        );
        return Prize::Fixed(0);
    }

    let tiers = match game {
        Game::Powerball => POWERBALL_TIERS,
        Game::MegaMillions => MEGAMILLIONS_TIERS,
    };

    tiers
        .iter()
        .find(|(w, b, _)| *w == white_matches && *b == bonus_match)
        .map(|(_, _, prize)| *prize)
        .unwrap_or(Prize::Fixed(0))
}

/// Score one line against the draw for its game and date.
pub fn score_line(line: &PickLine, draw: &DrawRecord) -> ScoredLine {
    let (white_match_count, bonus_match) = match_counts(line, draw);
    let prize = prize_for(line.game, white_match_count, bonus_match);
    ScoredLine {
        game: line.game,
        white_numbers: line.white_numbers.clone(),
        bonus_number: line.bonus_number,
        strategy: line.strategy.clone(),
        white_match_count,
        bonus_match,
        prize,
        prize_label: prize.label(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
