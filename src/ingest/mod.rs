//! Draw-record ingestion.
//!
//! Defines the `DrawFeed` trait and provides per-game implementations for
//! the NY Open Data (Socrata) result feeds. Fetched rows are normalized
//! into canonical `DrawRecord`s and merged into the per-game flat files.

pub mod megamillions;
pub mod powerball;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{error, info};

use crate::store;
use crate::types::{DrawRecord, Game};

/// Abstraction over upstream draw-result feeds.
#[async_trait]
pub trait DrawFeed: Send + Sync {
    /// The game this feed covers.
    fn game(&self) -> Game;

    /// Fetch recent draws, normalized and newest-first.
    async fn fetch_draws(&self) -> Result<Vec<DrawRecord>>;
}

/// Fetch a feed and rewrite the game's canonical draw file.
///
/// Duplicate (game, date) rows in the fetched payload are a
/// data-integrity defect in the source — surfaced loudly, first row wins.
pub async fn ingest_feed(feed: &dyn DrawFeed, raw_dir: &Path) -> Result<usize> {
    let game = feed.game();
    let fetched = feed.fetch_draws().await?;

    let mut seen: BTreeSet<chrono::NaiveDate> = BTreeSet::new();
    let mut records: Vec<DrawRecord> = Vec::with_capacity(fetched.len());
    for record in fetched {
        if !seen.insert(record.draw_date) {
            error!(
                %game,
                date = %record.draw_date,
                "Duplicate draw record in source payload — upstream defect, keeping first"
            );
            continue;
        }
        records.push(record);
    }

    store::write_draws(raw_dir, game, &records)?;

    if let (Some(newest), Some(oldest)) = (
        records.iter().map(|r| r.draw_date).max(),
        records.iter().map(|r| r.draw_date).min(),
    ) {
        info!(%game, count = records.len(), %oldest, %newest, "Ingest complete");
    } else {
        info!(%game, "Ingest fetched no records — check the source payload format");
    }

    Ok(records.len())
}

/// Parse a Socrata `winning_numbers` string ("01 02 03 04 05 06") into a
/// list of ball numbers.
pub(crate) fn parse_number_string(value: &str) -> Result<Vec<u8>> {
    value
        .split_whitespace()
        .map(|tok| {
            tok.parse::<u8>()
                .map_err(|_| anyhow::anyhow!("Non-numeric ball value: {tok}"))
        })
        .collect()
}
