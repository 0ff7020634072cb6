//! Powerball draw feed (NY Open Data).
//!
//! Feed URL: https://data.ny.gov/resource/d6yy-54nr.json
//! Each row carries a `winning_numbers` string of six values — five white
//! balls followed by the Powerball — and an ISO datetime `draw_date`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{parse_number_string, DrawFeed};
use crate::store::parse_draw_date;
use crate::types::{DrawRecord, Game};

const USER_AGENT: &str = "drawlab/0.1";

#[derive(Debug, Deserialize)]
struct PowerballRow {
    draw_date: String,
    winning_numbers: String,
}

pub struct PowerballFeed {
    client: Client,
    url: String,
    fetch_limit: u32,
}

impl PowerballFeed {
    pub fn new(url: String, fetch_limit: u32) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for Powerball feed")?;
        Ok(Self {
            client,
            url,
            fetch_limit,
        })
    }

    fn normalize(&self, row: PowerballRow) -> Option<DrawRecord> {
        let draw_date = match parse_draw_date(&row.draw_date) {
            Some(d) => d,
            None => {
                warn!(draw_date = %row.draw_date, "Unparseable Powerball draw date — skipping row");
                return None;
            }
        };

        let numbers = match parse_number_string(&row.winning_numbers) {
            Ok(n) => n,
            Err(e) => {
                warn!(%draw_date, error = %e, "Bad Powerball winning_numbers — skipping row");
                return None;
            }
        };
        if numbers.len() != 6 {
            warn!(%draw_date, found = numbers.len(), "Expected 6 Powerball numbers — skipping row");
            return None;
        }

        Some(DrawRecord {
            game: Game::Powerball,
            draw_date,
            white_numbers: numbers[..5].to_vec(),
            bonus_number: numbers[5],
        })
    }
}

#[async_trait]
impl DrawFeed for PowerballFeed {
    fn game(&self) -> Game {
        Game::Powerball
    }

    async fn fetch_draws(&self) -> Result<Vec<DrawRecord>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("$limit", self.fetch_limit.to_string()),
                ("$order", "draw_date DESC".to_string()),
            ])
            .send()
            .await
            .context("Powerball feed request failed")?
            .error_for_status()
            .context("Powerball feed returned an error status")?;

        let rows: Vec<PowerballRow> = response
            .json()
            .await
            .context("Failed to parse Powerball feed JSON")?;

        let total = rows.len();
        let records: Vec<DrawRecord> = rows
            .into_iter()
            .filter_map(|row| self.normalize(row))
            .collect();

        debug!(
            fetched = total,
            normalized = records.len(),
            skipped = total - records.len(),
            "Powerball rows normalized"
        );

        Ok(records)
    }
}
