//! Mega Millions draw feed (NY Open Data).
//!
//! Feed URL: https://data.ny.gov/resource/5xaw-6ayf.json
//! Unlike the Powerball feed, `winning_numbers` holds only the five white
//! balls; the Mega Ball arrives in its own `mega_ball` field, and
//! `draw_date` is usually a plain date string.

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
struct MegaMillionsRow {
    draw_date: String,
    winning_numbers: String,
    #[serde(default)]
    mega_ball: Option<String>,
}

pub struct MegaMillionsFeed {
    client: Client,
    url: String,
    fetch_limit: u32,
}

impl MegaMillionsFeed {
    pub fn new(url: String, fetch_limit: u32) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for Mega Millions feed")?;
        Ok(Self {
            client,
            url,
            fetch_limit,
        })
    }

    fn normalize(&self, row: MegaMillionsRow) -> Option<DrawRecord> {
        let draw_date = match parse_draw_date(&row.draw_date) {
            Some(d) => d,
            None => {
                warn!(draw_date = %row.draw_date, "Unparseable Mega Millions draw date — skipping row");
                return None;
            }
        };

        let whites = match parse_number_string(&row.winning_numbers) {
            Ok(n) => n,
            Err(e) => {
                warn!(%draw_date, error = %e, "Bad Mega Millions winning_numbers — skipping row");
                return None;
            }
        };
        if whites.len() != 5 {
            warn!(%draw_date, found = whites.len(), "Expected 5 white balls — skipping row");
            return None;
        }

        let bonus_number = match row.mega_ball.as_deref().map(str::trim).map(str::parse::<u8>) {
            Some(Ok(n)) => n,
            _ => {
                warn!(%draw_date, "Missing or non-numeric mega_ball — skipping row");
                return None;
            }
        };

        Some(DrawRecord {
            game: Game::MegaMillions,
            draw_date,
            white_numbers: whites,
            bonus_number,
        })
    }
}

#[async_trait]
impl DrawFeed for MegaMillionsFeed {
    fn game(&self) -> Game {
        Game::MegaMillions
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
            .context("Mega Millions feed request failed")?
            .error_for_status()
            .context("Mega Millions feed returned an error status")?;

        let rows: Vec<MegaMillionsRow> = response
            .json()
            .await
            .context("Failed to parse Mega Millions feed JSON")?;

        let total = rows.len();
        let records: Vec<DrawRecord> = rows
            .into_iter()
            .filter_map(|row| self.normalize(row))
            .collect();

        debug!(
            fetched = total,
            normalized = records.len(),
            skipped = total - records.len(),
            "Mega Millions rows normalized"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_feed() -> MegaMillionsFeed {
        MegaMillionsFeed::new("https://example.invalid/mm.json".to_string(), 10).unwrap()
    }

    #[test]
    fn test_normalize_plain_date_row() {
        let feed = make_feed();
        let row = MegaMillionsRow {
            draw_date: "2006-10-17".to_string(),
            winning_numbers: "07 21 33 48 70".to_string(),
            mega_ball: Some("12".to_string()),
        };
        let record = feed.normalize(row).unwrap();
        assert_eq!(
            record.draw_date,
            chrono::NaiveDate::from_ymd_opt(2006, 10, 17).unwrap()
        );
        assert_eq!(record.white_numbers, vec![7, 21, 33, 48, 70]);
        assert_eq!(record.bonus_number, 12);
    }

    #[test]
    fn test_normalize_rejects_missing_mega_ball() {
        let feed = make_feed();
        let row = MegaMillionsRow {
            draw_date: "2006-10-17".to_string(),
            winning_numbers: "07 21 33 48 70".to_string(),
            mega_ball: None,
        };
        assert!(feed.normalize(row).is_none());
    }

    #[test]
    fn test_normalize_rejects_six_whites() {
        let feed = make_feed();
        let row = MegaMillionsRow {
            draw_date: "2006-10-17".to_string(),
            winning_numbers: "07 21 33 48 70 12".to_string(),
            mega_ball: Some("12".to_string()),
        };
        assert!(feed.normalize(row).is_none());
    }
}
