use crate::models::{GameType, OfferBoard};
use anyhow::{Context, Result};

/// Client for the offer board JSON endpoint of the web server
pub struct OfferApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl OfferApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn games_url(&self) -> String {
        format!("{}/api/games", self.base_url)
    }

    /// Fetch the ranked board of unresolved games for one sport
    pub async fn fetch_offer_board(&self, game_type: GameType) -> Result<OfferBoard> {
        let response = self
            .client
            .get(self.games_url())
            .query(&[("sportType", game_type.slug())])
            .send()
            .await
            .context("Failed to fetch offers")?;

        if !response.status().is_success() {
            anyhow::bail!("Offers API returned error: {}", response.status());
        }

        let board: OfferBoard = response
            .json()
            .await
            .context("Failed to parse offers response")?;

        tracing::debug!(
            sport = %game_type,
            best = board.best_offers.len(),
            other = board.other_offers.len(),
            "fetched offer board"
        );

        Ok(board)
    }
}
