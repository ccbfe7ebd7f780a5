pub mod api;
pub mod config;
pub mod models;
pub mod utils;

pub use api::*;
pub use models::*;
pub use utils::*;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utils::data::{hydrate_games, load_snapshot, validate_snapshot};
use utils::filters::GameFilter;
use utils::offers::compute_offer_board;

/// Counts shown for one sport on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportSummary {
    pub game_type: GameType,
    pub best_count: usize,
    pub other_count: usize,
}

/// Load the snapshot file and join coefficients onto games.
/// Data problems are logged, not fixed.
pub fn load_games(snapshot_file: impl AsRef<Path>) -> Result<Vec<GameView>> {
    let path = snapshot_file.as_ref();
    let snapshot = load_snapshot(path)
        .with_context(|| format!("Failed to load games from {}", path.display()))?;

    for issue in validate_snapshot(&snapshot) {
        tracing::warn!("snapshot issue: {}", issue);
    }

    let games = hydrate_games(&snapshot);
    tracing::info!(
        games = games.len(),
        coefficients = snapshot.coefficients.len(),
        "loaded snapshot from {}",
        path.display()
    );

    Ok(games)
}

/// Filter the games and rank what is left
pub fn offer_board(games: &[GameView], filter: GameFilter) -> OfferBoard {
    let selected: Vec<GameView> = games.iter().filter(|g| filter.matches(g)).cloned().collect();
    compute_offer_board(&selected)
}

/// Board of unresolved games of one sport, as served to the sport pages
pub fn sport_offer_board(games: &[GameView], game_type: GameType) -> OfferBoard {
    offer_board(
        games,
        GameFilter::new()
            .where_unresolved()
            .where_game_type(game_type),
    )
}

pub fn sport_summaries(games: &[GameView]) -> Vec<SportSummary> {
    GameType::ALL
        .iter()
        .map(|&game_type| {
            let board = sport_offer_board(games, game_type);
            SportSummary {
                game_type,
                best_count: board.best_offers.len(),
                other_count: board.other_offers.len(),
            }
        })
        .collect()
}
