use crate::models::{GameType, GameView, OfferBoard};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Product of all coefficient values of a game, 1.0 when it has none
pub fn attractiveness_score(game: &GameView) -> f64 {
    game.coefficients
        .iter()
        .map(|c| c.coefficient_value)
        .fold(1.0, |acc, value| acc * value)
}

/// Highest score first, lower id first on ties
fn by_score_descending(a: &(f64, &GameView), b: &(f64, &GameView)) -> Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id))
}

/// Soonest start first, lower id first on ties
fn by_start_time(a: &GameView, b: &GameView) -> Ordering {
    a.date_time_starting
        .cmp(&b.date_time_starting)
        .then_with(|| a.id.cmp(&b.id))
}

/// Rank games per sport and split them into the best offer of each sport and the rest
///
/// Every input game lands on exactly one of the two boards. Both boards are
/// ordered by start time.
pub fn compute_offer_board(games: &[GameView]) -> OfferBoard {
    let mut by_sport: BTreeMap<GameType, Vec<(f64, &GameView)>> = BTreeMap::new();
    for game in games {
        by_sport
            .entry(game.game_type)
            .or_default()
            .push((attractiveness_score(game), game));
    }

    let mut best_offers = Vec::with_capacity(by_sport.len());
    let mut other_offers = Vec::with_capacity(games.len().saturating_sub(by_sport.len()));

    for (game_type, mut ranked) in by_sport {
        ranked.sort_by(by_score_descending);

        let mut ranked = ranked.into_iter().map(|(_, game)| game.clone());
        if let Some(best) = ranked.next() {
            tracing::debug!(sport = %game_type, game_id = best.id, "best offer selected");
            best_offers.push(best);
        }
        other_offers.extend(ranked);
    }

    best_offers.sort_by(by_start_time);
    other_offers.sort_by(by_start_time);

    OfferBoard {
        best_offers,
        other_offers,
    }
}
