use crate::models::{BetType, GameType, GameView};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BetSlipError {
    #[error("coefficient {coefficient_id} is not offered on game {game_id}")]
    UnknownCoefficient { coefficient_id: i64, game_id: i64 },
}

/// One picked coefficient on the slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetSelection {
    pub game_id: i64,
    pub game_type: GameType,
    pub first_team_name: String,
    pub second_team_name: String,
    pub coefficient_id: i64,
    pub bet_type: BetType,
    pub coefficient_value: f64,
    pub is_special_offer: bool, // picked from the best offers board
}

impl BetSelection {
    pub fn format(&self) -> String {
        format!(
            "{} - {} ({}) | {} @ {:.2}{}",
            self.first_team_name,
            self.second_team_name,
            self.game_type,
            self.bet_type,
            self.coefficient_value,
            if self.is_special_offer { " [best offer]" } else { "" }
        )
    }
}

/// Coefficients a user has picked, at most one per game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BetSlip {
    selections: Vec<BetSelection>,
}

impl BetSlip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a coefficient of a game. A game that is already on the slip gets its
    /// selection replaced in place.
    pub fn place_bet_on_coefficient(
        &mut self,
        game: &GameView,
        coefficient_id: i64,
        is_special_offer: bool,
    ) -> Result<&BetSelection, BetSlipError> {
        let coefficient = game
            .coefficients
            .iter()
            .find(|c| c.id == coefficient_id)
            .ok_or(BetSlipError::UnknownCoefficient {
                coefficient_id,
                game_id: game.id,
            })?;

        let selection = BetSelection {
            game_id: game.id,
            game_type: game.game_type,
            first_team_name: game.first_team_name.clone(),
            second_team_name: game.second_team_name.clone(),
            coefficient_id: coefficient.id,
            bet_type: coefficient.bet_type,
            coefficient_value: coefficient.coefficient_value,
            is_special_offer,
        };

        let index = match self.selections.iter().position(|s| s.game_id == game.id) {
            Some(index) => {
                self.selections[index] = selection;
                index
            }
            None => {
                self.selections.push(selection);
                self.selections.len() - 1
            }
        };

        Ok(&self.selections[index])
    }

    pub fn is_bet_already_placed(&self, coefficient_id: i64, game_id: i64) -> bool {
        self.selections
            .iter()
            .any(|s| s.game_id == game_id && s.coefficient_id == coefficient_id)
    }

    /// Returns the removed selection, if the game was on the slip
    pub fn remove_game(&mut self, game_id: i64) -> Option<BetSelection> {
        let index = self.selections.iter().position(|s| s.game_id == game_id)?;
        Some(self.selections.remove(index))
    }

    pub fn selections(&self) -> &[BetSelection] {
        &self.selections
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Product of all picked coefficients, 1.0 for an empty slip
    pub fn total_coefficient(&self) -> f64 {
        self.selections
            .iter()
            .fold(1.0, |acc, s| acc * s.coefficient_value)
    }
}
