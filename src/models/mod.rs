use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sport a game belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameType {
    Football,
    Basketball,
    Handball,
}

impl GameType {
    pub const ALL: [GameType; 3] = [GameType::Football, GameType::Basketball, GameType::Handball];

    /// Name used in URLs and on the command line ("football", ...)
    pub fn slug(&self) -> &'static str {
        match self {
            GameType::Football => "football",
            GameType::Basketball => "basketball",
            GameType::Handball => "handball",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameType::Football => "Football",
            GameType::Basketball => "Basketball",
            GameType::Handball => "Handball",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sport: {0}")]
pub struct ParseGameTypeError(pub String);

impl FromStr for GameType {
    type Err = ParseGameTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "football" => Ok(GameType::Football),
            "basketball" => Ok(GameType::Basketball),
            "handball" => Ok(GameType::Handball),
            _ => Err(ParseGameTypeError(s.to_string())),
        }
    }
}

/// Kind of wager offered on a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BetType {
    HomeWin,
    Draw,
    AwayWin,
    HomeWinOrDraw,
    AwayWinOrDraw,
    HomeOrAwayWin,
}

impl BetType {
    pub const ALL: [BetType; 6] = [
        BetType::HomeWin,
        BetType::Draw,
        BetType::AwayWin,
        BetType::HomeWinOrDraw,
        BetType::AwayWinOrDraw,
        BetType::HomeOrAwayWin,
    ];

    /// Short label printed on the offer board
    pub fn label(&self) -> &'static str {
        match self {
            BetType::HomeWin => "1",
            BetType::Draw => "X",
            BetType::AwayWin => "2",
            BetType::HomeWinOrDraw => "1X",
            BetType::AwayWinOrDraw => "X2",
            BetType::HomeOrAwayWin => "12",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scheduled game as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub game_type: GameType,
    pub first_team_name: String,
    pub second_team_name: String,
    pub first_team_score: Option<i32>,
    pub second_team_score: Option<i32>,
    pub date_time_starting: DateTime<Utc>,
    pub date_time_played: Option<DateTime<Utc>>, // None until the game is over
}

/// Payout multiplier for one bet type on one game, as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coefficient {
    pub id: i64,
    pub game_id: i64,
    pub bet_type: BetType,
    pub coefficient_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoefficientView {
    pub id: i64,
    pub game_id: i64,
    pub bet_type: BetType,
    pub coefficient_value: f64,
}

impl From<&Coefficient> for CoefficientView {
    fn from(coefficient: &Coefficient) -> Self {
        Self {
            id: coefficient.id,
            game_id: coefficient.game_id,
            bet_type: coefficient.bet_type,
            coefficient_value: coefficient.coefficient_value,
        }
    }
}

/// A game together with all of its coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: i64,
    pub game_type: GameType,
    pub first_team_name: String,
    pub second_team_name: String,
    pub first_team_score: Option<i32>,
    pub second_team_score: Option<i32>,
    pub date_time_starting: DateTime<Utc>,
    pub date_time_played: Option<DateTime<Utc>>,
    pub coefficients: Vec<CoefficientView>,
}

impl GameView {
    pub fn from_game(game: &Game, coefficients: Vec<CoefficientView>) -> Self {
        Self {
            id: game.id,
            game_type: game.game_type,
            first_team_name: game.first_team_name.clone(),
            second_team_name: game.second_team_name.clone(),
            first_team_score: game.first_team_score,
            second_team_score: game.second_team_score,
            date_time_starting: game.date_time_starting,
            date_time_played: game.date_time_played,
            coefficients,
        }
    }

    /// Coefficient offered for a bet type, if any
    pub fn coefficient_for(&self, bet_type: BetType) -> Option<&CoefficientView> {
        self.coefficients.iter().find(|c| c.bet_type == bet_type)
    }

    /// Coefficient of a bet type with two decimals, empty when not offered
    pub fn formatted_coefficient(&self, bet_type: BetType) -> String {
        self.coefficient_for(bet_type)
            .map(|c| format!("{:.2}", c.coefficient_value))
            .unwrap_or_default()
    }
}

/// Ranked offers for one request: the best game per sport and everything else
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferBoard {
    pub best_offers: Vec<GameView>,
    pub other_offers: Vec<GameView>,
}

impl OfferBoard {
    pub fn len(&self) -> usize {
        self.best_offers.len() + self.other_offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_offers.is_empty() && self.other_offers.is_empty()
    }
}

/// Flat games and coefficients tables, as kept in the snapshot file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub games: Vec<Game>,
    pub coefficients: Vec<Coefficient>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_game_type() {
        assert_eq!("football".parse::<GameType>(), Ok(GameType::Football));
        assert_eq!("Basketball".parse::<GameType>(), Ok(GameType::Basketball));
        assert_eq!(" HANDBALL ".parse::<GameType>(), Ok(GameType::Handball));
        assert!("curling".parse::<GameType>().is_err());
    }

    #[test]
    fn test_slug_round_trips_through_parse() {
        for game_type in GameType::ALL {
            assert_eq!(game_type.slug().parse::<GameType>(), Ok(game_type));
        }
    }

    #[test]
    fn test_bet_type_labels() {
        assert_eq!(BetType::HomeWin.to_string(), "1");
        assert_eq!(BetType::Draw.to_string(), "X");
        assert_eq!(BetType::AwayWinOrDraw.to_string(), "X2");
    }

    #[test]
    fn test_formatted_coefficient() {
        let game = GameView {
            id: 1,
            game_type: GameType::Football,
            first_team_name: "Slaven Belupo".to_string(),
            second_team_name: "Sibenik".to_string(),
            first_team_score: None,
            second_team_score: None,
            date_time_starting: Utc.with_ymd_and_hms(2024, 11, 9, 16, 0, 0).unwrap(),
            date_time_played: None,
            coefficients: vec![CoefficientView {
                id: 10,
                game_id: 1,
                bet_type: BetType::Draw,
                coefficient_value: 3.1,
            }],
        };
        assert_eq!(game.formatted_coefficient(BetType::Draw), "3.10");
        assert_eq!(game.formatted_coefficient(BetType::HomeWin), "");
    }

    #[test]
    fn test_offer_board_is_empty() {
        assert!(OfferBoard::default().is_empty());

        let board: OfferBoard = serde_json::from_str(
            r#"{"bestOffers":[],"otherOffers":[{"id":3,"gameType":"Handball",
            "firstTeamName":"Nexe","secondTeamName":"Porec","firstTeamScore":null,
            "secondTeamScore":null,"dateTimeStarting":"2024-10-21T18:00:00Z",
            "dateTimePlayed":null,"coefficients":[]}]}"#,
        )
        .unwrap();
        assert!(!board.is_empty());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_offer_board_serializes_camel_case() {
        let json = serde_json::to_value(OfferBoard::default()).unwrap();
        assert!(json.get("bestOffers").is_some());
        assert!(json.get("otherOffers").is_some());
    }
}
