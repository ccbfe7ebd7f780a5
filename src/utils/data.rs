use crate::models::{BetType, CoefficientView, GameView, OfferBoard, Snapshot};
use crate::utils::offers::attractiveness_score;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Save a games/coefficients snapshot to a JSON file
pub fn save_snapshot(snapshot: &Snapshot, snapshot_file: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    std::fs::write(snapshot_file.as_ref(), json).context("Failed to write snapshot file")?;
    Ok(())
}

/// Load a games/coefficients snapshot from a JSON file
pub fn load_snapshot(snapshot_file: impl AsRef<Path>) -> Result<Snapshot> {
    let path = snapshot_file.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&json).context("Failed to deserialize snapshot")?;
    Ok(snapshot)
}

/// Join coefficients onto their games.
///
/// Each game keeps its coefficients in snapshot order. Coefficients whose game
/// is not in the snapshot are dropped.
pub fn hydrate_games(snapshot: &Snapshot) -> Vec<GameView> {
    let known: HashSet<i64> = snapshot.games.iter().map(|g| g.id).collect();

    let mut by_game: HashMap<i64, Vec<CoefficientView>> = HashMap::new();
    for coefficient in &snapshot.coefficients {
        if !known.contains(&coefficient.game_id) {
            tracing::warn!(
                coefficient_id = coefficient.id,
                game_id = coefficient.game_id,
                "dropping coefficient for unknown game"
            );
            continue;
        }
        by_game
            .entry(coefficient.game_id)
            .or_default()
            .push(CoefficientView::from(coefficient));
    }

    snapshot
        .games
        .iter()
        .map(|game| GameView::from_game(game, by_game.remove(&game.id).unwrap_or_default()))
        .collect()
}

/// Data problems the ranking does not guard against
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotIssue {
    #[error("coefficient {coefficient_id} of game {game_id} has non-positive value {value}")]
    NonPositiveCoefficient {
        coefficient_id: i64,
        game_id: i64,
        value: f64,
    },
    #[error("game {game_id} offers bet type {bet_type} more than once")]
    DuplicateBetType { game_id: i64, bet_type: BetType },
    #[error("game {game_id} was played at {played} before its start at {starting}")]
    PlayedBeforeStart {
        game_id: i64,
        starting: DateTime<Utc>,
        played: DateTime<Utc>,
    },
    #[error("coefficient {coefficient_id} references unknown game {game_id}")]
    OrphanCoefficient { coefficient_id: i64, game_id: i64 },
}

/// Report (without fixing) everything in a snapshot that breaks the data model's invariants
pub fn validate_snapshot(snapshot: &Snapshot) -> Vec<SnapshotIssue> {
    let mut issues = Vec::new();

    for game in &snapshot.games {
        if let Some(played) = game.date_time_played {
            if played < game.date_time_starting {
                issues.push(SnapshotIssue::PlayedBeforeStart {
                    game_id: game.id,
                    starting: game.date_time_starting,
                    played,
                });
            }
        }
    }

    let known: HashSet<i64> = snapshot.games.iter().map(|g| g.id).collect();
    let mut offered: HashSet<(i64, BetType)> = HashSet::new();
    let mut reported: HashSet<(i64, BetType)> = HashSet::new();

    for coefficient in &snapshot.coefficients {
        if !known.contains(&coefficient.game_id) {
            issues.push(SnapshotIssue::OrphanCoefficient {
                coefficient_id: coefficient.id,
                game_id: coefficient.game_id,
            });
        }

        // NaN is not positive either
        if !(coefficient.coefficient_value > 0.0) {
            issues.push(SnapshotIssue::NonPositiveCoefficient {
                coefficient_id: coefficient.id,
                game_id: coefficient.game_id,
                value: coefficient.coefficient_value,
            });
        }

        let key = (coefficient.game_id, coefficient.bet_type);
        if !offered.insert(key) && reported.insert(key) {
            issues.push(SnapshotIssue::DuplicateBetType {
                game_id: coefficient.game_id,
                bet_type: coefficient.bet_type,
            });
        }
    }

    issues
}

#[derive(Debug, Serialize)]
struct OfferRow<'a> {
    board: &'static str,
    id: i64,
    sport: String,
    first_team: &'a str,
    second_team: &'a str,
    starting: String,
    score: String,
    #[serde(rename = "1")]
    home_win: String,
    #[serde(rename = "X")]
    draw: String,
    #[serde(rename = "2")]
    away_win: String,
    #[serde(rename = "1X")]
    home_win_or_draw: String,
    #[serde(rename = "X2")]
    away_win_or_draw: String,
    #[serde(rename = "12")]
    home_or_away_win: String,
}

impl<'a> OfferRow<'a> {
    fn new(board: &'static str, game: &'a GameView) -> Self {
        let odds = |bet_type: BetType| game.formatted_coefficient(bet_type);

        Self {
            board,
            id: game.id,
            sport: game.game_type.to_string(),
            first_team: &game.first_team_name,
            second_team: &game.second_team_name,
            starting: game.date_time_starting.to_rfc3339(),
            score: format!("{:.4}", attractiveness_score(game)),
            home_win: odds(BetType::HomeWin),
            draw: odds(BetType::Draw),
            away_win: odds(BetType::AwayWin),
            home_win_or_draw: odds(BetType::HomeWinOrDraw),
            away_win_or_draw: odds(BetType::AwayWinOrDraw),
            home_or_away_win: odds(BetType::HomeOrAwayWin),
        }
    }
}

/// Save both boards of an offer board to CSV, best offers first
pub fn save_offer_board_to_csv(board: &OfferBoard, filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename.as_ref()).context("Failed to create CSV file")?;

    let rows = board
        .best_offers
        .iter()
        .map(|g| OfferRow::new("best", g))
        .chain(board.other_offers.iter().map(|g| OfferRow::new("other", g)));

    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coefficient, Game, GameType};
    use chrono::{Duration, TimeZone};

    fn game(id: i64, game_type: GameType) -> Game {
        Game {
            id,
            game_type,
            first_team_name: format!("Home {}", id),
            second_team_name: format!("Away {}", id),
            first_team_score: None,
            second_team_score: None,
            date_time_starting: Utc.with_ymd_and_hms(2024, 9, 14, 15, 30, 0).unwrap(),
            date_time_played: None,
        }
    }

    fn coefficient(id: i64, game_id: i64, bet_type: BetType, value: f64) -> Coefficient {
        Coefficient {
            id,
            game_id,
            bet_type,
            coefficient_value: value,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            games: vec![game(1, GameType::Football), game(2, GameType::Handball)],
            coefficients: vec![
                coefficient(10, 1, BetType::HomeWin, 1.8),
                coefficient(11, 2, BetType::HomeWin, 2.4),
                coefficient(12, 1, BetType::Draw, 3.2),
                coefficient(13, 1, BetType::AwayWin, 4.5),
            ],
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("betting_system_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_hydrate_games_keeps_coefficient_order() {
        let games = hydrate_games(&snapshot());
        assert_eq!(games.len(), 2);

        let ids: Vec<i64> = games[0].coefficients.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 12, 13]);
        assert_eq!(games[1].coefficients.len(), 1);
        assert_eq!(games[1].coefficients[0].game_id, 2);
    }

    #[test]
    fn test_hydrate_games_drops_orphans() {
        let mut snapshot = snapshot();
        snapshot
            .coefficients
            .push(coefficient(99, 42, BetType::HomeWin, 1.5));

        let games = hydrate_games(&snapshot);
        let total: usize = games.iter().map(|g| g.coefficients.len()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_hydrate_game_without_coefficients() {
        let snapshot = Snapshot {
            games: vec![game(7, GameType::Basketball)],
            coefficients: vec![],
        };
        let games = hydrate_games(&snapshot);
        assert!(games[0].coefficients.is_empty());
    }

    #[test]
    fn test_validate_clean_snapshot() {
        assert!(validate_snapshot(&snapshot()).is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue_kind() {
        let mut snapshot = snapshot();
        snapshot.games[1].date_time_played =
            Some(snapshot.games[1].date_time_starting - Duration::minutes(5));
        snapshot.coefficients.extend([
            coefficient(20, 1, BetType::HomeWin, 1.7),
            coefficient(21, 1, BetType::HomeWin, 1.6),
            coefficient(22, 2, BetType::Draw, 0.0),
            coefficient(23, 2, BetType::AwayWin, -1.2),
            coefficient(24, 77, BetType::Draw, 2.0),
        ]);

        let issues = validate_snapshot(&snapshot);
        assert!(matches!(
            issues[0],
            SnapshotIssue::PlayedBeforeStart { game_id: 2, .. }
        ));
        // The third HomeWin on game 1 is not reported again
        let duplicates = issues
            .iter()
            .filter(|i| matches!(i, SnapshotIssue::DuplicateBetType { .. }))
            .count();
        assert_eq!(duplicates, 1);
        let non_positive = issues
            .iter()
            .filter(|i| matches!(i, SnapshotIssue::NonPositiveCoefficient { .. }))
            .count();
        assert_eq!(non_positive, 2);
        assert!(issues.contains(&SnapshotIssue::OrphanCoefficient {
            coefficient_id: 24,
            game_id: 77
        }));
        assert_eq!(issues.len(), 5);
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let path = temp_path("snapshot.json");
        save_snapshot(&snapshot(), &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, snapshot());
    }

    #[test]
    fn test_load_missing_snapshot_fails() {
        assert!(load_snapshot(temp_path("missing.json")).is_err());
    }

    #[test]
    fn test_save_offer_board_to_csv() {
        let games = hydrate_games(&snapshot());
        let board = OfferBoard {
            best_offers: vec![games[0].clone()],
            other_offers: vec![games[1].clone()],
        };

        let path = temp_path("board.csv");
        save_offer_board_to_csv(&board, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "board,id,sport,first_team,second_team,starting,score,1,X,2,1X,X2,12"
        );
        assert!(lines[1].starts_with("best,1,Football,Home 1,Away 1,"));
        assert!(lines[1].ends_with(",1.80,3.20,4.50,,,"));
        assert!(lines[2].starts_with("other,2,Handball,"));
    }
}
