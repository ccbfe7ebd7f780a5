use crate::models::{GameType, GameView};

/// Games without a played time have not finished yet
pub fn is_unresolved(game: &GameView) -> bool {
    game.date_time_played.is_none()
}

pub fn is_game_type(game: &GameView, game_type: GameType) -> bool {
    game.game_type == game_type
}

/// Composable selection applied to games before ranking.
/// Every enabled condition must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFilter {
    unresolved_only: bool,
    game_types: Vec<GameType>, // a game must match every entry
}

impl GameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_unresolved(mut self) -> Self {
        self.unresolved_only = true;
        self
    }

    pub fn where_game_type(mut self, game_type: GameType) -> Self {
        if !self.game_types.contains(&game_type) {
            self.game_types.push(game_type);
        }
        self
    }

    pub fn matches(&self, game: &GameView) -> bool {
        if self.unresolved_only && !is_unresolved(game) {
            return false;
        }
        self.game_types
            .iter()
            .all(|&game_type| is_game_type(game, game_type))
    }

    /// Keep the matching games, in their original order
    pub fn apply<I>(&self, games: I) -> Vec<GameView>
    where
        I: IntoIterator<Item = GameView>,
    {
        games.into_iter().filter(|g| self.matches(g)).collect()
    }
}
