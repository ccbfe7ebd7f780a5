use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use betting_system::config::Settings;
use betting_system::models::{BetType, GameType, GameView};
use betting_system::utils::filters::GameFilter;
use betting_system::utils::offers::attractiveness_score;
use betting_system::{load_games, offer_board, sport_offer_board, sport_summaries, SportSummary};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

// Custom filters for formatting
mod filters {
    use chrono::{DateTime, Utc};

    pub fn format_coefficient(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.2}", value))
    }

    pub fn kickoff(dt: &DateTime<Utc>) -> ::askama::Result<String> {
        Ok(dt.format("%d.%m.%Y %H:%M").to_string())
    }
}

/// One game row on a sport board
struct OfferRow {
    id: i64,
    first_team_name: String,
    second_team_name: String,
    starting: DateTime<Utc>,
    score: f64,
    cells: Vec<String>,
}

impl OfferRow {
    fn new(game: &GameView) -> Self {
        let cells = BetType::ALL
            .iter()
            .map(|&bet_type| game.formatted_coefficient(bet_type))
            .collect();

        Self {
            id: game.id,
            first_team_name: game.first_team_name.clone(),
            second_team_name: game.second_team_name.clone(),
            starting: game.date_time_starting,
            score: attractiveness_score(game),
            cells,
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    active_page: String,
    summaries: Vec<SportSummary>,
}

#[derive(Template)]
#[template(path = "sport.html")]
struct SportTemplate {
    active_page: String,
    sport_name: String,
    bet_labels: Vec<&'static str>,
    best_offers: Vec<OfferRow>,
    other_offers: Vec<OfferRow>,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

// Shared state to cache data
type SharedData = Arc<RwLock<Option<Vec<GameView>>>>;

fn not_loaded() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Data not loaded yet").into_response()
}

async fn home(State(data): State<SharedData>) -> impl IntoResponse {
    let games = data.read().await;
    let Some(games) = games.as_ref() else {
        return not_loaded();
    };

    let template = HomeTemplate {
        active_page: "home".to_string(),
        summaries: sport_summaries(games),
    };

    HtmlTemplate(template).into_response()
}

async fn sport(
    State(data): State<SharedData>,
    Path(sport_name): Path<String>,
) -> impl IntoResponse {
    let game_type: GameType = match sport_name.parse() {
        Ok(game_type) => game_type,
        Err(e) => {
            tracing::debug!("{}, redirecting home", e);
            return Redirect::to("/").into_response();
        }
    };

    let games = data.read().await;
    let Some(games) = games.as_ref() else {
        return not_loaded();
    };

    let board = sport_offer_board(games, game_type);

    let template = SportTemplate {
        active_page: game_type.slug().to_string(),
        sport_name: game_type.to_string(),
        bet_labels: BetType::ALL.iter().map(|b| b.label()).collect(),
        best_offers: board.best_offers.iter().map(OfferRow::new).collect(),
        other_offers: board.other_offers.iter().map(OfferRow::new).collect(),
    };

    HtmlTemplate(template).into_response()
}

#[derive(Debug, Deserialize)]
struct GamesQuery {
    #[serde(rename = "sportType")]
    sport_type: Option<String>,
}

/// JSON board of unresolved games, for one sport or for all of them
async fn api_games(
    State(data): State<SharedData>,
    Query(query): Query<GamesQuery>,
) -> impl IntoResponse {
    let mut filter = GameFilter::new().where_unresolved();
    if let Some(sport_type) = query.sport_type.as_deref() {
        match sport_type.parse::<GameType>() {
            Ok(game_type) => filter = filter.where_game_type(game_type),
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        }
    }

    let games = data.read().await;
    let Some(games) = games.as_ref() else {
        return not_loaded();
    };

    Json(offer_board(games, filter)).into_response()
}

fn app(data: SharedData) -> Router {
    Router::new()
        // This will serve files from the "static" directory at the "/static" URL path
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(home))
        .route("/sport/:sport_name", get(sport))
        .route("/api/games", get(api_games))
        .with_state(data)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Loading games from {}", settings.snapshot_file.display());

    let data = match load_games(&settings.snapshot_file) {
        Ok(games) => {
            for summary in sport_summaries(&games) {
                tracing::info!(
                    "  - {}: {} best offer(s), {} other offer(s)",
                    summary.game_type,
                    summary.best_count,
                    summary.other_count
                );
            }
            Arc::new(RwLock::new(Some(games)))
        }
        Err(e) => {
            tracing::error!("Error loading games: {:#}", e);
            tracing::warn!("Server will start but pages may show errors");
            Arc::new(RwLock::new(None))
        }
    };

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("Starting web server at http://{}", settings.bind_addr);

    axum::serve(listener, app(data)).await?;

    Ok(())
}
