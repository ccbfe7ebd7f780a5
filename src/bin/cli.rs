use anyhow::{Context, Result};
use betting_system::api::offers_api::OfferApiClient;
use betting_system::config::Settings;
use betting_system::models::{GameType, GameView, OfferBoard};
use betting_system::utils::bet_slip::BetSlip;
use betting_system::utils::data::{load_snapshot, save_offer_board_to_csv, validate_snapshot};
use betting_system::utils::filters::GameFilter;
use betting_system::utils::offers::attractiveness_score;
use betting_system::{load_games, offer_board};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Offer boards for the betting system")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Snapshot file with games and coefficients (defaults to SNAPSHOT_FILE)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the games of the local snapshot
    Board {
        /// Only this sport (football, basketball, handball)
        #[arg(long)]
        sport: Option<GameType>,
        /// Also rank games that have already been played
        #[arg(long)]
        include_resolved: bool,
        /// Write the board to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Fetch a sport's board from a running web server
    Fetch {
        #[arg(long)]
        sport: GameType,
        /// Server base URL (defaults to OFFERS_API_URL)
        #[arg(long)]
        url: Option<String>,
    },
    /// Put coefficients on a bet slip and show the combined coefficient
    Slip {
        /// Coefficient ids to pick
        #[arg(short, long = "coefficient", required = true)]
        coefficients: Vec<i64>,
    },
    /// Report data problems in the snapshot
    Validate,
}

fn print_games(title: &str, games: &[GameView]) {
    println!("{}\n", title);
    if games.is_empty() {
        println!("No games on offer.\n");
        return;
    }

    for (i, game) in games.iter().enumerate() {
        let odds: Vec<String> = game
            .coefficients
            .iter()
            .map(|c| format!("{} {:.2}", c.bet_type, c.coefficient_value))
            .collect();
        println!(
            "{}. [{}] {} | {} - {} | {} | score {:.2}",
            i + 1,
            game.id,
            game.date_time_starting.format("%Y-%m-%d %H:%M"),
            game.first_team_name,
            game.second_team_name,
            game.game_type,
            attractiveness_score(game)
        );
        if !odds.is_empty() {
            println!("   {}", odds.join("  "));
        }
    }
    println!();
}

fn print_board(board: &OfferBoard) {
    if board.is_empty() {
        println!("No games on offer.");
        return;
    }
    print_games("BEST OFFERS", &board.best_offers);
    print_games("OTHER OFFERS", &board.other_offers);
}

fn slip_from_snapshot(
    games: &[GameView],
    board: &OfferBoard,
    coefficient_ids: &[i64],
) -> Result<BetSlip> {
    let mut slip = BetSlip::new();

    for &coefficient_id in coefficient_ids {
        let game = games
            .iter()
            .find(|g| g.coefficients.iter().any(|c| c.id == coefficient_id))
            .with_context(|| format!("No game offers coefficient {}", coefficient_id))?;
        let is_special_offer = board.best_offers.iter().any(|g| g.id == game.id);

        if slip.selections().iter().any(|s| s.game_id == game.id) {
            tracing::warn!(
                game_id = game.id,
                coefficient_id,
                "game already on the slip, replacing its selection"
            );
        }
        slip.place_bet_on_coefficient(game, coefficient_id, is_special_offer)?;
    }

    Ok(slip)
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let snapshot_file = cli.snapshot.unwrap_or(settings.snapshot_file);

    match cli.command {
        Commands::Board {
            sport,
            include_resolved,
            csv,
        } => {
            let games = load_games(&snapshot_file)?;

            let mut filter = GameFilter::new();
            if !include_resolved {
                filter = filter.where_unresolved();
            }
            if let Some(game_type) = sport {
                filter = filter.where_game_type(game_type);
            }

            let board = offer_board(&games, filter);
            print_board(&board);

            if let Some(csv) = csv {
                save_offer_board_to_csv(&board, &csv)?;
                println!("Saved offer board to {}", csv.display());
            }
        }
        Commands::Fetch { sport, url } => {
            let client = OfferApiClient::new(url.unwrap_or(settings.offers_api_url));
            println!("Fetching {} offers from {}\n", sport, client.games_url());

            let board = client.fetch_offer_board(sport).await?;
            print_board(&board);
        }
        Commands::Slip { coefficients } => {
            let games = load_games(&snapshot_file)?;
            let board = offer_board(&games, GameFilter::new().where_unresolved());

            let slip = slip_from_snapshot(&games, &board, &coefficients)?;
            println!("BET SLIP\n");
            for (i, selection) in slip.selections().iter().enumerate() {
                println!("{}. {}", i + 1, selection.format());
            }
            println!("\nTotal coefficient: {:.2}", slip.total_coefficient());
        }
        Commands::Validate => {
            let snapshot = load_snapshot(&snapshot_file)?;
            let issues = validate_snapshot(&snapshot);
            if issues.is_empty() {
                println!(
                    "No issues in {} ({} games, {} coefficients)",
                    snapshot_file.display(),
                    snapshot.games.len(),
                    snapshot.coefficients.len()
                );
            } else {
                println!("Found {} issue(s):\n", issues.len());
                for (i, issue) in issues.iter().enumerate() {
                    println!("{}. {}", i + 1, issue);
                }
            }
        }
    }

    Ok(())
}
