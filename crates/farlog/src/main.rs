//! farlog CLI - Far Cry match timelines
//!
//! Reconstructs kills, suicides and session windows from dedicated-server
//! logs, and exports or stores them.

mod handlers;
mod state;

use handlers::{export, matches, parse, store};
use sen::Router;
use state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let state = AppState::new();

    let router = Router::new()
        // Log commands
        .route("parse", parse::parse())
        .route("export", export::export())
        .route("store", store::store())

        // Database commands
        .route("matches", matches::list())
        .route("show", matches::show())
        .route("leaderboard", matches::leaderboard())
        .route("delete", matches::delete())

        .with_state(state)
        .with_agent_mode(); // JSON output for scripting

    let response = router.execute().await;

    if response.agent_mode {
        println!("{}", response.to_agent_json());
    } else if !response.output.is_empty() {
        println!("{}", response.output);
    }

    std::process::exit(response.exit_code);
}
