use std::sync::Arc;

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use juke::{
    config, error, info,
    management::{AuthFlow, InteractionRecorder, JsonTrackStore, JsonUserStore, RecommendationEngine},
    server::{self, AppState},
    session::MemorySessionStore,
    spotify::client::SpotifyClient,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Address to bind instead of SERVER_ADDRESS
    #[clap(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let upstream = Arc::new(SpotifyClient::from_config());

    let data_dir = config::data_dir();
    let users = match JsonUserStore::open(data_dir.join("users.json")).await {
        Ok(store) => Arc::new(store),
        Err(e) => error!("Failed to open user store: {}", e),
    };
    let tracks = match JsonTrackStore::open(data_dir.join("songs.json")).await {
        Ok(store) => Arc::new(store),
        Err(e) => error!("Failed to open track store: {}", e),
    };
    let sessions = Arc::new(MemorySessionStore::new());

    let state = AppState {
        sessions,
        users: users.clone(),
        upstream: upstream.clone(),
        flow: Arc::new(AuthFlow::new(users.clone(), upstream.clone())),
        engine: Arc::new(RecommendationEngine::new(users.clone(), upstream.clone())),
        recorder: Arc::new(InteractionRecorder::new(users, tracks, upstream)),
    };

    info!("Store directory: {}", data_dir.display());
    server::start_api_server(state, cli.address).await;
}
