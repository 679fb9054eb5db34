mod collections;
mod config;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    CredentialStore, Credentials, GameBackend, HttpBackend, Lobby, Round, RoundSetup,
};
use shared::{
    domain::{CollectionCode, CollectionRef, CollectionVisibility, GameMode, RoundData},
    protocol::RegisterRequest,
};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::{collections::CollectionsArgs, config::Settings};

#[derive(Parser, Debug)]
#[command(name = "spotimpostor", version, about = "Spot the impostor party game client")]
struct Cli {
    /// Settings file (defaults to ./spotimpostor.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the game modes offered by the backend.
    Modes,
    /// List word collections, or create, show and edit your own.
    Collections(CollectionsArgs),
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Create a round on the backend and play it on this device.
    Play(PlayArgs),
    /// Play a round from a saved round file, without the backend.
    Replay {
        #[arg(long)]
        round_file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[arg(long)]
    mode: String,
    #[arg(long)]
    collection: String,
    #[arg(long)]
    collection_code: Option<String>,
    #[arg(long, default_value = "general")]
    visibility: CollectionVisibility,
    #[arg(long, default_value_t = 1)]
    impostors: usize,
    #[arg(required = true)]
    players: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings =
        Settings::load(cli.config.as_deref())?.with_overrides(cli.api_url, cli.data_dir);
    let store = CredentialStore::in_dir(&settings.data_dir);

    match cli.command {
        Command::Modes => {
            let backend = HttpBackend::new(&settings.api_base_url)?;
            for mode in backend.game_modes().await? {
                println!("{:<12} {}", mode.name, mode.description);
            }
        }
        Command::Collections(args) => {
            let backend = HttpBackend::new(&settings.api_base_url)?;
            collections::run(&backend, &store, args).await?;
        }
        Command::Login { email, password } => {
            let backend = HttpBackend::new(&settings.api_base_url)?;
            let response = backend.login(&email, &password).await?;
            store
                .save(&Credentials::logged_in(response.token, &response.user_name))
                .await?;
            println!("Logged in as {}", response.user_name);
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let backend = HttpBackend::new(&settings.api_base_url)?;
            let token = backend
                .register(&RegisterRequest {
                    user_name: name.clone(),
                    email,
                    password,
                })
                .await?;
            store.save(&Credentials::logged_in(token, &name)).await?;
            println!("Registered and logged in as {name}");
        }
        Command::Logout => {
            store.clear().await?;
            println!("Logged out");
        }
        Command::Play(args) => {
            let backend = HttpBackend::new(&settings.api_base_url)?;
            play(&backend, &store, args).await?;
        }
        Command::Replay { round_file } => {
            let raw = tokio::fs::read(&round_file)
                .await
                .with_context(|| format!("failed to read '{}'", round_file.display()))?;
            let data: RoundData = serde_json::from_slice(&raw)
                .with_context(|| format!("'{}' is not a round file", round_file.display()))?;
            let mut lines = BufReader::new(stdin()).lines();
            terminal::run_session(Round::from_data(data)?, &mut lines, &mut std::io::stdout())
                .await?;
        }
    }

    Ok(())
}

async fn play(backend: &impl GameBackend, store: &CredentialStore, args: PlayArgs) -> Result<()> {
    let mode = GameMode {
        name: args.mode,
        description: String::new(),
    };
    let collection = CollectionRef {
        name: args.collection,
        code: args.collection_code.map(CollectionCode::new),
        visibility: args.visibility,
    };
    let blind = mode.is_blind();
    let setup = RoundSetup::new(mode, collection, args.players, args.impostors);
    let request = setup.to_request()?;

    let response = backend.create_round(&request).await?;
    store.remember_game(response.game_id.clone()).await?;

    let lobby = Lobby::new(response.into_round_data(request.impostor_count), blind);
    let mut lines = BufReader::new(stdin()).lines();
    let mut out = std::io::stdout();
    let round = terminal::run_lobby(lobby, &mut lines, &mut out).await?;
    terminal::run_session(round, &mut lines, &mut out).await?;
    Ok(())
}
