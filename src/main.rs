//! Soundshelf - a self-hosted music catalog and playlist server
//!
//! Serves a JSON API for artists, albums and songs, user accounts with
//! bearer-token sessions, and per-user playlists.

mod api;
mod config;
mod core;
mod db;
mod error;
mod models;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::core::TokenService;
use crate::db::DbEngine;

/// Soundshelf - music catalog and playlist server
#[derive(Parser, Debug)]
#[command(name = "soundshelf")]
#[command(version)]
#[command(about = "A self-hosted music catalog and playlist server")]
struct Args {
    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// SQLite connection string, e.g. sqlite://soundshelf.db
    #[arg(long)]
    database_url: Option<String>,

    /// Path to a settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.database_url {
        config.database_url = Some(url);
    }

    let log_level = if args.debug {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };

    // quiet sqlx statement logging unless explicitly asked for
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("{},sqlx=warn", log_level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("Soundshelf v{} starting...", env!("CARGO_PKG_VERSION"));

    run(config).await
}

async fn run(config: AppConfig) -> Result<()> {
    let database_url = config.resolved_database_url()?;
    info!("Opening database...");
    let db = DbEngine::connect(&database_url).await?;

    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl()?);
    info!("Session tokens expire after {}", config.jwt_expires_in);

    let state = web::Data::new(AppState::new(db, tokens));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Server listening on http://{}", addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await?;

    Ok(())
}
