use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod cache;
mod commands;
mod config;
mod models;
mod services;
mod session;
mod utils;

use commands::Flow;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing; stdout belongs to the console
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vaultpay=info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("Starting VaultPay console...");
    info!(" __     __          _ _   ____");
    info!(" \\ \\   / /_ _ _   _| | |_|  _ \\ __ _ _   _");
    info!("  \\ \\ / / _` | | | | | __| |_) / _` | | | |");
    info!("   \\ V / (_| | |_| | | |_|  __/ (_| | |_| |");
    info!("    \\_/ \\__,_|\\__,_|_|\\__|_|   \\__,_|\\__, |");
    info!("                                     |___/");

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!("API base: {}", config.api_url);
    info!("Session file: {}", config.session_file.display());

    let app = app::App::new(config);
    app.start();

    println!("Type `help` for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("vaultpay:{}> ", app.router.current().as_str());
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        if commands::handle_line(&app, &line).await == Flow::Quit {
            break;
        }
    }

    info!("Goodbye");
}
