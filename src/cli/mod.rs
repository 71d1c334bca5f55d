//! Command-line interface for StayKey
//!
//! Two entry points: `serve` runs the HTTP API, `code` prints the
//! deliverable login code for a chat account straight from storage (an
//! operator escape hatch when the bot is down).

use crate::Result;
use crate::config::Config;
use clap::{Arg, ArgMatches, Command};
use std::sync::Arc;

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let app = build_cli();
    let matches = app.get_matches();

    match matches.subcommand() {
        Some(("serve", sub_matches)) => handle_serve_command(sub_matches).await,
        Some(("code", sub_matches)) => handle_code_command(sub_matches).await,
        _ => {
            eprintln!("No command specified. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn build_cli() -> Command {
    Command::new("staykey")
        .about("StayKey - rental platform login backend with bot-delivered one-time codes")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(
            Command::new("serve")
                .about("Start the StayKey HTTP API")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Path to the config file"),
                )
                .arg(Arg::new("host").long("host").help("Server host override"))
                .arg(
                    Arg::new("port")
                        .long("port")
                        .short('p')
                        .help("Server port override"),
                ),
        )
        .subcommand(
            Command::new("code")
                .about("Print the deliverable login code for a chat account")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Path to the config file"),
                )
                .arg(
                    Arg::new("chat-id")
                        .long("chat-id")
                        .required(true)
                        .help("Chat account id to look up"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    match matches.get_one::<String>("config") {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

async fn handle_serve_command(matches: &ArgMatches) -> Result<()> {
    let mut config = load_config(matches)?;

    // CLI flags override the config file
    let mut http = config.http.clone().unwrap_or_default();
    if let Some(host) = matches.get_one::<String>("host") {
        http.host = host.clone();
    }
    if let Some(port) = matches.get_one::<String>("port") {
        http.port = port
            .parse::<u16>()
            .map_err(|e| crate::StayKeyError::config(format!("Invalid port '{}': {}", port, e)))?;
    }
    config.http = Some(http);

    crate::http::start_server(config).await
}

async fn handle_code_command(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;

    let chat_id = matches
        .get_one::<String>("chat-id")
        .expect("required arg")
        .parse::<i64>()
        .map_err(|e| crate::StayKeyError::config(format!("Invalid chat id: {}", e)))?;

    let storage = crate::storage::create_storage_from_config(&config.storage).await?;
    let manager = Arc::new(crate::otc::CodeManager::new(storage));

    let code = manager.code_for_delivery(chat_id).await?;
    println!("{}", code);
    Ok(())
}
