//! StayKey CLI - rental platform login backend
//!
//! Run with: cargo run --bin staykey -- <command>
//! Or after build: ./target/release/staykey <command>

#[tokio::main]
async fn main() {
    // Load .env file as early as possible (bot secret, database DSN, etc.)
    let _ = dotenvy::dotenv();

    // Initialize logging
    staykey::init_logging();

    // Run CLI
    if let Err(e) = staykey::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
