//! Dayplanner application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Build the token issuer (fatal if the secret is missing)
//! 3. Open the credential store (Redis or memory)
//! 4. Build router with API routes, CORS and security headers
//! 5. Start Axum server
//!
//! Also supports the `gen-secret` subcommand for generating a `JWT_SECRET`.

use dayplanner::{
    auth::{generate_jwt_secret, AppState, TokenIssuer},
    config::{Config, StorageBackend},
    routes,
    storage::{memory::MemoryUserStore, user::RedisUserStore, UserStore},
};
use std::sync::Arc;

fn print_usage() {
    eprintln!("Usage: dayplanner [gen-secret]");
    eprintln!();
    eprintln!("Without arguments, starts the API server configured from the environment.");
    eprintln!();
    eprintln!("  gen-secret   Print a random 32-byte secret for JWT_SECRET");
    eprintln!();
    eprintln!("Then set in .env:");
    eprintln!("  JWT_SECRET=<output>");
}

#[tokio::main]
async fn main() {
    // Check for subcommands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => {}
        Some("gen-secret") => {
            println!("{}", generate_jwt_secret());
            return;
        }
        Some(_) => {
            print_usage();
            std::process::exit(1);
        }
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("Failed to load config");
    tracing::info!(?config, "Starting dayplanner on {}", config.bind_addr);

    let tokens = TokenIssuer::from_config(&config).expect("Failed to configure token issuer");

    let store: Arc<dyn UserStore> = match config.storage_backend {
        StorageBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .expect("REDIS_URL is required for the redis backend");
            let store = RedisUserStore::open(redis_url).expect("Invalid Redis URL");

            // Verify Redis connection
            store.ping().await.expect("Failed to connect to Redis");
            tracing::info!("Connected to Redis user store");
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory user store; accounts are lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    let bind_addr = config.bind_addr;
    let state = AppState::new(config, store, tokens);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
