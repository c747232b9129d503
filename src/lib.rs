pub mod api;
pub mod auth;
pub mod cli;
pub mod clock;
pub mod db;
pub mod jwt;
pub mod password;

use api::{AuthState, create_api_router};
use auth::{CookieSettings, TokenIssuer, TokenLifetimes};
use axum::Router;
use clock::Clock;
use db::Database;
use jwt::JwtConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// `iss` claim stamped on and required of every token
    pub jwt_issuer: String,
    /// `aud` claim stamped on and required of every token
    pub jwt_audience: String,
    /// Access and refresh token lifetimes
    pub lifetimes: TokenLifetimes,
    /// Refresh cookie name, domain, path and Secure flag
    pub cookies: CookieSettings,
    /// Time source for issuing and verifying tokens
    pub clock: Arc<dyn Clock>,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    if !password::prepare_dummy_hash() {
        tracing::warn!("Could not prepare dummy password hash; unknown-email logins skip hashing");
    }

    let jwt = Arc::new(JwtConfig::new(
        &config.jwt_secret,
        config.jwt_issuer.as_str(),
        config.jwt_audience.as_str(),
    ));

    let state = AuthState {
        db: config.db.clone(),
        issuer: TokenIssuer::new(jwt.clone(), config.lifetimes),
        jwt,
        cookies: Arc::new(config.cookies.clone()),
        clock: config.clock.clone(),
    };

    create_api_router(state)
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> Result<(tokio::task::JoinHandle<()>, SocketAddr), std::io::Error> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
