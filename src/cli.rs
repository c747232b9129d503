//! CLI argument parsing, validation, and startup helpers.

use std::sync::Arc;
use std::time::Duration;

use crate::ServerConfig;
use crate::auth::{CookieSettings, REFRESH_COOKIE_NAME, TokenLifetimes};
use crate::clock::SystemClock;
use crate::db::Database;
use crate::password::hash_password;
use clap::Parser;
use tracing::{error, info};

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Upper bound for either token lifetime: 365 days.
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "Reelpass",
    about = "Movie catalog API with stateless JWT authentication"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value = "reelpass.db")]
    pub database: String,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Issuer claim for every token
    #[arg(long, env = "JWT_ISSUER", default_value = "example.com")]
    pub jwt_issuer: String,

    /// Audience claim for every token
    #[arg(long, env = "JWT_AUDIENCE", default_value = "example.com")]
    pub jwt_audience: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "ACCESS_TTL_SECS", default_value = "900", value_parser = clap::value_parser!(u64).range(1..=MAX_TOKEN_TTL_SECS))]
    pub access_ttl_secs: u64,

    /// Refresh token lifetime in seconds
    #[arg(long, env = "REFRESH_TTL_SECS", default_value = "86400", value_parser = clap::value_parser!(u64).range(1..=MAX_TOKEN_TTL_SECS))]
    pub refresh_ttl_secs: u64,

    /// Domain attribute of the refresh cookie
    #[arg(long, env = "COOKIE_DOMAIN", default_value = "localhost", value_parser = validate_cookie_domain)]
    pub cookie_domain: String,

    /// Path attribute of the refresh cookie
    #[arg(long, env = "COOKIE_PATH", default_value = "/", value_parser = validate_cookie_path)]
    pub cookie_path: String,

    /// Omit the Secure flag on the refresh cookie (plain HTTP development only)
    #[arg(long)]
    pub insecure_cookies: bool,

    /// Create a user with this email on startup. Password is read from NEW_USER_PASSWORD
    #[arg(long)]
    pub create_user: Option<String>,

    /// First name for --create-user
    #[arg(long, default_value = "")]
    pub first_name: String,

    /// Last name for --create-user
    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

fn validate_cookie_path(s: &str) -> Result<String, String> {
    if !s.starts_with('/') {
        return Err(format!("Cookie path must start with '/': {}", s));
    }

    if s.chars().any(|c| !c.is_ascii() || c.is_whitespace() || c == ';') {
        return Err(format!("Cookie path contains invalid characters: {}", s));
    }

    Ok(s.to_string())
}

fn validate_cookie_domain(s: &str) -> Result<String, String> {
    if s
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'))
    {
        return Err(format!("Cookie domain contains invalid characters: {}", s));
    }

    Ok(s.to_string())
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Check that both lifetimes are within bounds and refresh tokens outlive access tokens.
/// Returns None and logs an error otherwise.
pub fn validate_lifetimes(access_ttl_secs: u64, refresh_ttl_secs: u64) -> Option<TokenLifetimes> {
    if access_ttl_secs == 0 || refresh_ttl_secs > MAX_TOKEN_TTL_SECS {
        error!(
            access_ttl_secs,
            refresh_ttl_secs,
            max_ttl_secs = MAX_TOKEN_TTL_SECS,
            "Token lifetimes must be between 1 second and 365 days"
        );
        return None;
    }

    if refresh_ttl_secs <= access_ttl_secs {
        error!(
            access_ttl_secs,
            refresh_ttl_secs, "Refresh token lifetime must exceed access token lifetime"
        );
        return None;
    }

    Some(TokenLifetimes {
        access: Duration::from_secs(access_ttl_secs),
        refresh: Duration::from_secs(refresh_ttl_secs),
    })
}

/// Handle the --create-user flag: hash NEW_USER_PASSWORD and insert the user.
pub async fn handle_create_user(db: &Database, email: &str, first_name: &str, last_name: &str) {
    let Ok(password) = std::env::var("NEW_USER_PASSWORD") else {
        error!("--create-user requires the NEW_USER_PASSWORD environment variable");
        std::process::exit(1);
    };
    // SAFETY: We're single-threaded at this point during startup.
    unsafe { std::env::remove_var("NEW_USER_PASSWORD") };

    match db.users().get_by_email(email).await {
        Ok(Some(existing)) => {
            info!(user_id = existing.id, email = %existing.email, "User already exists");
            return;
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "Failed to check for existing user");
            std::process::exit(1);
        }
    }

    let hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            std::process::exit(1);
        }
    };

    match db
        .users()
        .create(first_name, last_name, email, &hash)
        .await
    {
        Ok(id) => info!(user_id = id, email = %email, "User created"),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            std::process::exit(1);
        }
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    jwt_secret: String,
    jwt_issuer: String,
    jwt_audience: String,
    lifetimes: TokenLifetimes,
    cookie_domain: String,
    cookie_path: String,
    insecure_cookies: bool,
) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        jwt_issuer,
        jwt_audience,
        lifetimes,
        cookies: CookieSettings {
            name: REFRESH_COOKIE_NAME.to_string(),
            domain: cookie_domain,
            path: cookie_path,
            secure: !insecure_cookies,
        },
        clock: Arc::new(SystemClock),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
