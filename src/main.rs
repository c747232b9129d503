use std::net::SocketAddr;

use clap::Parser;
use reelpass::cli::{
    Args, build_config, handle_create_user, init_logging, load_jwt_secret, open_database,
    validate_lifetimes,
};
use reelpass::create_app;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(jwt_secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let Some(lifetimes) = validate_lifetimes(args.access_ttl_secs, args.refresh_ttl_secs) else {
        std::process::exit(1);
    };

    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    if let Some(email) = args.create_user.as_deref() {
        handle_create_user(&db, email, &args.first_name, &args.last_name).await;
    }

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap_or_else(|e| {
        error!(error = %e, "Failed to read local address");
        std::process::exit(1);
    });

    if !args.insecure_cookies && args.cookie_domain == "localhost" {
        info!("Secure refresh cookies on localhost require HTTPS; pass --insecure-cookies for plain HTTP");
    }

    let config = build_config(
        db,
        jwt_secret,
        args.jwt_issuer,
        args.jwt_audience,
        lifetimes,
        args.cookie_domain,
        args.cookie_path,
        args.insecure_cookies,
    );
    let app = create_app(&config);

    info!(
        address = %local_addr,
        access_ttl_secs = lifetimes.access.as_secs(),
        refresh_ttl_secs = lifetimes.refresh.as_secs(),
        "Listening"
    );

    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    if let Err(e) = axum::serve(listener, make_service).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
