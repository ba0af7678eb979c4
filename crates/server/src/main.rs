//! tasknote server entry point.
//!
//! `tasknote` serves the REST API. `tasknote create-superuser <username>
//! <email> <password>` provisions a staff account and exits.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use sea_orm::DatabaseConnection;
use tasknote_api::AppState;
use tasknote_common::{Config, LocalStorage, StorageBackend};
use tasknote_core::{CreateUserInput, UserService};
use tasknote_db::repositories::UserRepository;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest request body accepted, uploads included.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Create a staff account from the command line.
async fn create_superuser(
    db: Arc<DatabaseConnection>,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let [username, email, password] = args else {
        return Err("usage: tasknote create-superuser <username> <email> <password>".into());
    };

    let service = UserService::new(UserRepository::new(db));
    let user = service
        .create_superuser(CreateUserInput {
            username: username.clone(),
            email: email.clone(),
            password: password.clone(),
            date_of_birth: None,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "Superuser created");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasknote=debug,tower_http=debug".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = Config::load()?;

    let db = tasknote_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    tasknote_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    if let Some(command) = args.first() {
        return match command.as_str() {
            "create-superuser" => create_superuser(db, &args[1..]).await,
            other => Err(format!("unknown command: {other}").into()),
        };
    }

    info!("Starting tasknote server...");

    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        config.storage.base_path.clone(),
        config.storage.base_url.clone(),
    ));
    let state = AppState::new(db, storage, &config);

    let mut app = tasknote_api::app(state);
    // Uploaded blobs are only served from here when the URL prefix is local.
    let media_prefix = config.storage.base_url.trim_end_matches('/');
    if media_prefix.len() > 1 && media_prefix.starts_with('/') {
        app = app.nest_service(
            media_prefix,
            ServeDir::new(&config.storage.base_path),
        );
    }

    let app = app
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
