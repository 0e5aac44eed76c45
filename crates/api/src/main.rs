use std::net::SocketAddr;
use std::sync::Arc;

use folio_blob::{BlobService, CloudinaryBlobService, CloudinaryConfig, LocalBlobService};
use folio_store::seed::demo_projects;
use folio_store::{JsonFileStore, PgStore, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::config::{BlobConfig, ServerConfig, StoreConfig};
use folio_api::router::build_app_router;
use folio_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Stores ---
    let store = open_store(&config.store).await;
    let blobs = open_blob_service(&config.blob).await;
    tracing::info!(
        store = store.backend_name(),
        blobs = blobs.backend_name(),
        "Storage backends ready"
    );

    // --- App state ---
    let state = AppState {
        store,
        blobs,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured record store. Any failure here is fatal.
async fn open_store(config: &StoreConfig) -> Arc<dyn Store> {
    match config {
        StoreConfig::Json {
            data_file,
            seed_demo_data,
        } => {
            let seed = if *seed_demo_data {
                demo_projects()
            } else {
                Vec::new()
            };
            let store = JsonFileStore::open_with_seed(data_file, seed)
                .await
                .expect("Failed to open data file");
            Arc::new(store)
        }
        StoreConfig::Postgres { database_url } => {
            let pool = folio_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            folio_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            folio_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
    }
}

/// Open the configured blob service. Any failure here is fatal.
async fn open_blob_service(config: &BlobConfig) -> Arc<dyn BlobService> {
    match config {
        BlobConfig::Local {
            upload_dir,
            public_base_url,
        } => {
            let service = LocalBlobService::open(upload_dir.clone(), public_base_url)
                .await
                .expect("Failed to create upload directory");
            Arc::new(service)
        }
        BlobConfig::Cloudinary {
            cloud_name,
            api_key,
            api_secret,
            folder,
        } => {
            let mut cloudinary = CloudinaryConfig::new(cloud_name, api_key, api_secret);
            cloudinary.folder = folder.clone();
            let service = CloudinaryBlobService::new(cloudinary)
                .expect("Failed to build image host client");
            Arc::new(service)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
