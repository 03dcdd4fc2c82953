use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use facility_registry_server::adapter::handler::{self, AppState};
use facility_registry_server::domain::repository::batch_repository::BatchRepository;
use facility_registry_server::domain::repository::facility_repository::FacilityRepository;
use facility_registry_server::domain::service::pacer::{Pacer, TokioPacer};
use facility_registry_server::infrastructure::config::Config;
use facility_registry_server::infrastructure::persistence::batch_repo_impl::BatchRepositoryImpl;
use facility_registry_server::infrastructure::persistence::facility_repo_impl::FacilityRepositoryImpl;
use facility_registry_server::usecase;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 2. Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg = Config::load(&config_path)?;
    info!("starting {}", cfg.app.name);

    // 3. Database
    let max_connections = cfg
        .database
        .as_ref()
        .map(|db| db.max_connections)
        .unwrap_or(25);
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&cfg.database_url()?)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database connected and migrated");

    // 4. Repositories
    let facility_repo: Arc<dyn FacilityRepository> =
        Arc::new(FacilityRepositoryImpl::new(pool.clone()));
    let batch_repo: Arc<dyn BatchRepository> = Arc::new(BatchRepositoryImpl::new(pool.clone()));
    let pacer: Arc<dyn Pacer> = Arc::new(TokioPacer);

    // 5. Usecases
    let state = AppState {
        ingest_uc: Arc::new(usecase::ingest_batch::IngestBatchUsecase::new(
            facility_repo.clone(),
            batch_repo.clone(),
            pacer,
            cfg.ingest.max_csv_rows,
            cfg.ingest.max_delay_seconds,
        )),
        batch_status_uc: Arc::new(usecase::batch_status::BatchStatusUsecase::new(
            batch_repo.clone(),
        )),
        manage_batch_uc: Arc::new(usecase::manage_batch::ManageBatchUsecase::new(
            facility_repo.clone(),
        )),
        validate_csv_uc: Arc::new(usecase::validate_csv::ValidateCsvUsecase::new(
            cfg.ingest.max_csv_rows,
        )),
        manage_facilities_uc: Arc::new(usecase::manage_facilities::ManageFacilitiesUsecase::new(
            facility_repo,
            cfg.ingest.default_page_size,
        )),
    };

    // 6. HTTP server
    let app = handler::router(state);
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
