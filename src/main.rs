use std::sync::Arc;

use tracing::info;

use warden::{
    api::{start_api_server, ApiState},
    auth::{AuthenticationGateway, SigningKeyStore, SqlxCredentialStore, TokenService},
    config::AppConfig,
    observability::init_logging,
    startup::run_startup_tasks,
    storage::{create_pool, AuditLogRepository, CollegeRecordRepository},
    Result, APP_NAME, VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (optional - won't fail if missing).
    // This must happen before any config is read from environment.
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let config = AppConfig::from_env()?;
    init_logging(&config.observability)?;

    info!(
        app_name = APP_NAME,
        version = VERSION,
        address = %config.server.bind_address(),
        "Starting Warden admin service"
    );

    let pool = create_pool(&config.database).await?;
    run_startup_tasks(&config, &pool).await?;

    let signing_keys = Arc::new(SigningKeyStore::from_config(&config.auth));
    let token_service = TokenService::new(signing_keys);
    let credential_store = Arc::new(SqlxCredentialStore::new(pool.clone()));
    let audit_repository = Arc::new(AuditLogRepository::new(pool.clone()));
    let gateway = Arc::new(AuthenticationGateway::new(
        credential_store,
        token_service,
        audit_repository,
    ));
    let colleges = Arc::new(CollegeRecordRepository::new(pool.clone()));

    let state = ApiState { gateway, colleges, pool };
    start_api_server(&config.server, state).await?;

    info!("Warden shutdown completed");
    Ok(())
}
