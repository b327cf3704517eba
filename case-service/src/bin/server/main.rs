use std::sync::Arc;

use auth::TokenService;
use case_service::config::Config;
use case_service::domain::access::authentication::AuthenticationService;
use case_service::domain::access::gate::AuthorizationGate;
use case_service::domain::assignment::service::AssignmentService;
use case_service::domain::identity::models::EmailAddress;
use case_service::domain::identity::models::NewIdentity;
use case_service::domain::identity::models::Role;
use case_service::domain::identity::models::Username;
use case_service::inbound::http::router::create_router;
use case_service::inbound::http::router::AppState;
use case_service::outbound::repositories::PostgresAssignmentRepository;
use case_service::outbound::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const MIN_SECRET_BYTES: usize = 32;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "case_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "case-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        token_expiration_minutes = config.token.expiration_minutes,
        bootstrap_admin = config.bootstrap_admin.is_some(),
        "Configuration loaded"
    );

    let token_config = config.token.to_token_config()?;
    if token_config.secret_len() < MIN_SECRET_BYTES {
        tracing::warn!(
            secret_len = token_config.secret_len(),
            minimum = MIN_SECRET_BYTES,
            "Token signing secret is shorter than recommended"
        );
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let tokens = Arc::new(TokenService::with_system_clock(&token_config));
    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool.clone()));
    let assignment_repository = Arc::new(PostgresAssignmentRepository::new(pg_pool));

    let authentication = Arc::new(AuthenticationService::new(
        Arc::clone(&identity_repository),
        config.password.to_hasher()?,
        Arc::clone(&tokens),
    )?);
    let gate = Arc::new(AuthorizationGate::new(
        Arc::clone(&identity_repository),
        Arc::clone(&tokens),
    ));
    let assignments = Arc::new(AssignmentService::new(
        assignment_repository,
        identity_repository,
    ));

    if let Some(admin) = &config.bootstrap_admin {
        let command = NewIdentity::new(
            Username::new(admin.username.clone())?,
            EmailAddress::new(admin.email.clone())?,
            admin.password.clone(),
            Role::Admin,
        );

        match authentication.ensure_identity(command).await? {
            Some(identity) => tracing::info!(
                identity_id = %identity.id,
                username = %identity.username,
                "Bootstrap admin created"
            ),
            None => tracing::info!(
                username = %admin.username,
                "Bootstrap admin already present"
            ),
        }
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(AppState {
        authentication,
        gate,
        assignments,
    });

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
