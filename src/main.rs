use blog_api::{
    AppState, SessionStore,
    auth,
    config::{AppConfig, Env},
    create_router,
    models::User,
    repository::{PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// main
///
/// Entry point: configuration, logging, database, session store, and the
/// HTTP server, initialized in that order.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // Log level defaults can be overridden through RUST_LOG.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blog_api=debug,tower_http=info,axum=trace".into());

    // Pretty output for humans locally, JSON for log aggregation in prod.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: database migration failed");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // Sessions live in process memory; a restart logs everyone out.
    let sessions = Arc::new(SessionStore::new());

    seed_admin(&repo, &config).await;

    let app_state = AppState {
        repo,
        sessions,
        config,
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();

    tracing::info!("Listening on 0.0.0.0:3000");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:3000/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}

/// seed_admin
///
/// Creates the configured staff account on first boot. Without the env vars
/// set, accounts are expected to be provisioned directly in the database.
async fn seed_admin(repo: &RepositoryState, config: &AppConfig) {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        return;
    };

    if repo.get_user_by_username(username).await.is_some() {
        return;
    }

    let password_hash =
        auth::hash_password(password).expect("FATAL: could not hash the admin password");

    let user = User {
        id: Uuid::new_v4(),
        username: username.clone(),
        password_hash,
        is_staff: true,
    };

    if repo.create_user(user).await.is_some() {
        tracing::info!("Seeded staff account '{}'", username);
    }
}
