use anyhow::Context;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

mod app;
mod auth;
mod config;
mod dates;
mod error;
mod feed;
mod images;
mod posts;
mod search;
mod social;
mod state;
mod storage;
mod users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "flock=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    sqlx::migrate!("./migrations")
        .run(&app_state.db)
        .await
        .context("run migrations")?;

    let session_store = PostgresStore::new(app_state.db.clone());
    session_store
        .migrate()
        .await
        .context("migrate session store")?;

    // Browser-session cookie by default; login promotes the expiry when
    // "remember" was checked.
    let sessions = SessionManagerLayer::new(session_store)
        .with_secure(app_state.config.session_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnSessionEnd);

    let app = app::build_app(app_state, sessions);
    app::serve(app).await
}
