mod articles;
mod authentication;
mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;

use anyhow::Context;
pub use anyhow::Result;
pub use articles::ArticleService;
pub use authentication::{hash_password_argon2, SessionGate, SESSION_COOKIE};
use axum::{routing::*, Extension, Router};
pub use config::{Cli, Command, Config};
pub use db_helpers::WILDCARD_TAG;
pub use errors::{ArticleError, RequestError};
use handlers::*;
pub use models::{Article, ArticleDraft};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn run_app(app: Router, address: SocketAddr) -> Result<()> {
    info!("listening on {}", address);
    axum::Server::try_bind(&address)
        .with_context(|| format!("Failed to bind {address}"))?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        info!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    } else {
        info!("Database already exists");
    }
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("Failed to connect to {db_url}"))?;
    info!("Running Migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");
    Ok(pool)
}

/// Opens the database, warms the article cache and wires the shared state
/// into the router.
pub async fn build_app(config: &Config) -> Result<Router> {
    let password_hash = config
        .admin_password_hash
        .clone()
        .context("ADMIN_PASSWORD_HASH must be set")?;
    let pool = init_db(&config.database_url).await?;

    let articles = ArticleService::new(pool);
    articles
        .reload()
        .await
        .context("Failed to load articles")?;
    let gate = SessionGate::new(config.admin_username.clone(), password_hash);

    Ok(make_router()
        .layer(Extension(Arc::new(articles)))
        .layer(Extension(Arc::new(gate)))
        .layer(TraceLayer::new_for_http()))
}

pub fn make_router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/check_health", get(alive))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/new", get(new_article_form).post(create_article))
        .route("/search", get(search))
        .route("/search/:tag", get(list_tagged))
        .route("/tag/:tag", get(list_tagged))
        .route("/edit/:url", get(edit_article))
        .route("/save/:url", post(save_article))
        .route("/delete/:url", get(delete_article))
        .route("/:url", get(view_article))
        .fallback(not_found)
}
