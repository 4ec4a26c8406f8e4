pub mod config;
pub mod csrf;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod ranking;
pub mod routes;
pub mod store;
pub mod templates;
pub mod tmdb;

use std::{sync::Arc, time::Duration};

use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::{config::Config, store::MovieStore, tmdb::TmdbClient};

#[derive(Clone)]
pub struct AppState {
    pub store: MovieStore,
    pub tmdb: Arc<TmdbClient>,
    pub cookie_key: Key,
}

impl AppState {
    /// Connects and migrates the database and builds the TMDB client.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("topten/0.1")
            .timeout(Duration::from_secs(30))
            .build()?;

        let db = db::connect_and_migrate(&config.database_url).await?;
        let cookie_key = csrf::key_from_secret(&config.secret_key);

        let tmdb = TmdbClient::new(
            http,
            config.tmdb_base_url,
            config.tmdb_image_base_url,
            config.tmdb_api_key,
            config.tmdb_access_token,
        );

        Ok(Self { store: MovieStore::new(db), tmdb: Arc::new(tmdb), cookie_key })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/add", get(routes::add_form).post(routes::add_search))
        .route("/find", get(routes::find))
        .route("/update", get(routes::edit_form).post(routes::edit_submit))
        .route("/delete", get(routes::delete))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
