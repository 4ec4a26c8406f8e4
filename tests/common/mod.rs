use std::{collections::HashMap, net::SocketAddr};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use topten::{AppState, config::Config};

pub const API_KEY: &str = "test-api-key";
pub const ACCESS_TOKEN: &str = "test-access-token";

/// Nothing listens here, so every request fails to connect.
pub const UNREACHABLE_TMDB: &str = "http://127.0.0.1:1";

/// Id for which the stub answers with a body missing every required field.
pub const MALFORMED_ID: i64 = 999;

fn catalog() -> Vec<Value> {
    vec![
        json!({
            "id": 27205,
            "title": "Inception",
            "overview": "Cobb steals secrets from dreams.",
            "poster_path": "/inception.jpg",
            "release_date": "2010-07-15",
        }),
        json!({
            "id": 603,
            "title": "The Matrix",
            "overview": "A hacker learns the truth.",
            "poster_path": "/matrix.jpg",
            "release_date": "1999-03-30",
        }),
        json!({
            "id": 157336,
            "title": "Interstellar",
            "overview": "Explorers travel through a wormhole.",
            "poster_path": "/interstellar.jpg",
            "release_date": "2014-11-05",
        }),
    ]
}

fn authorized(headers: &HeaderMap, params: &HashMap<String, String>) -> bool {
    let bearer = format!("Bearer {ACCESS_TOKEN}");
    headers.get("authorization").is_some_and(|v| v == bearer.as_str())
        && params.get("api_key").is_some_and(|k| k == API_KEY)
}

async fn search(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers, &params) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let query = params.get("query").map(|q| q.to_lowercase()).unwrap_or_default();
    let results: Vec<Value> = catalog()
        .into_iter()
        .filter(|m| m["title"].as_str().is_some_and(|t| t.to_lowercase().contains(&query)))
        .collect();
    Json(json!({ "page": 1, "results": results })).into_response()
}

async fn details(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers, &params) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id == MALFORMED_ID {
        return Json(json!({ "id": id })).into_response();
    }
    match catalog().into_iter().find(|m| m["id"] == id) {
        Some(movie) => Json(movie).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

pub struct TestResponse {
    pub status: u16,
    pub text: String,
    pub location: Option<String>,
}

pub struct TestApp {
    addr: SocketAddr,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let tmdb = Router::new()
            .route("/search/movie", get(search))
            .route("/movie/{id}", get(details));
        let tmdb_addr = spawn(tmdb).await;
        Self::spawn_with_tmdb(format!("http://{tmdb_addr}")).await
    }

    /// Spawns the app against an arbitrary movie database base url.
    pub async fn spawn_with_tmdb(tmdb_base_url: String) -> Self {
        let config = Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "sqlite::memory:".to_string(),
            secret_key: "integration-test-secret".to_string(),
            tmdb_api_key: API_KEY.to_string(),
            tmdb_access_token: ACCESS_TOKEN.to_string(),
            tmdb_base_url,
            tmdb_image_base_url: "https://image.test/t/p/original".to_string(),
        };
        let state = AppState::from_config(config).await.expect("app state");
        let addr = spawn(topten::router(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self { addr, client }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let resp = self.client.get(format!("http://{}{path}", self.addr)).send().await.unwrap();
        TestResponse::read(resp).await
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let resp =
            self.client.post(format!("http://{}{path}", self.addr)).form(form).send().await.unwrap();
        TestResponse::read(resp).await
    }

    /// Loads a form page and returns the token it embeds.
    pub async fn csrf_token(&self, path: &str) -> String {
        let page = self.get(path).await;
        assert_eq!(page.status, 200, "GET {path}: {}", page.text);
        extract_csrf(&page.text)
    }

    pub async fn search(&self, title: &str) -> TestResponse {
        let token = self.csrf_token("/add").await;
        self.post_form("/add", &[("csrf_token", &token), ("title", title)]).await
    }

    /// Selects a TMDB candidate and returns the local id it was stored under.
    pub async fn select(&self, tmdb_id: i64) -> i32 {
        let res = self.get(&format!("/find?id={tmdb_id}")).await;
        assert_eq!(res.status, 303, "select {tmdb_id}: {}", res.text);
        let location = res.location.expect("redirect location");
        location.strip_prefix("/update?id=").expect("redirect to edit").parse().unwrap()
    }

    pub async fn rate(&self, id: i32, rating: &str, review: &str) -> TestResponse {
        let path = format!("/update?id={id}");
        let token = self.csrf_token(&path).await;
        self.post_form(&path, &[("csrf_token", &token), ("rating", rating), ("review", review)])
            .await
    }

    /// `(title, rank)` pairs in the order the home page lists them.
    pub async fn ranked_list(&self) -> Vec<(String, String)> {
        let home = self.get("/").await;
        assert_eq!(home.status, 200, "{}", home.text);
        home.text
            .split("data-title=\"")
            .skip(1)
            .map(|chunk| {
                let title = attr_value(chunk);
                let rank = chunk.split_once("data-rank=\"").map(|(_, rest)| attr_value(rest));
                (title, rank.unwrap_or_default())
            })
            .collect()
    }
}

impl TestResponse {
    async fn read(resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let location = resp
            .headers()
            .get("location")
            .map(|v| v.to_str().unwrap().to_string());
        let text = resp.text().await.unwrap();
        Self { status, text, location }
    }
}

fn attr_value(s: &str) -> String {
    s.split('"').next().unwrap_or_default().to_string()
}

pub fn extract_csrf(html: &str) -> String {
    let (_, rest) = html
        .split_once("name=\"csrf_token\" value=\"")
        .expect("page has a csrf token field");
    attr_value(rest)
}
