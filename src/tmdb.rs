use reqwest::{RequestBuilder, StatusCode, header::ACCEPT};
use serde::{Deserialize, de::DeserializeOwned};

use crate::models::NewMovie;

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("could not reach the movie database: {0}")]
    Request(reqwest::Error),
    #[error("the movie database answered with status {0}")]
    Status(StatusCode),
    #[error("unexpected response from the movie database: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("the movie database has no release year for \"{title}\"")]
    MissingYear { title: String },
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        // the url carries the api key
        TmdbError::Request(err.without_url())
    }
}

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
    access_token: String,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        image_base_url: String,
        api_key: String,
        access_token: String,
    ) -> Self {
        if api_key.trim().is_empty() && access_token.trim().is_empty() {
            tracing::warn!("no TMDB_API_KEY or TMDB_ACCESS_TOKEN provided; searches will fail");
        }
        Self { client, base_url, image_base_url, api_key, access_token }
    }

    /// Raw search results, in the order TMDB returns them.
    pub async fn search_movie(&self, title: &str) -> Result<Vec<SearchCandidate>, TmdbError> {
        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: SearchResponse = fetch_json(self.get(url).query(&[("query", title)])).await?;
        tracing::debug!(title = %title, results = resp.results.len(), "search complete");
        Ok(resp.results)
    }

    /// Fetches one movie and maps it to an unrated record.
    pub async fn movie_details(&self, tmdb_id: i64) -> Result<NewMovie, TmdbError> {
        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), tmdb_id);
        let details: MovieDetails = fetch_json(self.get(url)).await?;
        details.into_new_movie(&self.image_base_url)
    }

    fn get(&self, url: String) -> RequestBuilder {
        let mut req = self.client.get(url).header(ACCEPT, "application/json");
        if !self.access_token.trim().is_empty() {
            req = req.bearer_auth(&self.access_token);
        }
        if !self.api_key.trim().is_empty() {
            req = req.query(&[("api_key", &self.api_key)]);
        }
        req
    }
}

async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, TmdbError> {
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(TmdbError::Status(status));
    }
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchCandidate>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchCandidate {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
}

impl SearchCandidate {
    pub fn year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(parse_year)
    }
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    title: String,
    overview: String,
    poster_path: Option<String>,
    release_date: Option<String>,
}

impl MovieDetails {
    fn into_new_movie(self, image_base_url: &str) -> Result<NewMovie, TmdbError> {
        let Some(year) = self.release_date.as_deref().and_then(parse_year) else {
            return Err(TmdbError::MissingYear { title: self.title });
        };
        let img_url =
            self.poster_path.as_deref().map(|p| poster_url(image_base_url, p)).unwrap_or_default();

        Ok(NewMovie { title: self.title, year, description: self.overview, img_url })
    }
}

/// Year from the first four characters of a `YYYY-MM-DD` date.
fn parse_year(date: &str) -> Option<i32> {
    let prefix = date.get(..4)?;
    prefix.bytes().all(|b| b.is_ascii_digit()).then(|| prefix.parse().ok()).flatten()
}

fn poster_url(image_base_url: &str, poster_path: &str) -> String {
    format!("{}/{}", image_base_url.trim_end_matches('/'), poster_path.trim_start_matches('/'))
}
