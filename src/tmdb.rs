use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::TmdbSettings;
use crate::error::CatalogError;
use crate::genres;
use crate::models::{Movie, MovieId, MoviePage, UNKNOWN_YEAR};

pub const PLACEHOLDER_IMAGE: &str = "/placeholder-movie.jpg";
pub const NO_DESCRIPTION: &str = "No description available.";
const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";
const LANGUAGE: &str = "en-US";
const MAX_CAST: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Parameters for the genre discovery endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub with_genres: Vec<u32>,
    pub sort_by: String,
    pub page: u32,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            with_genres: Vec::new(),
            sort_by: "popularity.desc".to_string(),
            page: 1,
        }
    }
}

impl DiscoverQuery {
    pub fn genre(code: u32) -> Self {
        Self {
            with_genres: vec![code],
            ..Self::default()
        }
    }
}

/// Remote movie catalog. Every call is a single request: no retries, no caching.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError>;
    async fn trending(&self, window: TimeWindow) -> Result<MoviePage, CatalogError>;
    async fn popular(&self) -> Result<MoviePage, CatalogError>;
    async fn top_rated(&self) -> Result<MoviePage, CatalogError>;
    async fn discover(&self, query: &DiscoverQuery) -> Result<MoviePage, CatalogError>;
    async fn movie_details(&self, id: MovieId) -> Result<Movie, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
}

impl TmdbClient {
    pub fn new(settings: &TmdbSettings) -> Result<Self, CatalogError> {
        if settings.api_key.trim().is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }
        let user_agent = format!("moviematch/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(settings.timeout.min(std::time::Duration::from_secs(5)))
            .timeout(settings.timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            image_base_url: settings.image_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}&language={LANGUAGE}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn fetch_page(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<MoviePage, CatalogError> {
        let url = self.endpoint(path, params);
        let raw: RawPage = self.get_json(path, &url).await?;
        let page = map_page(raw, &self.image_base_url);
        debug!(
            path,
            results = page.results.len(),
            total = page.total_results,
            "Catalog page fetched"
        );
        Ok(page)
    }

    /// `label` names the resource in errors; the URL carries the key and is never logged.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        label: &str,
        url: &str,
    ) -> Result<T, CatalogError> {
        let res = self.client.get(url).send().await.map_err(classify)?;
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(label.to_string()));
        }
        let text = res.text().await.map_err(classify)?;
        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        serde_json::from_str(&text)
            .map_err(|e| CatalogError::Parse(format!("{label}: {e}")))
    }
}

fn classify(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Http(err)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        self.fetch_page(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.max(1).to_string())],
        )
        .await
    }

    async fn trending(&self, window: TimeWindow) -> Result<MoviePage, CatalogError> {
        let path = format!("/trending/movie/{}", window.as_str());
        self.fetch_page(&path, &[]).await
    }

    async fn popular(&self) -> Result<MoviePage, CatalogError> {
        self.fetch_page("/movie/popular", &[("page", "1".to_string())])
            .await
    }

    async fn top_rated(&self) -> Result<MoviePage, CatalogError> {
        self.fetch_page("/movie/top_rated", &[("page", "1".to_string())])
            .await
    }

    async fn discover(&self, query: &DiscoverQuery) -> Result<MoviePage, CatalogError> {
        let mut params = vec![
            ("page", query.page.max(1).to_string()),
            ("sort_by", query.sort_by.clone()),
        ];
        if !query.with_genres.is_empty() {
            let codes = query
                .with_genres
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("with_genres", codes));
        }
        self.fetch_page("/discover/movie", &params).await
    }

    async fn movie_details(&self, id: MovieId) -> Result<Movie, CatalogError> {
        let path = format!("/movie/{id}");
        let url = self.endpoint(&path, &[("append_to_response", "videos,credits".to_string())]);
        let detail: RawDetail = self.get_json(&path, &url).await?;
        Ok(map_detail(detail, &self.image_base_url))
    }
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    results: Vec<RawMovie>,
    #[serde(default)]
    total_results: u32,
    #[serde(default)]
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct RawMovie {
    id: MovieId,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    #[serde(default)]
    vote_average: f64,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    overview: Option<String>,
    runtime: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    id: MovieId,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    vote_average: f64,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    overview: Option<String>,
    runtime: Option<u32>,
    budget: Option<u64>,
    revenue: Option<u64>,
    credits: Option<Credits>,
    videos: Option<Videos>,
}

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    job: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Videos {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    site: String,
    #[serde(rename = "type")]
    video_type: String,
    key: String,
}

fn map_page(raw: RawPage, image_base: &str) -> MoviePage {
    MoviePage {
        results: raw
            .results
            .into_iter()
            .map(|m| map_movie(m, image_base))
            .collect(),
        total_results: raw.total_results,
        total_pages: raw.total_pages,
    }
}

fn map_movie(raw: RawMovie, image_base: &str) -> Movie {
    Movie {
        id: raw.id,
        title: raw.title,
        year: release_year(raw.release_date.as_deref()),
        genres: genres::labels_for(&raw.genre_ids),
        rating: round_rating(raw.vote_average),
        poster: image_url(image_base, raw.poster_path.as_deref(), POSTER_SIZE),
        backdrop: image_url(image_base, raw.backdrop_path.as_deref(), BACKDROP_SIZE),
        description: description(raw.overview),
        director: None,
        cast: Vec::new(),
        runtime_minutes: raw.runtime.filter(|r| *r > 0),
        release_date: raw.release_date.filter(|d| !d.is_empty()),
        budget: None,
        box_office: None,
        trailer: None,
    }
}

fn map_detail(raw: RawDetail, image_base: &str) -> Movie {
    let (cast, directors) = match raw.credits {
        Some(credits) => {
            let cast = credits
                .cast
                .into_iter()
                .take(MAX_CAST)
                .map(|c| c.name)
                .collect::<Vec<_>>();
            let directors = credits
                .crew
                .into_iter()
                .filter(|c| matches!(c.job.as_deref(), Some("Director")))
                .map(|c| c.name)
                .collect::<Vec<_>>();
            (cast, directors)
        }
        None => (Vec::new(), Vec::new()),
    };
    Movie {
        id: raw.id,
        title: raw.title,
        year: release_year(raw.release_date.as_deref()),
        genres: raw.genres.into_iter().map(|g| g.name).collect(),
        rating: round_rating(raw.vote_average),
        poster: image_url(image_base, raw.poster_path.as_deref(), POSTER_SIZE),
        backdrop: image_url(image_base, raw.backdrop_path.as_deref(), BACKDROP_SIZE),
        description: description(raw.overview),
        director: (!directors.is_empty()).then(|| directors.join(", ")),
        cast,
        runtime_minutes: raw.runtime.filter(|r| *r > 0),
        release_date: raw.release_date.filter(|d| !d.is_empty()),
        budget: raw.budget.filter(|b| *b > 0),
        box_office: raw.revenue.filter(|r| *r > 0),
        trailer: raw.videos.as_ref().and_then(select_trailer),
    }
}

/// Year of a `YYYY-MM-DD` date, or the `N/A` sentinel.
pub fn release_year(date: Option<&str>) -> String {
    date.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .map(|d| d.year().to_string())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
}

/// One decimal place, clamped to the 0-10 scale.
pub fn round_rating(vote_average: f64) -> f32 {
    let rounded = (vote_average * 10.0).round() / 10.0;
    rounded.clamp(0.0, 10.0) as f32
}

pub fn image_url(base: &str, path: Option<&str>, size: &str) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{base}/{size}{p}"),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

fn description(overview: Option<String>) -> String {
    overview
        .filter(|o| !o.trim().is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

fn select_trailer(videos: &Videos) -> Option<String> {
    let youtube = |kind: &str| {
        videos
            .results
            .iter()
            .find(|v| v.site.eq_ignore_ascii_case("YouTube") && v.video_type == kind)
    };
    youtube("Trailer")
        .or_else(|| youtube("Teaser"))
        .map(|v| format!("https://www.youtube.com/watch?v={}", v.key))
}
