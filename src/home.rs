//! Home page category buckets.
use tracing::{error, info, warn};

use crate::error::CatalogError;
use crate::genres;
use crate::models::{Movie, MoviePage};
use crate::tmdb::{CatalogApi, DiscoverQuery, TimeWindow};

/// Movies shown per bucket.
pub const SECTION_LEN: usize = 12;

/// Shown instead of any remote data when no API key is configured or the
/// configured key is rejected.
pub const API_KEY_SETUP: &str = "\
TMDb API key required.
To browse movies you need a free API key from https://www.themoviedb.org/:
  1. Create an account and open Settings -> API.
  2. Request an API key.
  3. Add it to your .env file:
       TMDB_API_KEY=your_api_key_here
  4. Restart the application.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeTab {
    #[default]
    Trending,
    Popular,
    Action,
    SciFi,
    Drama,
}

impl HomeTab {
    pub const ALL: [HomeTab; 5] = [
        HomeTab::Trending,
        HomeTab::Popular,
        HomeTab::Action,
        HomeTab::SciFi,
        HomeTab::Drama,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HomeTab::Trending => "Trending",
            HomeTab::Popular => "Popular",
            HomeTab::Action => "Action",
            HomeTab::SciFi => "Sci-Fi",
            HomeTab::Drama => "Drama",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFeed {
    pub featured: Option<Movie>,
    pub trending: Vec<Movie>,
    pub popular: Vec<Movie>,
    pub action: Vec<Movie>,
    pub scifi: Vec<Movie>,
    pub drama: Vec<Movie>,
}

impl HomeFeed {
    pub fn section(&self, tab: HomeTab) -> &[Movie] {
        match tab {
            HomeTab::Trending => &self.trending,
            HomeTab::Popular => &self.popular,
            HomeTab::Action => &self.action,
            HomeTab::SciFi => &self.scifi,
            HomeTab::Drama => &self.drama,
        }
    }

    pub fn is_empty(&self) -> bool {
        HomeTab::ALL.iter().all(|t| self.section(*t).is_empty())
    }
}

/// What the home page can show.
#[derive(Debug, Clone, PartialEq)]
pub enum HomeView {
    /// Blocking state: no credential, no remote calls were made.
    ApiKeyMissing,
    /// Blocking state: the catalog refused the credential.
    ApiKeyRejected(String),
    Ready(HomeFeed),
}

/// Home page contents; `None` means no catalog could be configured.
pub async fn load_home(catalog: Option<&dyn CatalogApi>) -> HomeView {
    let Some(catalog) = catalog else {
        return HomeView::ApiKeyMissing;
    };
    match load_home_feed(catalog).await {
        Ok(feed) => HomeView::Ready(feed),
        Err(e) => {
            error!("Catalog rejected the configuration: {}", e);
            HomeView::ApiKeyRejected(e.to_string())
        }
    }
}

/// Fetches every bucket concurrently. A bucket failing for a transient reason
/// is logged and left empty without affecting the others. A configuration
/// error from any bucket fails the whole feed.
pub async fn load_home_feed(catalog: &dyn CatalogApi) -> Result<HomeFeed, CatalogError> {
    let action_query = DiscoverQuery::genre(genres::ACTION);
    let scifi_query = DiscoverQuery::genre(genres::SCIENCE_FICTION);
    let drama_query = DiscoverQuery::genre(genres::DRAMA);

    let (trending, popular, action, scifi, drama) = tokio::join!(
        catalog.trending(TimeWindow::Week),
        catalog.popular(),
        catalog.discover(&action_query),
        catalog.discover(&scifi_query),
        catalog.discover(&drama_query),
    );

    let trending = section("trending", trending)?;
    let feed = HomeFeed {
        featured: trending.first().cloned(),
        trending,
        popular: section("popular", popular)?,
        action: section("action", action)?,
        scifi: section("sci-fi", scifi)?,
        drama: section("drama", drama)?,
    };
    info!(
        trending = feed.trending.len(),
        popular = feed.popular.len(),
        action = feed.action.len(),
        scifi = feed.scifi.len(),
        drama = feed.drama.len(),
        "Home feed loaded"
    );
    Ok(feed)
}

fn section(
    name: &str,
    result: Result<MoviePage, CatalogError>,
) -> Result<Vec<Movie>, CatalogError> {
    match result {
        Ok(page) => Ok(page.results.into_iter().take(SECTION_LEN).collect()),
        Err(e) if e.is_configuration() => Err(e),
        Err(e) => {
            warn!("Failed to load {} movies: {}", name, e);
            Ok(Vec::new())
        }
    }
}
