use moviematch::error::CatalogError;
use moviematch::filter::{filter_movies, FilterCriteria, SortKey};
use moviematch::genres;
use moviematch::home::{self, HomeTab, HomeView, SECTION_LEN};
use moviematch::liked::{FileStore, LikedSet, LIKED_MOVIES_KEY};
use moviematch::models::{Movie, MovieId, MoviePage, UNKNOWN_YEAR};
use moviematch::search::{SearchDebouncer, SearchStatus};
use moviematch::stats::{liked_movies, list_stats};
use moviematch::tmdb::{CatalogApi, DiscoverQuery, TimeWindow};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeCatalog {
    trending: Vec<Movie>,
    popular: Vec<Movie>,
    by_genre: HashMap<u32, Vec<Movie>>,
    failing: HashSet<&'static str>,
    search_delays: HashMap<String, Duration>,
    key_rejected: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn page(&self, name: &'static str, movies: &[Movie]) -> Result<MoviePage, CatalogError> {
        self.record(name.to_string());
        if self.key_rejected {
            return Err(CatalogError::NotConfigured("Invalid TMDB API key".to_string()));
        }
        if self.failing.contains(name) {
            return Err(CatalogError::Api {
                status: 503,
                message: format!("{name} unavailable"),
            });
        }
        Ok(MoviePage {
            results: movies.to_vec(),
            total_results: movies.len() as u32,
            total_pages: 1,
        })
    }
}

#[async_trait::async_trait]
impl CatalogApi for FakeCatalog {
    async fn search(&self, query: &str, _page: u32) -> Result<MoviePage, CatalogError> {
        self.record(format!("search:{query}"));
        if let Some(delay) = self.search_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.key_rejected {
            return Err(CatalogError::NotConfigured("Invalid TMDB API key".to_string()));
        }
        if self.failing.contains("search") {
            return Err(CatalogError::Timeout);
        }
        let hit = Movie::new(1, format!("{query} movie"), "2020", 7.0);
        Ok(MoviePage {
            results: vec![hit],
            total_results: 1,
            total_pages: 1,
        })
    }

    async fn trending(&self, window: TimeWindow) -> Result<MoviePage, CatalogError> {
        assert_eq!(window, TimeWindow::Week);
        self.page("trending", &self.trending)
    }

    async fn popular(&self) -> Result<MoviePage, CatalogError> {
        self.page("popular", &self.popular)
    }

    async fn top_rated(&self) -> Result<MoviePage, CatalogError> {
        self.page("top_rated", &[])
    }

    async fn discover(&self, query: &DiscoverQuery) -> Result<MoviePage, CatalogError> {
        let code = query.with_genres[0];
        let name = match code {
            genres::ACTION => "action",
            genres::SCIENCE_FICTION => "scifi",
            genres::DRAMA => "drama",
            _ => "discover",
        };
        let movies = self.by_genre.get(&code).cloned().unwrap_or_default();
        self.page(name, &movies)
    }

    async fn movie_details(&self, id: MovieId) -> Result<Movie, CatalogError> {
        Err(CatalogError::NotFound(format!("/movie/{id}")))
    }
}

fn numbered(prefix: &str, start: MovieId, n: usize) -> Vec<Movie> {
    (0..n)
        .map(|i| Movie::new(start + i as MovieId, format!("{prefix} {i}"), "2015", 6.5))
        .collect()
}

fn fixture() -> Vec<Movie> {
    vec![
        Movie::new(1, "The Dark Knight", "2008", 9.0).with_genres(["Action", "Crime"]),
        Movie::new(2, "Gladiator", "2000", 8.5).with_genres(["Action", "Drama"]),
        Movie::new(3, "Casino Royale", "2006", 8.5).with_genres(["Action", "Thriller"]),
        Movie::new(4, "Speed Racer", "2008", 6.1).with_genres(["Action", "Family"]),
        Movie::new(5, "The Departed", "2006", 8.5).with_genres(["Crime", "Drama"]),
    ]
}

fn ids(list: &[&Movie]) -> Vec<MovieId> {
    list.iter().map(|m| m.id).collect()
}

#[test]
fn action_decade_scenario() {
    let movies = fixture();
    let criteria = FilterCriteria {
        genres: vec!["Action".to_string()],
        year_range: (2000, 2010),
        rating_range: (7.0, 10.0),
        sort_by: SortKey::RatingDesc,
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_movies(&movies, &criteria)), vec![1, 2, 3]);
}

#[test]
fn default_criteria_only_reorder() {
    let movies = fixture();
    let out = filter_movies(&movies, &FilterCriteria::default());
    assert_eq!(ids(&out), vec![1, 2, 3, 5, 4]);
}

#[test]
fn rating_outside_range_is_dropped() {
    let mut movies = fixture();
    movies.push(Movie::new(6, "Unknown Year", UNKNOWN_YEAR, 9.9).with_genres(["Action"]));
    let criteria = FilterCriteria {
        rating_range: (6.1, 8.5),
        ..FilterCriteria::default()
    };
    let out = filter_movies(&movies, &criteria);
    assert_eq!(ids(&out), vec![2, 3, 5, 4]);
    assert!(out.iter().all(|m| m.rating >= 6.1 && m.rating <= 8.5));
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_issues_one_search() {
    let fake = Arc::new(FakeCatalog::default());
    let mut debouncer = SearchDebouncer::new(fake.clone());

    debouncer.schedule("a");
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.schedule("ab");
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.schedule("abc");
    assert_eq!(debouncer.current().status, SearchStatus::Pending);

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(fake.calls(), vec!["search:abc".to_string()]);
    let state = debouncer.current();
    assert_eq!(state.status, SearchStatus::Ready);
    assert_eq!(state.query, "abc");
    assert_eq!(state.results[0].title, "abc movie");
}

#[tokio::test(start_paused = true)]
async fn stale_in_flight_result_is_never_applied() {
    let mut fake = FakeCatalog::default();
    fake.search_delays
        .insert("slow".to_string(), Duration::from_secs(2));
    let fake = Arc::new(fake);
    let mut debouncer = SearchDebouncer::new(fake.clone());

    debouncer.schedule("slow");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(fake.calls(), vec!["search:slow".to_string()]);

    debouncer.schedule("fast");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(debouncer.current().query, "fast");

    tokio::time::sleep(Duration::from_secs(5)).await;
    let state = debouncer.current();
    assert_eq!(state.query, "fast");
    assert_eq!(state.results[0].title, "fast movie");
}

#[tokio::test(start_paused = true)]
async fn blank_text_clears_without_a_call() {
    let fake = Arc::new(FakeCatalog::default());
    let mut debouncer = SearchDebouncer::new(fake.clone());

    debouncer.schedule("alien");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(debouncer.current().results.len(), 1);

    debouncer.schedule("   ");
    let state = debouncer.current();
    assert_eq!(state.status, SearchStatus::Idle);
    assert!(state.results.is_empty());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(fake.calls(), vec!["search:alien".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn failed_or_hung_search_shows_empty_results() {
    let mut fake = FakeCatalog::default();
    fake.failing.insert("search");
    let mut debouncer = SearchDebouncer::new(Arc::new(fake));
    debouncer.schedule("matrix");
    tokio::time::sleep(Duration::from_millis(600)).await;
    let state = debouncer.current();
    assert!(matches!(state.status, SearchStatus::Failed(_)));
    assert!(state.results.is_empty());

    let mut fake = FakeCatalog::default();
    fake.search_delays
        .insert("hang".to_string(), Duration::from_secs(600));
    let mut debouncer =
        SearchDebouncer::new(Arc::new(fake)).with_request_timeout(Duration::from_secs(1));
    debouncer.schedule("hang");
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(
        debouncer.current().status,
        SearchStatus::Failed("request timed out".to_string())
    );
}

#[tokio::test]
async fn home_feed_survives_a_failing_bucket() {
    let mut fake = FakeCatalog {
        trending: numbered("Trending", 100, 20),
        popular: numbered("Popular", 200, 5),
        ..FakeCatalog::default()
    };
    fake.by_genre
        .insert(genres::ACTION, numbered("Action", 300, 3));
    fake.by_genre
        .insert(genres::DRAMA, numbered("Drama", 500, 2));
    fake.failing.insert("scifi");

    let feed = home::load_home_feed(&fake).await.unwrap();
    assert_eq!(feed.trending.len(), SECTION_LEN);
    assert_eq!(feed.featured.as_ref().map(|m| m.id), Some(100));
    assert_eq!(feed.popular.len(), 5);
    assert_eq!(feed.section(HomeTab::Action).len(), 3);
    assert!(feed.section(HomeTab::SciFi).is_empty());
    assert_eq!(feed.section(HomeTab::Drama).len(), 2);
    assert!(!feed.is_empty());

    let mut calls = fake.calls();
    calls.sort();
    assert_eq!(calls, vec!["action", "drama", "popular", "scifi", "trending"]);
}

#[tokio::test]
async fn missing_key_makes_no_calls() {
    assert_eq!(home::load_home(None).await, HomeView::ApiKeyMissing);

    let fake = FakeCatalog::default();
    let catalog: &dyn CatalogApi = &fake;
    match home::load_home(Some(catalog)).await {
        HomeView::Ready(feed) => assert!(feed.is_empty() && feed.featured.is_none()),
        other => panic!("catalog was provided, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_key_blocks_the_home_page() {
    let fake = FakeCatalog {
        key_rejected: true,
        ..FakeCatalog::default()
    };
    let catalog: &dyn CatalogApi = &fake;
    match home::load_home(Some(catalog)).await {
        HomeView::ApiKeyRejected(reason) => assert!(reason.contains("Invalid TMDB API key")),
        other => panic!("expected a blocking state, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn rejected_key_stops_further_searches() {
    let fake = Arc::new(FakeCatalog {
        key_rejected: true,
        ..FakeCatalog::default()
    });
    let mut debouncer = SearchDebouncer::new(fake.clone());

    debouncer.schedule("matrix");
    tokio::time::sleep(Duration::from_millis(600)).await;
    let state = debouncer.current();
    assert!(matches!(state.status, SearchStatus::Rejected(_)));
    assert!(state.results.is_empty());

    debouncer.schedule("alien");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(matches!(debouncer.current().status, SearchStatus::Rejected(_)));
    assert_eq!(fake.calls(), vec!["search:matrix".to_string()]);
}

#[test]
fn liked_list_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let movies = fixture();

    let mut liked = LikedSet::load(FileStore::new(dir.path(), LIKED_MOVIES_KEY));
    assert!(liked.toggle(5).unwrap());
    assert!(liked.toggle(2).unwrap());
    assert!(liked.toggle(42).unwrap());

    let next_session = LikedSet::load(FileStore::new(dir.path(), LIKED_MOVIES_KEY));
    let mine = liked_movies(&movies, &next_session);
    assert_eq!(ids(&mine), vec![2, 5]);

    let stats = list_stats(&mine);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.average_rating, 8.5);
    assert_eq!(stats.genres, vec!["Action", "Drama", "Crime"]);
    assert_eq!(stats.year_span, Some((2000, 2006)));

    std::fs::write(dir.path().join("likedMovies.json"), "[oops").unwrap();
    assert!(LikedSet::load(FileStore::new(dir.path(), LIKED_MOVIES_KEY)).is_empty());
}
