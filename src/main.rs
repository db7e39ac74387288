use anyhow::{Context, Result};
use dotenvy::dotenv;
use moviematch::config::AppConfig;
use moviematch::error::ConfigError;
use moviematch::home::{self, HomeTab, HomeView};
use moviematch::liked::{FileStore, LikedSet, LIKED_MOVIES_KEY};
use moviematch::models::Movie;
use moviematch::search::{SearchDebouncer, SearchStatus};
use moviematch::stats::{liked_movies, list_stats};
use moviematch::tmdb::{CatalogApi, TmdbClient};
use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_movies(heading: &str, movies: &[Movie]) {
    println!("\n{} ({})", heading, movies.len());
    for m in movies {
        println!("  [{:>7}] {:<45} {:>4}  {:.1}", m.id, m.title, m.year, m.rating);
    }
}

async fn run_search(catalog: Arc<dyn CatalogApi>, config: &AppConfig, text: &str) -> Result<()> {
    let mut debouncer = SearchDebouncer::new(catalog)
        .with_delay(config.search_debounce)
        .with_request_timeout(config.tmdb.timeout);
    let mut rx = debouncer.subscribe();
    debouncer.schedule(text);

    loop {
        let state = rx.borrow_and_update().clone();
        match state.status {
            SearchStatus::Ready => {
                print_movies(&format!("Search '{}'", state.query), &state.results);
                return Ok(());
            }
            SearchStatus::Failed(reason) => {
                warn!("Search failed: {}", reason);
                print_movies(&format!("Search '{}'", state.query), &[]);
                return Ok(());
            }
            SearchStatus::Rejected(reason) => {
                warn!("Search rejected: {}", reason);
                println!("{}", home::API_KEY_SETUP);
                return Ok(());
            }
            SearchStatus::Idle => return Ok(()),
            SearchStatus::Pending => {}
        }
        rx.changed().await.context("search task ended unexpectedly")?;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => Some(config),
        Err(ConfigError::MissingApiKey) => {
            warn!("TMDB_API_KEY missing, remote catalog disabled");
            None
        }
        Err(e) => return Err(e).context("Invalid configuration"),
    };

    let catalog: Option<Arc<dyn CatalogApi>> = match &config {
        Some(config) => {
            info!("Using catalog at {}", config.tmdb.base_url);
            let client: Arc<dyn CatalogApi> = Arc::new(
                TmdbClient::new(&config.tmdb).context("Failed to build TMDB client")?,
            );
            Some(client)
        }
        None => None,
    };

    let query = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if let (Some(catalog), Some(config)) = (&catalog, &config) {
        if !query.trim().is_empty() {
            return run_search(Arc::clone(catalog), config, &query).await;
        }
    }

    let feed = match home::load_home(catalog.as_deref()).await {
        HomeView::ApiKeyMissing | HomeView::ApiKeyRejected(_) => {
            println!("{}", home::API_KEY_SETUP);
            return Ok(());
        }
        HomeView::Ready(feed) => feed,
    };
    if let Some(featured) = &feed.featured {
        println!("Featured: {} ({}) - {}", featured.title, featured.year, featured.description);
    }
    for tab in HomeTab::ALL {
        print_movies(tab.label(), feed.section(tab));
    }

    let data_dir = config
        .as_ref()
        .map(|c| c.data_dir.clone())
        .context("configuration missing")?;
    let liked = LikedSet::load(FileStore::new(&data_dir, LIKED_MOVIES_KEY));
    let shown: Vec<Movie> = HomeTab::ALL
        .iter()
        .flat_map(|t| feed.section(*t).iter().cloned())
        .collect();
    let mut seen = HashSet::new();
    let mine: Vec<&Movie> = liked_movies(&shown, &liked)
        .into_iter()
        .filter(|m| seen.insert(m.id))
        .collect();
    let stats = list_stats(&mine);
    println!(
        "\nMy list: {} liked, {} on screen, average rating {:.1}, {} genres",
        liked.len(),
        stats.count,
        stats.average_rating,
        stats.genres.len()
    );
    Ok(())
}
