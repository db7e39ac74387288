//! State of the discover page: the current criteria snapshot and the
//! candidate list they are applied to.
use tracing::debug;

use crate::filter::{filter_movies, FilterCriteria};
use crate::genres;
use crate::models::Movie;
use crate::presets::QuickFilter;
use crate::tmdb::DiscoverQuery;

#[derive(Debug, Clone, Default)]
pub struct DiscoverSession {
    movies: Vec<Movie>,
    criteria: FilterCriteria,
}

impl DiscoverSession {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            criteria: FilterCriteria::default(),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Swaps in a freshly fetched candidate list; criteria are kept.
    pub fn replace_movies(&mut self, movies: Vec<Movie>) {
        self.movies = movies;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
    }

    /// Replaces all filter fields, e.g. from the filter dialog. Search text is kept.
    pub fn apply_filters(&mut self, filters: FilterCriteria) {
        self.criteria = FilterCriteria {
            search_text: std::mem::take(&mut self.criteria.search_text),
            ..filters
        };
    }

    pub fn apply_quick_filter(&mut self, preset: &QuickFilter) {
        debug!(preset = preset.label, "Applying quick filter");
        self.criteria = preset.apply(&self.criteria);
    }

    pub fn clear_filters(&mut self) {
        self.criteria = self.criteria.cleared();
    }

    /// Remote discovery request for the chosen genres, used to refill the
    /// candidate list. Labels without a catalog code are left out.
    pub fn remote_query(&self) -> DiscoverQuery {
        DiscoverQuery {
            with_genres: genres::codes_for(&self.criteria.genres),
            ..DiscoverQuery::default()
        }
    }

    /// Candidates matching the current criteria, in display order.
    pub fn visible(&self) -> Vec<&Movie> {
        filter_movies(&self.movies, &self.criteria)
    }
}
