//! Client-side filtering and ordering of a movie list.
//!
//! [`filter_movies`] is a pure function of its inputs: callers keep the
//! current [`FilterCriteria`] as a plain value and rerun it whenever the
//! list or the criteria change.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Movie;

pub const DEFAULT_YEAR_RANGE: (i32, i32) = (1970, 2024);
pub const DEFAULT_RATING_RANGE: (f32, f32) = (0.0, 10.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    RatingDesc,
    RatingAsc,
    YearDesc,
    YearAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::RatingDesc,
        SortKey::RatingAsc,
        SortKey::YearDesc,
        SortKey::YearAsc,
        SortKey::TitleAsc,
        SortKey::TitleDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::RatingDesc => "rating-desc",
            SortKey::RatingAsc => "rating-asc",
            SortKey::YearDesc => "year-desc",
            SortKey::YearAsc => "year-asc",
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
        }
    }

    /// Human readable label for sort pickers.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::RatingDesc => "Rating (High to Low)",
            SortKey::RatingAsc => "Rating (Low to High)",
            SortKey::YearDesc => "Year (Newest First)",
            SortKey::YearAsc => "Year (Oldest First)",
            SortKey::TitleAsc => "Title (A-Z)",
            SortKey::TitleDesc => "Title (Z-A)",
        }
    }

    fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        match self {
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
            SortKey::RatingAsc => a.rating.total_cmp(&b.rating),
            SortKey::YearDesc => year_key(b).cmp(&year_key(a)),
            SortKey::YearAsc => year_key(a).cmp(&year_key(b)),
            SortKey::TitleAsc => compare_titles(&a.title, &b.title),
            SortKey::TitleDesc => compare_titles(&b.title, &a.title),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| format!("unknown sort key '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Empty means any genre.
    pub genres: Vec<String>,
    /// Inclusive on both ends.
    pub year_range: (i32, i32),
    /// Inclusive on both ends.
    pub rating_range: (f32, f32),
    pub sort_by: SortKey,
    #[serde(default)]
    pub search_text: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            year_range: DEFAULT_YEAR_RANGE,
            rating_range: DEFAULT_RATING_RANGE,
            sort_by: SortKey::default(),
            search_text: String::new(),
        }
    }
}

impl FilterCriteria {
    /// Defaults for every filter field. The search text is kept.
    pub fn cleared(&self) -> Self {
        Self {
            search_text: self.search_text.clone(),
            ..Self::default()
        }
    }

    /// True when the criteria narrow the list beyond the defaults.
    /// Sort order and search text do not count.
    pub fn is_active(&self) -> bool {
        !self.genres.is_empty()
            || self.year_range.0 > DEFAULT_YEAR_RANGE.0
            || self.year_range.1 < DEFAULT_YEAR_RANGE.1
            || self.rating_range.0 > DEFAULT_RATING_RANGE.0
            || self.rating_range.1 < DEFAULT_RATING_RANGE.1
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        let needle = self.search_text.trim().to_lowercase();
        if !needle.is_empty() {
            let in_title = movie.title.to_lowercase().contains(&needle);
            let in_genre = movie
                .genres
                .iter()
                .any(|g| g.to_lowercase().contains(&needle));
            if !in_title && !in_genre {
                return false;
            }
        }

        if !self.genres.is_empty() && !movie.genres.iter().any(|g| self.genres.contains(g)) {
            return false;
        }

        let Some(year) = movie.parsed_year() else {
            return false;
        };
        if year < self.year_range.0 || year > self.year_range.1 {
            return false;
        }

        movie.rating >= self.rating_range.0 && movie.rating <= self.rating_range.1
    }
}

/// Returns the movies satisfying every constraint in `criteria`, ordered by
/// `criteria.sort_by`. Equal keys keep their input order.
pub fn filter_movies<'a>(movies: &'a [Movie], criteria: &FilterCriteria) -> Vec<&'a Movie> {
    let mut out: Vec<&Movie> = movies.iter().filter(|m| criteria.matches(m)).collect();
    // slice::sort_by is stable
    out.sort_by(|a, b| criteria.sort_by.compare(a, b));
    out
}

fn year_key(movie: &Movie) -> i32 {
    movie.parsed_year().unwrap_or(i32::MIN)
}

/// Collation-style title ordering in three levels: base letters (accents
/// and case ignored), then accents, then case with lowercase first.
/// Distinct titles never compare equal.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| lowercase(a).cmp(&lowercase(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn lowercase(s: &str) -> String {
    s.nfd().flat_map(char::to_lowercase).collect()
}
