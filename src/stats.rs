//! Summary figures for the liked list.
use crate::liked::{LikedSet, SlotStore};
use crate::models::Movie;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListStats {
    pub count: usize,
    /// Mean rating to one decimal, 0 for an empty list.
    pub average_rating: f32,
    /// Distinct genres in first-seen order.
    pub genres: Vec<String>,
    /// Oldest and newest parsable year.
    pub year_span: Option<(i32, i32)>,
}

/// The liked movies among `all`, in catalog order.
pub fn liked_movies<'a, S: SlotStore>(all: &'a [Movie], liked: &LikedSet<S>) -> Vec<&'a Movie> {
    all.iter().filter(|m| liked.contains(m.id)).collect()
}

pub fn list_stats(movies: &[&Movie]) -> ListStats {
    if movies.is_empty() {
        return ListStats::default();
    }

    let total: f64 = movies.iter().map(|m| m.rating as f64).sum();
    let average = (total / movies.len() as f64 * 10.0).round() / 10.0;

    let mut genres: Vec<String> = Vec::new();
    for g in movies.iter().flat_map(|m| m.genres.iter()) {
        if !genres.contains(g) {
            genres.push(g.clone());
        }
    }

    let years = movies.iter().filter_map(|m| m.parsed_year());
    let year_span = years.fold(None, |span: Option<(i32, i32)>, y| match span {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    });

    ListStats {
        count: movies.len(),
        average_rating: average as f32,
        genres,
        year_span,
    }
}
