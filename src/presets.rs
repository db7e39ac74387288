//! Named quick filters that set several criteria fields at once.
use crate::filter::{FilterCriteria, SortKey};

/// A partial [`FilterCriteria`]. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickFilter {
    pub label: &'static str,
    pub description: &'static str,
    pub genres: Option<&'static [&'static str]>,
    pub year_range: Option<(i32, i32)>,
    pub rating_range: Option<(f32, f32)>,
    pub sort_by: Option<SortKey>,
}

impl QuickFilter {
    /// Field-level override of `current`; the last preset applied wins per field.
    pub fn apply(&self, current: &FilterCriteria) -> FilterCriteria {
        FilterCriteria {
            genres: self
                .genres
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .unwrap_or_else(|| current.genres.clone()),
            year_range: self.year_range.unwrap_or(current.year_range),
            rating_range: self.rating_range.unwrap_or(current.rating_range),
            sort_by: self.sort_by.unwrap_or(current.sort_by),
            search_text: current.search_text.clone(),
        }
    }
}

pub const QUICK_FILTERS: &[QuickFilter] = &[
    QuickFilter {
        label: "Action",
        description: "High-octane thrills",
        genres: Some(&["Action"]),
        year_range: None,
        rating_range: None,
        sort_by: Some(SortKey::RatingDesc),
    },
    QuickFilter {
        label: "Top Rated",
        description: "Rated 8 and above",
        genres: None,
        year_range: None,
        rating_range: Some((8.0, 10.0)),
        sort_by: Some(SortKey::RatingDesc),
    },
    QuickFilter {
        label: "Recent",
        description: "Released since 2020",
        genres: None,
        year_range: Some((2020, 2024)),
        rating_range: None,
        sort_by: Some(SortKey::YearDesc),
    },
    QuickFilter {
        label: "Sci-Fi",
        description: "Worlds beyond ours",
        genres: Some(&["Science Fiction"]),
        year_range: None,
        rating_range: None,
        sort_by: Some(SortKey::RatingDesc),
    },
    QuickFilter {
        label: "Classics",
        description: "Timeless favourites",
        genres: None,
        year_range: Some((1970, 1999)),
        rating_range: Some((7.5, 10.0)),
        sort_by: Some(SortKey::YearAsc),
    },
    QuickFilter {
        label: "Drama",
        description: "Stories that stay with you",
        genres: Some(&["Drama"]),
        year_range: None,
        rating_range: None,
        sort_by: Some(SortKey::RatingDesc),
    },
];

pub fn quick_filter(label: &str) -> Option<&'static QuickFilter> {
    QUICK_FILTERS
        .iter()
        .find(|q| q.label.eq_ignore_ascii_case(label.trim()))
}
