//! Fixed genre tables.
//!
//! Remote catalog records carry numeric genre codes; the filter dialog works
//! with text labels. Only the codes listed here are translated.
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const ACTION: u32 = 28;
pub const SCIENCE_FICTION: u32 = 878;
pub const DRAMA: u32 = 18;

const GENRE_CODES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

static BY_CODE: Lazy<HashMap<u32, &'static str>> =
    Lazy::new(|| GENRE_CODES.iter().copied().collect());

/// Labels offered by the filter dialog. Every entry is a label from the code
/// table, so a chosen genre can match mapped catalog records.
pub const FILTER_GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Drama",
    "Fantasy",
    "History",
    "Horror",
    "Music",
    "Mystery",
    "Romance",
    "Science Fiction",
    "Thriller",
    "War",
];

pub fn genre_label(code: u32) -> Option<&'static str> {
    BY_CODE.get(&code).copied()
}

/// Reverse lookup, case-insensitive.
pub fn genre_code(label: &str) -> Option<u32> {
    GENRE_CODES
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(label.trim()))
        .map(|(code, _)| *code)
}

/// Codes for the given labels, for remote genre discovery. Labels with no
/// code are skipped.
pub fn codes_for<S: AsRef<str>>(labels: &[S]) -> Vec<u32> {
    labels.iter().filter_map(|l| genre_code(l.as_ref())).collect()
}

/// Unknown codes keep their decimal form so they still take part in
/// genre matching instead of vanishing.
pub fn labels_for(codes: &[u32]) -> Vec<String> {
    codes
        .iter()
        .map(|c| {
            genre_label(*c)
                .map(str::to_string)
                .unwrap_or_else(|| c.to_string())
        })
        .collect()
}
