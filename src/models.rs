use serde::{Deserialize, Serialize};

pub type MovieId = u32;

/// Year sentinel for movies without a usable release date.
pub const UNKNOWN_YEAR: &str = "N/A";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Four-digit year, or [`UNKNOWN_YEAR`].
    pub year: String,
    pub genres: Vec<String>,
    /// 0.0 to 10.0, one decimal.
    pub rating: f32,
    pub poster: String,
    pub backdrop: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_office: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
}

impl Movie {
    /// Minimal record, mostly useful for fixtures and list views.
    pub fn new(id: MovieId, title: impl Into<String>, year: impl Into<String>, rating: f32) -> Self {
        Self {
            id,
            title: title.into(),
            year: year.into(),
            genres: Vec::new(),
            rating,
            poster: String::new(),
            backdrop: String::new(),
            description: String::new(),
            director: None,
            cast: Vec::new(),
            runtime_minutes: None,
            release_date: None,
            budget: None,
            box_office: None,
            trailer: None,
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn parsed_year(&self) -> Option<i32> {
        parse_year(&self.year)
    }
}

/// Reads the leading integer of a year string ("1999", "2010 ", "2004-05").
/// Returns `None` for the sentinel and anything without leading digits.
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let digits: String = trimmed
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(_, c)| c)
        .collect();
    digits.parse().ok()
}

/// One page of catalog results.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MoviePage {
    pub results: Vec<Movie>,
    pub total_results: u32,
    pub total_pages: u32,
}
