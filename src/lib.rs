pub mod config;
pub mod discover;
pub mod error;
pub mod filter;
pub mod genres;
pub mod home;
pub mod liked;
pub mod models;
pub mod presets;
pub mod search;
pub mod stats;
pub mod tmdb;
