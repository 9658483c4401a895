//! Data structures and types for CineDeck
//!
//! Contains the shared models used across the client, organized by domain:
//! - **Catalog**: movie summaries, movie details and genre categories
//! - **Lists**: the home-screen feeds served by the catalog
//! - **Favorites**: identifiers as persisted by the favorites store

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL for poster and backdrop images
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

// =============================================================================
// Catalog Models
// =============================================================================

/// Movie as it appears in any list endpoint (search, discover, feeds,
/// recommendations). Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
}

impl MovieSummary {
    /// Poster URL at the given size (e.g. "w500"), if the movie has a poster
    pub fn poster_url(&self, size: &str) -> Option<String> {
        self.poster_path.as_deref().map(|p| image_url(size, p))
    }

    /// Backdrop URL at the given size, if the movie has a backdrop
    pub fn backdrop_url(&self, size: &str) -> Option<String> {
        self.backdrop_path.as_deref().map(|p| image_url(size, p))
    }

    /// Identifier in the form used by the favorites store
    pub fn favorite_id(&self) -> String {
        favorite_id(self.id)
    }
}

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] - ⭐ {:.1}", self.title, self.id, self.vote_average)
    }
}

/// Full movie record from the detail endpoint. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
    pub overview: String,
    pub original_language: String,
    /// `None` when the catalog has no date yet (unreleased titles)
    pub release_date: Option<NaiveDate>,
    pub popularity: f64,
    pub vote_count: u32,
}

impl MovieDetail {
    /// The summary part of this detail
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            vote_average: self.vote_average,
        }
    }

    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(
            f,
            "{}{} - {} - ⭐ {:.1} ({} votes)",
            self.title, year_str, self.original_language, self.vote_average, self.vote_count
        )
    }
}

/// Genre used for category discovery
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

// =============================================================================
// Home Feeds
// =============================================================================

/// Curated lists shown on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieList {
    NowPlaying,
    Upcoming,
    TopRated,
    Popular,
}

impl MovieList {
    pub const ALL: [MovieList; 4] = [
        MovieList::NowPlaying,
        MovieList::Upcoming,
        MovieList::TopRated,
        MovieList::Popular,
    ];

    /// Endpoint path relative to the API root
    pub fn path(&self) -> &'static str {
        match self {
            MovieList::NowPlaying => "movie/now_playing",
            MovieList::Upcoming => "movie/upcoming",
            MovieList::TopRated => "movie/top_rated",
            MovieList::Popular => "movie/popular",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MovieList::NowPlaying => "Now Playing",
            MovieList::Upcoming => "Upcoming",
            MovieList::TopRated => "Top Rated",
            MovieList::Popular => "Popular",
        }
    }
}

impl fmt::Display for MovieList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Favorites are stored as decimal id strings ("550")
pub fn favorite_id(id: u64) -> String {
    id.to_string()
}

/// Build an image URL from a size bucket and a catalog image path
pub fn image_url(size: &str, path: &str) -> String {
    format!("{}/{}/{}", IMAGE_BASE_URL, size, path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fight_club() -> MovieDetail {
        MovieDetail {
            id: 550,
            title: "Fight Club".to_string(),
            poster_path: Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg".to_string()),
            backdrop_path: None,
            vote_average: 8.4,
            overview: "A ticking-time-bomb insomniac...".to_string(),
            original_language: "en".to_string(),
            release_date: NaiveDate::from_ymd_opt(1999, 10, 15),
            popularity: 61.4,
            vote_count: 26280,
        }
    }

    #[test]
    fn test_poster_url() {
        let summary = fight_club().summary();
        assert_eq!(
            summary.poster_url("w500").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
        );
        assert!(summary.backdrop_url("w780").is_none());
    }

    #[test]
    fn test_detail_summary_keeps_identity() {
        let detail = fight_club();
        let summary = detail.summary();
        assert_eq!(summary.id, 550);
        assert_eq!(summary.title, "Fight Club");
        assert_eq!(summary.favorite_id(), "550");
    }

    #[test]
    fn test_detail_display() {
        let detail = fight_club();
        assert_eq!(detail.year(), Some(1999));
        let s = detail.to_string();
        assert!(s.contains("Fight Club (1999)"));
        assert!(s.contains("26280 votes"));
    }

    #[test]
    fn test_movie_list_paths() {
        assert_eq!(MovieList::NowPlaying.path(), "movie/now_playing");
        assert_eq!(MovieList::TopRated.path(), "movie/top_rated");
        assert_eq!(MovieList::ALL.len(), 4);
    }
}
