//! Title metadata types returned by the metadata provider

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::RawOfferSet;

/// Movie or TV show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by TMDB (`movie` / `tv`)
    pub fn as_path(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Content type used by JustWatch (`movie` / `show`)
    pub fn justwatch_content_type(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "show",
        }
    }

    pub fn is_series(self) -> bool {
        matches!(self, MediaType::Tv)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Title details (movie or TV) as returned by the details endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Details {
    pub id: u64,
    /// Movies carry `title`
    #[serde(default)]
    pub title: Option<String>,
    /// TV shows carry `name`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
}

impl Details {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or("Unknown")
    }

    fn date_str(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }

    /// Release year ("2010") from release or first-air date
    pub fn year(&self) -> Option<&str> {
        self.date_str()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }

    pub fn release(&self) -> Option<NaiveDate> {
        self.date_str()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Vote average as a 0-100 score; `None` when unrated
    pub fn user_score(&self) -> Option<u32> {
        self.vote_average
            .filter(|v| *v > 0.0)
            .map(|v| (v * 10.0).round() as u32)
    }
}

/// Details combined with the per-country watch providers
#[derive(Debug, Clone, Default)]
pub struct TitleDetails {
    pub details: Details,
    pub watch_providers: RawOfferSet,
}

/// One hit from multi-search or discover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: u64,
    /// "movie", "tv" or "person"; absent on discover results until tagged
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl SearchItem {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn kind(&self) -> Option<MediaType> {
        match self.media_type.as_deref() {
            Some("movie") => Some(MediaType::Movie),
            Some("tv") => Some(MediaType::Tv),
            _ => None,
        }
    }

    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }
}
