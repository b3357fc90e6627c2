//! TMDB client: search, title details with watch providers, new releases
//!
//! Requests are blocking; independent requests run in parallel on rayon.
//! A failed watch-providers request never fails a details lookup.

use chrono::{Months, NaiveDate};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::Config;
use crate::types::{
    Details, MediaType, RawOfferSet, Result, SearchItem, TitleDetails, WatchfinderError,
};

const TMDB_API_URL: &str = "https://api.themoviedb.org/3";

/// Freshness hint for title details (24 hours)
pub const DETAILS_TTL_SECS: u64 = 86_400;

/// Freshness hint for watch providers and search results (1 hour)
pub const PROVIDERS_TTL_SECS: u64 = 3_600;

/// Longest accepted search query, in characters
pub const MAX_QUERY_LEN: usize = 500;

const RELEASES_PER_KIND: usize = 10;
const RELEASES_LIMIT: usize = 12;

/// Blocking TMDB API client
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    region: String,
}

impl TmdbClient {
    /// Build a client; fails when no API key is configured
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| WatchfinderError::Http(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            base_url: TMDB_API_URL.to_string(),
            api_key,
            language: config.language.clone(),
            region: config.region.clone(),
        })
    }

    /// Point the client at a different API root (for testing)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Multi-search across movies, TV shows and people (first page)
    pub fn search(&self, query: &str) -> Result<Vec<SearchItem>> {
        let query = validate_query(query)?;
        tracing::info!(query, "searching TMDB");

        let body = self.get_json(
            "/search/multi",
            &[
                ("language", self.language.clone()),
                ("query", query.to_string()),
                ("page", "1".to_string()),
            ],
        )?;
        parse_results(body)
    }

    /// Fetch details and watch providers in parallel.
    ///
    /// A details failure is an error; a providers failure is logged and
    /// yields an empty offer set.
    pub fn fetch_details(&self, media_type: MediaType, id: u64) -> Result<TitleDetails> {
        tracing::info!(%media_type, id, "fetching title details");

        let details_path = format!("/{}/{}", media_type.as_path(), id);
        let providers_path = format!("/{}/{}/watch/providers", media_type.as_path(), id);

        let (details, providers) = rayon::join(
            || {
                self.get_json(&details_path, &[("language", self.language.clone())])
                    .and_then(|body| {
                        serde_json::from_value::<Details>(body)
                            .map_err(|e| WatchfinderError::Parse(format!("details: {}", e)))
                    })
            },
            || self.get_json(&providers_path, &[]),
        );

        combine_details(details, providers)
    }

    /// Most popular movies and shows released during the month up to `today`
    pub fn new_releases(&self, today: NaiveDate) -> Result<Vec<SearchItem>> {
        let (from, to) = release_window(today);
        let (from, to) = (from.to_string(), to.to_string());

        let (movies, tv) = rayon::join(
            || {
                self.get_json(
                    "/discover/movie",
                    &[
                        ("language", self.language.clone()),
                        ("region", self.region.clone()),
                        ("sort_by", "popularity.desc".to_string()),
                        ("primary_release_date.gte", from.clone()),
                        ("primary_release_date.lte", to.clone()),
                        ("with_release_type", "3|2".to_string()),
                        ("vote_count.gte", "10".to_string()),
                    ],
                )
                .and_then(parse_results)
            },
            || {
                self.get_json(
                    "/discover/tv",
                    &[
                        ("language", self.language.clone()),
                        ("sort_by", "popularity.desc".to_string()),
                        ("first_air_date.gte", from.clone()),
                        ("first_air_date.lte", to.clone()),
                        ("vote_count.gte", "10".to_string()),
                    ],
                )
                .and_then(parse_results)
            },
        );

        Ok(merge_releases(movies?, tv?))
    }

    fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), path, "TMDB request failed");
            return Err(status_error(status.as_u16(), &body));
        }

        response
            .json::<Value>()
            .map_err(|e| WatchfinderError::Parse(format!("{}: {}", path, e)))
    }
}

/// Trim a search query and reject empty or overlong ones
pub fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(WatchfinderError::InvalidQuery("query is required".into()));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(WatchfinderError::InvalidQuery(format!(
            "query is too long (max {} characters)",
            MAX_QUERY_LEN
        )));
    }
    Ok(trimmed)
}

/// Map a non-success status to an error, using TMDB's `status_message` when present
fn status_error(status: u16, body: &str) -> WatchfinderError {
    match status {
        401 => WatchfinderError::Auth,
        404 => WatchfinderError::NotFound,
        429 => WatchfinderError::RateLimited,
        _ => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| {
                    v.get("status_message")
                        .and_then(Value::as_str)
                        .map(String::from)
                })
                .unwrap_or_else(|| "request failed".to_string());
            WatchfinderError::Upstream { status, message }
        }
    }
}

/// Combine the two halves of a details lookup; providers are optional
pub fn combine_details(details: Result<Details>, providers: Result<Value>) -> Result<TitleDetails> {
    let details = details?;
    let watch_providers = match providers {
        Ok(body) => providers_from_response(body),
        Err(e) => {
            tracing::warn!(id = details.id, error = %e, "watch providers unavailable, continuing without");
            RawOfferSet::new()
        }
    };
    Ok(TitleDetails {
        details,
        watch_providers,
    })
}

/// The watch-providers endpoint nests countries under `results`
fn providers_from_response(mut body: Value) -> RawOfferSet {
    body.get_mut("results")
        .map(Value::take)
        .map(RawOfferSet::from)
        .unwrap_or_default()
}

fn parse_results(body: Value) -> Result<Vec<SearchItem>> {
    let Some(results) = body.get("results").filter(|r| r.is_array()) else {
        return Err(WatchfinderError::Parse(
            "response has no results array".into(),
        ));
    };
    serde_json::from_value(results.clone())
        .map_err(|e| WatchfinderError::Parse(format!("results: {}", e)))
}

/// One month back from `today`, inclusive
fn release_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = today.checked_sub_months(Months::new(1)).unwrap_or(today);
    (from, today)
}

/// Top movies and shows, tagged with their media type, most popular first
pub fn merge_releases(movies: Vec<SearchItem>, tv: Vec<SearchItem>) -> Vec<SearchItem> {
    let tag = |items: Vec<SearchItem>, kind: MediaType| {
        items.into_iter().take(RELEASES_PER_KIND).map(move |mut item| {
            item.media_type = Some(kind.as_path().to_string());
            item
        })
    };

    let mut combined: Vec<SearchItem> = tag(movies, MediaType::Movie)
        .chain(tag(tv, MediaType::Tv))
        .collect();
    combined.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    combined.truncate(RELEASES_LIMIT);
    combined
}
