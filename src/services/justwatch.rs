//! JustWatch probe for public-broadcaster availability
//!
//! Uses the unofficial JustWatch content API: search the title in one
//! country, take the best hit and check its offers against the broadcaster
//! directory. Failures never escape; they log and report nothing found.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::services::broadcasters::serving;
use crate::services::free_media::BroadcasterProbe;
use crate::types::{MediaType, Result, WatchfinderError};

const JUSTWATCH_API_URL: &str = "https://apis.justwatch.com/content";

/// Hits requested per search; only the first is used
const SEARCH_PAGE_SIZE: u32 = 5;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Monetization types that count as free to watch
const FREE_MONETIZATION: &[&str] = &["flatrate", "free"];

/// One offer of a JustWatch title (minimal fields)
#[derive(Debug, Clone, Deserialize)]
pub struct JustWatchOffer {
    pub provider_id: u64,
    pub monetization_type: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    offers: Vec<JustWatchOffer>,
}

pub struct JustWatchClient {
    client: Client,
    base_url: String,
}

impl JustWatchClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WatchfinderError::Http(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            base_url: JUSTWATCH_API_URL.to_string(),
        })
    }

    /// Point the client at a different API root (for testing)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn probe(&self, title: &str, country: &str, media_type: MediaType) -> Result<Vec<String>> {
        let url = format!(
            "{}/titles/{}/popular",
            self.base_url,
            country.to_ascii_lowercase()
        );
        let body = json!({
            "query": title,
            "content_types": [media_type.justwatch_content_type()],
            "page_size": SEARCH_PAGE_SIZE,
        });

        let response = self.client.post(&url).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(WatchfinderError::Upstream {
                status: status.as_u16(),
                message: "JustWatch search failed".into(),
            });
        }

        let search: SearchResponse = response
            .json()
            .map_err(|e| WatchfinderError::Parse(format!("JustWatch search: {}", e)))?;

        Ok(search
            .items
            .first()
            .map(|hit| broadcasters_with_free_offer(&hit.offers, country))
            .unwrap_or_default())
    }
}

impl BroadcasterProbe for JustWatchClient {
    fn available_broadcasters(
        &self,
        title: &str,
        country: &str,
        media_type: MediaType,
    ) -> Vec<String> {
        match self.probe(title, country, media_type) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(country = %country, error = %e, "JustWatch probe failed");
                Vec::new()
            }
        }
    }
}

/// Directory broadcasters of `country` with a free or flatrate offer
pub fn broadcasters_with_free_offer(offers: &[JustWatchOffer], country: &str) -> Vec<String> {
    serving(country)
        .filter(|b| {
            b.justwatch_provider_id.is_some_and(|id| {
                offers.iter().any(|offer| {
                    offer.provider_id == id
                        && FREE_MONETIZATION.contains(&offer.monetization_type.as_str())
                })
            })
        })
        .map(|b| b.name.to_string())
        .collect()
}
