//! Free-media finder: which public broadcasters carry a title, per country

use chrono::{Datelike, NaiveDate};
use indexmap::IndexSet;
use rayon::prelude::*;
use serde::Serialize;

use crate::services::broadcasters::{broadcaster, match_broadcasters_for_age, Broadcaster};
use crate::types::MediaType;

/// Countries always probed, whatever the provider data says
pub const ALWAYS_CHECKED: &[&str] = &["DE", "AT", "CH"];

/// Per-country lookup of which broadcasters currently offer a title for free
pub trait BroadcasterProbe: Send + Sync {
    /// Names of broadcasters offering the title in `country`.
    /// Implementations return an empty list on any failure.
    fn available_broadcasters(&self, title: &str, country: &str, media_type: MediaType)
        -> Vec<String>;
}

/// Broadcasters confirmed for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeMediaCountry {
    pub country: String,
    pub broadcasters: Vec<&'static Broadcaster>,
}

pub struct FreeMediaFinder<P: BroadcasterProbe> {
    probe: P,
}

impl<P: BroadcasterProbe> FreeMediaFinder<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Probe every candidate country in parallel and keep confirmed matches.
    ///
    /// Countries without a matching broadcaster are never probed; a failed
    /// probe only drops its own country.
    pub fn find<'a>(
        &self,
        title: &str,
        media_type: MediaType,
        provider_countries: impl IntoIterator<Item = &'a str>,
        age_months: Option<u32>,
    ) -> Vec<FreeMediaCountry> {
        let countries = candidate_countries(provider_countries);

        countries
            .par_iter()
            .filter_map(|country| {
                let candidates =
                    match_broadcasters_for_age(country, media_type.is_series(), age_months);
                if candidates.is_empty() {
                    return None;
                }

                let available = self.probe.available_broadcasters(title, country, media_type);
                let confirmed: Vec<&'static Broadcaster> = candidates
                    .into_iter()
                    .filter(|name| available.iter().any(|a| a == name))
                    .filter_map(broadcaster)
                    .collect();

                tracing::debug!(
                    country = %country,
                    confirmed = confirmed.len(),
                    "free media probe finished"
                );

                (!confirmed.is_empty()).then(|| FreeMediaCountry {
                    country: country.clone(),
                    broadcasters: confirmed,
                })
            })
            .collect()
    }
}

/// Always-checked countries followed by provider countries, deduplicated
pub fn candidate_countries<'a>(provider_countries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut countries: IndexSet<String> = ALWAYS_CHECKED.iter().map(|c| c.to_string()).collect();
    for country in provider_countries {
        countries.insert(country.trim().to_ascii_uppercase());
    }
    countries.into_iter().collect()
}

/// Whole months elapsed from `release` to `today` (0 for future releases)
pub fn age_in_months(release: NaiveDate, today: NaiveDate) -> u32 {
    let mut months = (today.year() - release.year()) * 12 + today.month() as i32
        - release.month() as i32;
    if today.day() < release.day() {
        months -= 1;
    }
    months.max(0) as u32
}
