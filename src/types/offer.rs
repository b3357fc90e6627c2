//! Raw per-country watch-provider offers as delivered upstream

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// TMDB logo image base
const LOGO_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Monetization class of an offer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MonetizationType {
    /// Subscription streaming (`flatrate` upstream)
    Stream,
    Rent,
    Buy,
}

impl MonetizationType {
    /// All classes in display order
    pub const ALL: [MonetizationType; 3] = [
        MonetizationType::Stream,
        MonetizationType::Rent,
        MonetizationType::Buy,
    ];

    /// Key used for this class in the upstream payload
    pub fn upstream_key(self) -> &'static str {
        match self {
            MonetizationType::Stream => "flatrate",
            MonetizationType::Rent => "rent",
            MonetizationType::Buy => "buy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MonetizationType::Stream => "stream",
            MonetizationType::Rent => "rent",
            MonetizationType::Buy => "buy",
        }
    }
}

impl fmt::Display for MonetizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated offer: one provider in one country under one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: Option<u32>,
}

impl Offer {
    pub fn new(provider_id: u64, provider_name: impl Into<String>) -> Self {
        Self {
            provider_id,
            provider_name: provider_name.into(),
            logo_path: None,
            display_priority: None,
        }
    }

    /// Full logo URL for the given TMDB image size (e.g. "w92")
    pub fn logo_url(&self, size: &str) -> Option<String> {
        self.logo_path
            .as_deref()
            .map(|path| format!("{}/{}{}", LOGO_BASE_URL, size, path))
    }
}

/// An offer exactly as found upstream; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOffer {
    pub provider_id: Option<u64>,
    pub provider_name: Option<String>,
    pub logo_path: Option<String>,
    pub display_priority: Option<u32>,
}

impl RawOffer {
    /// Extract whatever fields are usable; never fails
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            provider_id: obj.get("provider_id").and_then(Value::as_u64),
            provider_name: obj
                .get("provider_name")
                .and_then(Value::as_str)
                .map(String::from),
            logo_path: obj
                .get("logo_path")
                .and_then(Value::as_str)
                .map(String::from),
            display_priority: obj
                .get("display_priority")
                .and_then(Value::as_u64)
                .and_then(|p| u32::try_from(p).ok()),
        }
    }

    /// Validation guard: a usable offer needs a non-zero id and a non-blank name
    pub fn validate(&self) -> Option<Offer> {
        let provider_id = self.provider_id.filter(|id| *id != 0)?;
        let provider_name = self
            .provider_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())?;
        Some(Offer {
            provider_id,
            provider_name: provider_name.to_string(),
            logo_path: self.logo_path.clone(),
            display_priority: self.display_priority,
        })
    }
}

impl From<Offer> for RawOffer {
    fn from(offer: Offer) -> Self {
        Self {
            provider_id: Some(offer.provider_id),
            provider_name: Some(offer.provider_name),
            logo_path: offer.logo_path,
            display_priority: offer.display_priority,
        }
    }
}

/// Offers for a single country, one ordered list per class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryOffers {
    /// Provider deep link for this country
    pub link: Option<String>,
    pub flatrate: Vec<RawOffer>,
    pub rent: Vec<RawOffer>,
    pub buy: Vec<RawOffer>,
}

impl CountryOffers {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let list = |class: MonetizationType| -> Vec<RawOffer> {
            match obj.get(class.upstream_key()) {
                Some(Value::Array(items)) => items.iter().map(RawOffer::from_value).collect(),
                _ => Vec::new(),
            }
        };
        Self {
            link: obj.get("link").and_then(Value::as_str).map(String::from),
            flatrate: list(MonetizationType::Stream),
            rent: list(MonetizationType::Rent),
            buy: list(MonetizationType::Buy),
        }
    }

    pub fn offers(&self, class: MonetizationType) -> &[RawOffer] {
        match class {
            MonetizationType::Stream => &self.flatrate,
            MonetizationType::Rent => &self.rent,
            MonetizationType::Buy => &self.buy,
        }
    }

    pub fn offers_mut(&mut self, class: MonetizationType) -> &mut Vec<RawOffer> {
        match class {
            MonetizationType::Stream => &mut self.flatrate,
            MonetizationType::Rent => &mut self.rent,
            MonetizationType::Buy => &mut self.buy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flatrate.is_empty() && self.rent.is_empty() && self.buy.is_empty()
    }

    /// Append every offer of `other`; the first known link wins
    pub fn merge(&mut self, other: CountryOffers) {
        if self.link.is_none() {
            self.link = other.link;
        }
        self.flatrate.extend(other.flatrate);
        self.rent.extend(other.rent);
        self.buy.extend(other.buy);
    }
}

/// Country codes are stored trimmed and upper-cased; blank codes are dropped
fn normalize_country(country: &str) -> Option<String> {
    let code = country.trim();
    (!code.is_empty()).then(|| code.to_ascii_uppercase())
}

/// Country code → offers for one title.
///
/// Deserialization is lenient: country entries that are not objects are
/// dropped, class values that are not arrays are treated as absent, and
/// malformed offers are kept as empty [`RawOffer`]s for the aggregator's
/// guard to reject. Malformed offer data never fails deserialization.
/// Country codes are stored trimmed and upper-cased, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct RawOfferSet {
    countries: IndexMap<String, CountryOffers>,
}

impl RawOfferSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one offer, creating the country entry on first use
    pub fn push(&mut self, country: &str, class: MonetizationType, offer: impl Into<RawOffer>) {
        let Some(code) = normalize_country(country) else {
            return;
        };
        self.countries
            .entry(code)
            .or_default()
            .offers_mut(class)
            .push(offer.into());
    }

    /// Add a country's offers, merging into any entry already stored under
    /// the same normalized code
    pub fn insert(&mut self, country: &str, offers: CountryOffers) {
        let Some(code) = normalize_country(country) else {
            return;
        };
        self.countries.entry(code).or_default().merge(offers);
    }

    pub fn get(&self, country: &str) -> Option<&CountryOffers> {
        self.countries.get(country.trim().to_ascii_uppercase().as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CountryOffers)> {
        self.countries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn country_codes(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl From<Value> for RawOfferSet {
    fn from(value: Value) -> Self {
        let mut set = RawOfferSet::new();
        let Value::Object(map) = value else {
            if !value.is_null() {
                tracing::debug!("watch providers payload is not an object, ignoring");
            }
            return set;
        };

        for (country, entry) in &map {
            match entry {
                Value::Object(obj) => set.insert(country, CountryOffers::from_object(obj)),
                _ => tracing::debug!(country = %country, "skipping non-object country entry"),
            }
        }
        set
    }
}
