//! Aggregated provider availability

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::BTreeSet;

use super::{MonetizationType, Offer};

/// One canonical provider group and everywhere it can be watched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAvailability {
    /// Canonical group name, unique within one aggregation
    pub group_name: String,
    /// First offer seen for the group; supplies logo and id for display
    pub representative_offer: Offer,
    /// Every raw provider name folded into this group
    pub variants: IndexSet<String>,
    /// Every country with at least one offer for this group
    pub countries: IndexSet<String>,
    pub types_by_country: IndexMap<String, BTreeSet<MonetizationType>>,
    pub available_in_home_region: bool,
}

/// How a monetization class shows up in the table row for a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityBadge {
    /// Offered in the home region
    Home,
    /// Only offered in other regions
    Elsewhere,
    Unavailable,
}

impl ProviderAvailability {
    /// Start a group from its first offer
    pub fn seed(
        group_name: impl Into<String>,
        offer: &Offer,
        country: &str,
        class: MonetizationType,
        is_home: bool,
    ) -> Self {
        let mut variants = IndexSet::new();
        variants.insert(offer.provider_name.clone());
        let mut countries = IndexSet::new();
        countries.insert(country.to_string());
        let mut types_by_country = IndexMap::new();
        types_by_country.insert(country.to_string(), BTreeSet::from([class]));

        Self {
            group_name: group_name.into(),
            representative_offer: offer.clone(),
            variants,
            countries,
            types_by_country,
            available_in_home_region: is_home,
        }
    }

    /// Merge another offer of the same group. Every insert is set-semantic,
    /// and the home flag is only ever raised.
    pub fn absorb(
        &mut self,
        offer: &Offer,
        country: &str,
        class: MonetizationType,
        is_home: bool,
    ) {
        if !self.variants.contains(&offer.provider_name) {
            self.variants.insert(offer.provider_name.clone());
        }
        if !self.countries.contains(country) {
            self.countries.insert(country.to_string());
        }
        self.types_by_country
            .entry(country.to_string())
            .or_default()
            .insert(class);
        if is_home {
            self.available_in_home_region = true;
        }
    }

    pub fn has_type_in(&self, country: &str, class: MonetizationType) -> bool {
        self.types_by_country
            .get(country)
            .is_some_and(|types| types.contains(&class))
    }

    /// True if the class is offered in any country other than `country`
    pub fn has_type_outside(&self, country: &str, class: MonetizationType) -> bool {
        self.types_by_country
            .iter()
            .any(|(c, types)| c != country && types.contains(&class))
    }

    pub fn badge(&self, home: &str, class: MonetizationType) -> AvailabilityBadge {
        if self.has_type_in(home, class) {
            AvailabilityBadge::Home
        } else if self.has_type_outside(home, class) {
            AvailabilityBadge::Elsewhere
        } else {
            AvailabilityBadge::Unavailable
        }
    }

    /// Per-country listing for the expanded detail view, in `countries` order
    pub fn country_breakdown(
        &self,
    ) -> impl Iterator<Item = (&str, &BTreeSet<MonetizationType>)> + '_ {
        self.countries.iter().filter_map(|country| {
            self.types_by_country
                .get(country)
                .map(|types| (country.as_str(), types))
        })
    }
}
