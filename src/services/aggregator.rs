//! Aggregator service for grouping and ranking watch-provider offers

use crate::services::provider_groups::{canonicalize, popularity, BASELINE_POPULARITY};
use crate::types::{MonetizationType, Offer, ProviderAvailability, RawOfferSet};
use indexmap::IndexMap;
use std::cmp::Reverse;

/// Folds raw per-country offers into one record per canonical provider group.
///
/// Offers may be ingested from several [`RawOfferSet`]s; re-ingesting the
/// same data never duplicates a variant, a country or a monetization class.
pub struct ProviderAggregator {
    home_country: String,
    groups: IndexMap<String, ProviderAvailability>,
    skipped: usize,
}

impl ProviderAggregator {
    pub fn new(home_country: &str) -> Self {
        Self {
            home_country: home_country.trim().to_ascii_uppercase(),
            groups: IndexMap::new(),
            skipped: 0,
        }
    }

    /// Aggregate one offer set and return the ranked groups
    pub fn aggregate(raw: &RawOfferSet, home_country: &str) -> Vec<ProviderAvailability> {
        let mut aggregator = Self::new(home_country);
        aggregator.ingest(raw);
        aggregator.finish()
    }

    /// Merge every valid offer of `raw` into the running groups
    pub fn ingest(&mut self, raw: &RawOfferSet) {
        for (country, offers) in raw.iter() {
            for class in MonetizationType::ALL {
                for raw_offer in offers.offers(class) {
                    match raw_offer.validate() {
                        Some(offer) => self.record(country, class, &offer),
                        None => {
                            self.skipped += 1;
                            tracing::debug!(
                                country = %country,
                                class = %class,
                                ?raw_offer,
                                "skipping malformed offer"
                            );
                        }
                    }
                }
            }
        }
    }

    fn record(&mut self, country: &str, class: MonetizationType, offer: &Offer) {
        let is_home = country == self.home_country;
        let group_name = canonicalize(&offer.provider_name);

        match self.groups.get_mut(group_name) {
            Some(existing) => existing.absorb(offer, country, class, is_home),
            None => {
                let seeded = ProviderAvailability::seed(group_name, offer, country, class, is_home);
                self.groups.insert(group_name.to_string(), seeded);
            }
        }
    }

    /// Number of offers rejected by validation so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of groups collected so far
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Consume the aggregator and return groups in display order
    pub fn finish(self) -> Vec<ProviderAvailability> {
        let mut result: Vec<ProviderAvailability> = self.groups.into_values().collect();
        rank(&mut result);
        result
    }
}

/// Popularity of a group; an unranked group falls back to its best-ranked
/// raw provider name
pub fn group_popularity(provider: &ProviderAvailability) -> u32 {
    let score = popularity(&provider.group_name);
    if score != BASELINE_POPULARITY {
        return score;
    }
    provider
        .variants
        .iter()
        .map(|name| popularity(name))
        .max()
        .unwrap_or(BASELINE_POPULARITY)
}

/// Sort for display: home region first, then popularity (descending), then
/// group name (case-insensitive, byte order breaking ties)
pub fn rank(providers: &mut [ProviderAvailability]) {
    providers.sort_by_cached_key(|p| {
        (
            Reverse(p.available_in_home_region),
            Reverse(group_popularity(p)),
            p.group_name.to_lowercase(),
            p.group_name.clone(),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AvailabilityBadge, RawOffer};
    use serde_json::json;

    fn make_set(entries: &[(&str, MonetizationType, u64, &str)]) -> RawOfferSet {
        let mut set = RawOfferSet::new();
        for (country, class, id, name) in entries {
            set.push(country, *class, Offer::new(*id, *name));
        }
        set
    }

    fn names(result: &[ProviderAvailability]) -> Vec<&str> {
        result.iter().map(|p| p.group_name.as_str()).collect()
    }

    use MonetizationType::{Buy, Rent, Stream};

    // ========== Empty input ==========

    #[test]
    fn test_empty_set_yields_empty_result() {
        let result = ProviderAggregator::aggregate(&RawOfferSet::new(), "DE");
        assert!(result.is_empty());
    }

    #[test]
    fn test_country_without_classes_yields_empty_result() {
        let set: RawOfferSet = serde_json::from_value(json!({"DE": {"link": "x"}})).unwrap();
        assert!(ProviderAggregator::aggregate(&set, "DE").is_empty());
    }

    // ========== Merging ==========

    #[test]
    fn test_variants_across_countries_merge() {
        let set = make_set(&[
            ("DE", Stream, 8, "Netflix basic with Ads"),
            ("US", Stream, 8, "Netflix"),
        ]);

        let result = ProviderAggregator::aggregate(&set, "DE");

        assert_eq!(result.len(), 1);
        let netflix = &result[0];
        assert_eq!(netflix.group_name, "Netflix");
        assert_eq!(
            netflix.variants.iter().collect::<Vec<_>>(),
            vec!["Netflix basic with Ads", "Netflix"]
        );
        assert_eq!(netflix.countries.iter().collect::<Vec<_>>(), vec!["DE", "US"]);
        assert!(netflix.available_in_home_region);
        assert_eq!(netflix.representative_offer.provider_name, "Netflix basic with Ads");
    }

    #[test]
    fn test_classes_collected_per_country() {
        let set = make_set(&[
            ("DE", Rent, 2, "Apple TV"),
            ("DE", Buy, 2, "Apple TV"),
            ("US", Buy, 2, "Apple TV"),
        ]);

        let result = ProviderAggregator::aggregate(&set, "DE");

        let apple = &result[0];
        assert_eq!(apple.group_name, "Apple TV Plus");
        assert!(apple.has_type_in("DE", Rent));
        assert!(apple.has_type_in("DE", Buy));
        assert!(!apple.has_type_in("DE", Stream));
        assert_eq!(apple.types_by_country["US"].len(), 1);
    }

    #[test]
    fn test_duplicate_offer_in_one_list_not_duplicated() {
        let set = make_set(&[
            ("DE", Stream, 8, "Netflix"),
            ("DE", Stream, 8, "Netflix"),
        ]);

        let result = ProviderAggregator::aggregate(&set, "DE");

        assert_eq!(result[0].variants.len(), 1);
        assert_eq!(result[0].countries.len(), 1);
        assert_eq!(result[0].types_by_country["DE"].len(), 1);
    }

    #[test]
    fn test_ingest_twice_is_idempotent() {
        let set = make_set(&[
            ("DE", Stream, 8, "Netflix basic with Ads"),
            ("US", Stream, 8, "Netflix"),
            ("US", Rent, 3, "Google Play Movies"),
            ("FR", Buy, 10, "Amazon Video"),
        ]);

        let once = ProviderAggregator::aggregate(&set, "DE");

        let mut aggregator = ProviderAggregator::new("DE");
        aggregator.ingest(&set);
        aggregator.ingest(&set);
        let twice = aggregator.finish();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_home_flag_set_even_when_home_seen_last() {
        let set = make_set(&[
            ("US", Stream, 8, "Netflix"),
            ("GB", Stream, 8, "Netflix"),
            ("DE", Rent, 8, "Netflix basic with Ads"),
        ]);

        let result = ProviderAggregator::aggregate(&set, "DE");

        assert!(result[0].available_in_home_region);
    }

    #[test]
    fn test_home_country_comparison_ignores_case() {
        let set = make_set(&[("DE", Stream, 8, "Netflix")]);
        let result = ProviderAggregator::aggregate(&set, "de");
        assert!(result[0].available_in_home_region);
    }

    #[test]
    fn test_lowercase_country_key_agrees_with_badge() {
        let set: RawOfferSet = serde_json::from_value(json!({
            "de": {"flatrate": [{"provider_id": 8, "provider_name": "Netflix"}]}
        }))
        .unwrap();

        let result = ProviderAggregator::aggregate(&set, "DE");

        let netflix = &result[0];
        assert!(netflix.available_in_home_region);
        assert_eq!(netflix.countries.iter().collect::<Vec<_>>(), vec!["DE"]);
        assert_eq!(netflix.badge("DE", Stream), AvailabilityBadge::Home);
    }

    #[test]
    fn test_colliding_country_keys_keep_all_offers() {
        let set: RawOfferSet = serde_json::from_value(json!({
            "DE": {"flatrate": [{"provider_id": 8, "provider_name": "Netflix"}]},
            " DE": {"rent": [{"provider_id": 2, "provider_name": "Apple TV"}]}
        }))
        .unwrap();

        let result = ProviderAggregator::aggregate(&set, "DE");

        assert_eq!(names(&result), vec!["Netflix", "Apple TV Plus"]);
        assert!(result.iter().all(|p| p.available_in_home_region));
    }

    // ========== Malformed offers ==========

    #[test]
    fn test_malformed_offer_skipped_rest_aggregates() {
        let set: RawOfferSet = serde_json::from_value(json!({
            "DE": {
                "flatrate": [
                    {"provider_id": null, "provider_name": "X"},
                    {"provider_id": 8, "provider_name": "Netflix"},
                    "garbage",
                    {"provider_id": 337}
                ]
            }
        }))
        .unwrap();

        let mut aggregator = ProviderAggregator::new("DE");
        aggregator.ingest(&set);
        assert_eq!(aggregator.skipped(), 3);
        assert_eq!(aggregator.group_count(), 1);

        let result = aggregator.finish();
        assert_eq!(names(&result), vec!["Netflix"]);
    }

    #[test]
    fn test_raw_offer_without_name_skipped() {
        let mut set = RawOfferSet::new();
        set.push(
            "DE",
            Stream,
            RawOffer {
                provider_id: Some(8),
                ..Default::default()
            },
        );
        assert!(ProviderAggregator::aggregate(&set, "DE").is_empty());
    }

    // ========== Ranking ==========

    #[test]
    fn test_home_region_ranks_first() {
        let set = make_set(&[
            ("US", Stream, 8, "Netflix"),
            ("DE", Buy, 192, "Videobuster"),
        ]);

        let result = ProviderAggregator::aggregate(&set, "DE");

        assert_eq!(names(&result), vec!["Videobuster", "Netflix"]);
    }

    #[test]
    fn test_popularity_ranks_within_home() {
        let set = make_set(&[
            ("DE", Stream, 30, "WOW"),
            ("DE", Stream, 337, "Disney+"),
            ("DE", Stream, 8, "Netflix"),
        ]);

        let result = ProviderAggregator::aggregate(&set, "DE");

        assert_eq!(names(&result), vec!["Netflix", "Disney Plus", "WOW"]);
    }

    #[test]
    fn test_equal_popularity_sorted_by_name() {
        let set = make_set(&[
            ("US", Stream, 501, "zattoo"),
            ("US", Stream, 502, "Mubi"),
            ("US", Stream, 503, "Arte"),
            ("US", Stream, 504, "mubi"),
        ]);

        let result = ProviderAggregator::aggregate(&set, "DE");

        assert_eq!(names(&result), vec!["Arte", "Mubi", "mubi", "zattoo"]);
    }

    #[test]
    fn test_unknown_provider_uses_baseline_and_own_name() {
        let set = make_set(&[
            ("DE", Stream, 500, "Kino on Demand"),
            ("DE", Stream, 340, "Plex"),
        ]);

        let result = ProviderAggregator::aggregate(&set, "DE");

        // Plex (340) outranks the unknown provider (baseline 100)
        assert_eq!(names(&result), vec!["Plex", "Kino on Demand"]);
        assert_eq!(result[1].variants.iter().collect::<Vec<_>>(), vec!["Kino on Demand"]);
    }

    #[test]
    fn test_unranked_group_uses_best_variant_popularity() {
        let mut providers = vec![
            ProviderAvailability::seed("Mubi", &Offer::new(11, "Mubi"), "US", Stream, false),
            ProviderAvailability::seed(
                "Regional Bundle",
                &Offer::new(600, "Regional Bundle"),
                "US",
                Stream,
                false,
            ),
        ];
        providers[1].absorb(&Offer::new(8, "Netflix"), "US", Stream, false);

        assert_eq!(group_popularity(&providers[0]), 100);
        assert_eq!(group_popularity(&providers[1]), 1000);

        rank(&mut providers);
        assert_eq!(names(&providers), vec!["Regional Bundle", "Mubi"]);
    }

    #[test]
    fn test_result_independent_of_country_order() {
        let forward = make_set(&[
            ("DE", Stream, 8, "Netflix basic with Ads"),
            ("US", Stream, 8, "Netflix"),
            ("US", Rent, 2, "Apple TV"),
            ("FR", Buy, 10, "Amazon Video"),
        ]);
        let backward = make_set(&[
            ("FR", Buy, 10, "Amazon Video"),
            ("US", Rent, 2, "Apple TV"),
            ("US", Stream, 8, "Netflix"),
            ("DE", Stream, 8, "Netflix basic with Ads"),
        ]);

        let a = ProviderAggregator::aggregate(&forward, "DE");
        let b = ProviderAggregator::aggregate(&backward, "DE");

        assert_eq!(names(&a), names(&b));
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.available_in_home_region, y.available_in_home_region);
            let mut xc: Vec<_> = x.countries.iter().collect();
            let mut yc: Vec<_> = y.countries.iter().collect();
            xc.sort();
            yc.sort();
            assert_eq!(xc, yc);
        }
    }
}
