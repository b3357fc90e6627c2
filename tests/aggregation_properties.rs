//! Property tests for provider aggregation

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use watchfinder::services::aggregator::group_popularity;
use watchfinder::services::canonicalize;
use watchfinder::types::{MonetizationType, Offer, RawOfferSet};
use watchfinder::{ProviderAggregator, ProviderAvailability};

const COUNTRIES: &[&str] = &["DE", "US", "AT", "FR", "GB"];

const PROVIDERS: &[(u64, &str)] = &[
    (8, "Netflix"),
    (1796, "Netflix basic with Ads"),
    (9, "Amazon Prime Video"),
    (10, "Amazon Video"),
    (2, "Apple TV"),
    (350, "Apple TV+"),
    (337, "Disney+"),
    (3, "Google Play Movies"),
    (2100, "Kanopy"),
    (2101, "kanopy"),
    (192, "YouTube"),
];

type Entry = (usize, usize, usize);

fn entries() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec((0..COUNTRIES.len(), 0..3usize, 0..PROVIDERS.len()), 0..40)
}

fn build(entries: &[Entry]) -> RawOfferSet {
    let mut set = RawOfferSet::new();
    for &(country, class, provider) in entries {
        let (id, name) = PROVIDERS[provider];
        set.push(
            COUNTRIES[country],
            MonetizationType::ALL[class],
            Offer::new(id, name),
        );
    }
    set
}

/// Order-insensitive view of one group
type Membership = (BTreeSet<String>, BTreeMap<String, BTreeSet<MonetizationType>>, bool);

fn membership(result: &[ProviderAvailability]) -> BTreeMap<String, Membership> {
    result
        .iter()
        .map(|p| {
            let types = p
                .types_by_country
                .iter()
                .map(|(c, t)| (c.clone(), t.clone()))
                .collect();
            (
                p.group_name.clone(),
                (
                    p.variants.iter().cloned().collect(),
                    types,
                    p.available_in_home_region,
                ),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_ingesting_twice_changes_nothing(entries in entries()) {
        let set = build(&entries);

        let once = ProviderAggregator::aggregate(&set, "DE");
        let mut aggregator = ProviderAggregator::new("DE");
        aggregator.ingest(&set);
        aggregator.ingest(&set);
        let twice = aggregator.finish();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_membership_independent_of_order(entries in entries()) {
        let mut reversed = entries.clone();
        reversed.reverse();

        let a = ProviderAggregator::aggregate(&build(&entries), "DE");
        let b = ProviderAggregator::aggregate(&build(&reversed), "DE");

        let names_a: Vec<&str> = a.iter().map(|p| p.group_name.as_str()).collect();
        let names_b: Vec<&str> = b.iter().map(|p| p.group_name.as_str()).collect();
        prop_assert_eq!(names_a, names_b);
        prop_assert_eq!(membership(&a), membership(&b));
    }

    #[test]
    fn prop_home_flag_iff_offer_in_home(entries in entries()) {
        let result = ProviderAggregator::aggregate(&build(&entries), "DE");

        for provider in &result {
            let expected = entries.iter().any(|&(country, _, p)| {
                COUNTRIES[country] == "DE" && canonicalize(PROVIDERS[p].1) == provider.group_name
            });
            prop_assert_eq!(provider.available_in_home_region, expected);
        }
    }

    #[test]
    fn prop_groups_unique_and_consistent(entries in entries()) {
        let result = ProviderAggregator::aggregate(&build(&entries), "DE");

        let names: BTreeSet<&str> = result.iter().map(|p| p.group_name.as_str()).collect();
        prop_assert_eq!(names.len(), result.len());
        for provider in &result {
            prop_assert!(!provider.variants.is_empty());
            prop_assert_eq!(provider.countries.len(), provider.types_by_country.len());
            for country in &provider.countries {
                prop_assert!(!provider.types_by_country[country].is_empty());
            }
        }
    }

    #[test]
    fn prop_output_is_ranked(entries in entries()) {
        let result = ProviderAggregator::aggregate(&build(&entries), "DE");

        for pair in result.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key = |p: &ProviderAvailability| {
                (
                    !p.available_in_home_region,
                    u32::MAX - group_popularity(p),
                    p.group_name.to_lowercase(),
                    p.group_name.clone(),
                )
            };
            prop_assert!(key(a) <= key(b));
        }
    }
}
