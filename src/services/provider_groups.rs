//! Provider name canonicalization and popularity ranking
//!
//! Folds brand variants ("Netflix basic with Ads") into one canonical
//! group ("Netflix") and scores groups for display ordering.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Score for providers missing from the popularity table
pub const BASELINE_POPULARITY: u32 = 100;

/// Variant display name → canonical group name
const PROVIDER_GROUPS: &[(&str, &str)] = &[
    ("Netflix basic with Ads", "Netflix"),
    ("Netflix Kids", "Netflix"),
    ("Amazon Video", "Prime Video"),
    ("Amazon Prime Video", "Prime Video"),
    ("Amazon Prime Video with Ads", "Prime Video"),
    ("Prime Video Amazon Channel", "Prime Video"),
    ("Disney+", "Disney Plus"),
    ("Apple TV", "Apple TV Plus"),
    ("Apple TV+", "Apple TV Plus"),
    ("HBO Max", "Max"),
    ("Paramount+", "Paramount Plus"),
    ("Paramount Plus Apple TV Channel", "Paramount Plus"),
    ("Sky Go", "Sky"),
    ("Sky Ticket", "Sky"),
    ("Sky Store", "Sky"),
    ("WOW Presents Plus", "WOW"),
    ("Joyn Plus", "Joyn"),
    ("Google Play Movies", "Google Play"),
    ("YouTube Premium", "YouTube"),
    ("Crunchyroll Amazon Channel", "Crunchyroll"),
    ("iTunes", "Apple iTunes"),
    ("Apple iTunes", "Apple TV"),
];

/// Provider name → popularity score (higher = more popular)
const PROVIDER_POPULARITY: &[(&str, u32)] = &[
    // Global
    ("Netflix", 1000),
    ("Netflix basic with Ads", 1000),
    ("Amazon Prime Video", 950),
    ("Prime Video", 950),
    ("Amazon Video", 950),
    ("Disney Plus", 900),
    ("Disney+", 900),
    ("Apple TV Plus", 850),
    ("Apple TV", 850),
    // Major streaming
    ("HBO Max", 800),
    ("Max", 800),
    ("Paramount Plus", 750),
    ("Paramount+", 750),
    ("Sky", 700),
    ("Sky Go", 700),
    ("WOW", 700),
    ("RTL+", 650),
    ("Joyn", 650),
    ("Joyn Plus", 650),
    // Regional and specialized
    ("MagentaTV", 600),
    ("Crunchyroll", 550),
    ("DAZN", 500),
    ("YouTube", 480),
    ("YouTube Premium", 480),
    ("Rakuten TV", 450),
    ("Apple iTunes", 440),
    ("Google Play", 430),
    ("Google Play Movies", 430),
    ("Microsoft Store", 420),
    ("Chili", 400),
    ("maxdome Store", 390),
    ("Videobuster", 380),
    ("Pantaflix", 370),
    ("Freevee", 360),
    ("Pluto TV", 350),
    ("Plex", 340),
];

static GROUPS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| PROVIDER_GROUPS.iter().copied().collect());

static POPULARITY: LazyLock<HashMap<&'static str, u32>> =
    LazyLock::new(|| PROVIDER_POPULARITY.iter().copied().collect());

/// Canonical group for a provider name; unmapped names are their own group.
///
/// # Examples
/// ```
/// use watchfinder::services::provider_groups::canonicalize;
///
/// assert_eq!(canonicalize("Netflix basic with Ads"), "Netflix");
/// assert_eq!(canonicalize("Mubi"), "Mubi");
/// ```
pub fn canonicalize(provider_name: &str) -> &str {
    GROUPS.get(provider_name).copied().unwrap_or(provider_name)
}

/// Popularity of a name: its group's score, else its own, else the baseline
pub fn popularity(name: &str) -> u32 {
    POPULARITY
        .get(canonicalize(name))
        .or_else(|| POPULARITY.get(name))
        .copied()
        .unwrap_or(BASELINE_POPULARITY)
}
