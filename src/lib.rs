//! watchfinder: where a movie or show can be streamed, rented or bought
//!
//! The core is [`ProviderAggregator`], which folds per-country watch-provider
//! offers into ranked provider groups. Around it sit the static provider and
//! broadcaster tables, the free-media matcher and blocking fetch clients.

pub mod config;
pub mod services;
pub mod types;

pub use config::Config;
pub use services::ProviderAggregator;
pub use types::{ProviderAvailability, RawOfferSet, Result, WatchfinderError};

/// Aggregate one title's offers into ranked provider groups
pub fn aggregate(raw: &RawOfferSet, home_country: &str) -> Vec<ProviderAvailability> {
    ProviderAggregator::aggregate(raw, home_country)
}
