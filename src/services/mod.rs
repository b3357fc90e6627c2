//! Services for offer aggregation, matching and fetching

pub mod aggregator;
pub mod broadcasters;
pub mod countries;
pub mod free_media;
pub mod justwatch;
pub mod provider_groups;
pub mod tmdb;

pub use aggregator::ProviderAggregator;
pub use broadcasters::{match_broadcasters, match_broadcasters_for_age, Broadcaster};
pub use countries::country_name;
pub use free_media::{BroadcasterProbe, FreeMediaCountry, FreeMediaFinder};
pub use justwatch::JustWatchClient;
pub use provider_groups::{canonicalize, popularity};
pub use tmdb::TmdbClient;
