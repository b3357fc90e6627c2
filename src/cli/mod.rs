mod render;

use chrono::Local;
use clap::{Parser, Subcommand};
use serde::Serialize;

use watchfinder::services::free_media::age_in_months;
use watchfinder::services::tmdb::{DETAILS_TTL_SECS, PROVIDERS_TTL_SECS};
use watchfinder::services::{
    match_broadcasters_for_age, FreeMediaCountry, FreeMediaFinder, JustWatchClient, TmdbClient,
};
use watchfinder::types::{Details, MediaType, ProviderAvailability};
use watchfinder::{Config, ProviderAggregator};

/// Find where movies and shows stream, rent or sell
#[derive(Parser)]
#[command(name = "watchfinder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies, shows and people
    Search {
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where a title can be watched
    Details {
        #[arg(value_enum)]
        media_type: MediaType,

        id: u64,

        /// Home country for ranking (overrides config)
        #[arg(long, value_name = "CC")]
        home: Option<String>,

        /// List countries and offer types per provider
        #[arg(long)]
        expand: bool,

        /// Also check public-broadcaster libraries
        #[arg(long)]
        free: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Most popular titles released during the past month
    Releases {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List public broadcasters surfaced for a country
    Broadcasters {
        #[arg(value_name = "CC")]
        country: String,

        /// Content is a series
        #[arg(long)]
        series: bool,

        /// Title age in months
        #[arg(long)]
        age_months: Option<u32>,
    },
}

#[derive(Serialize)]
struct CacheHints {
    details_ttl_secs: u64,
    providers_ttl_secs: u64,
}

/// TMDB logo size used in JSON output
const LOGO_SIZE: &str = "w92";

#[derive(Serialize)]
struct ProviderRow<'a> {
    #[serde(flatten)]
    provider: &'a ProviderAvailability,
    logo_url: Option<String>,
}

impl<'a> ProviderRow<'a> {
    fn new(provider: &'a ProviderAvailability) -> Self {
        Self {
            provider,
            logo_url: provider.representative_offer.logo_url(LOGO_SIZE),
        }
    }
}

#[derive(Serialize)]
struct DetailsReport<'a> {
    details: &'a Details,
    home_country: &'a str,
    providers: Vec<ProviderRow<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    free_media: Option<&'a [FreeMediaCountry]>,
    cache: CacheHints,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Search { query, json } => {
                let config = Config::load()?;
                let items = TmdbClient::new(&config)?.search(&query)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&items)?);
                } else {
                    print!("{}", render::search_results(&items));
                }
                Ok(())
            }
            Commands::Details {
                media_type,
                id,
                home,
                expand,
                free,
                json,
            } => {
                let mut config = Config::load()?;
                if let Some(home) = home {
                    config = config.with_home_country(&home);
                }
                run_details(&config, media_type, id, expand, free, json)
            }
            Commands::Releases { json } => {
                let config = Config::load()?;
                let today = Local::now().date_naive();
                let items = TmdbClient::new(&config)?.new_releases(today)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&items)?);
                } else {
                    print!("{}", render::search_results(&items));
                }
                Ok(())
            }
            Commands::Broadcasters {
                country,
                series,
                age_months,
            } => {
                let country = country.trim().to_ascii_uppercase();
                let names = match_broadcasters_for_age(&country, series, age_months);
                print!("{}", render::broadcaster_list(&country, &names));
                Ok(())
            }
        }
    }
}

fn run_details(
    config: &Config,
    media_type: MediaType,
    id: u64,
    expand: bool,
    free: bool,
    json: bool,
) -> anyhow::Result<()> {
    let title = TmdbClient::new(config)?.fetch_details(media_type, id)?;
    let providers = ProviderAggregator::aggregate(&title.watch_providers, &config.home_country);

    let free_media = if free {
        let today = Local::now().date_naive();
        let age = title.details.release().map(|r| age_in_months(r, today));
        let finder = FreeMediaFinder::new(JustWatchClient::new(config)?);
        Some(finder.find(
            title.details.display_title(),
            media_type,
            title.watch_providers.country_codes(),
            age,
        ))
    } else {
        None
    };

    if json {
        let report = DetailsReport {
            details: &title.details,
            home_country: &config.home_country,
            providers: providers.iter().map(ProviderRow::new).collect(),
            free_media: free_media.as_deref(),
            cache: CacheHints {
                details_ttl_secs: DETAILS_TTL_SECS,
                providers_ttl_secs: PROVIDERS_TTL_SECS,
            },
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", render::details_header(&title.details));
    println!();
    print!(
        "{}",
        render::provider_table(&providers, &config.home_country, expand)
    );
    if let Some(entries) = &free_media {
        println!();
        print!(
            "{}",
            render::free_media(entries, title.details.display_title())
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchfinder::types::{MonetizationType, Offer};

    #[test]
    fn test_provider_row_carries_logo_url() {
        let mut offer = Offer::new(8, "Netflix");
        offer.logo_path = Some("/netflix.jpg".into());
        let provider =
            ProviderAvailability::seed("Netflix", &offer, "DE", MonetizationType::Stream, true);

        let value = serde_json::to_value(ProviderRow::new(&provider)).unwrap();

        assert_eq!(value["group_name"], "Netflix");
        assert_eq!(value["logo_url"], "https://image.tmdb.org/t/p/w92/netflix.jpg");
        assert_eq!(value["available_in_home_region"], true);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["watchfinder"]).is_err());
    }

    #[test]
    fn test_cli_parse_search_json() {
        let cli = Cli::try_parse_from(["watchfinder", "search", "dark", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Search { ref query, json: true } if query == "dark"
        ));
    }

    #[test]
    fn test_cli_parse_details() {
        let cli = Cli::try_parse_from([
            "watchfinder",
            "details",
            "tv",
            "70523",
            "--home",
            "at",
            "--expand",
        ])
        .unwrap();
        match cli.command {
            Commands::Details {
                media_type,
                id,
                home,
                expand,
                free,
                json,
            } => {
                assert_eq!(media_type, MediaType::Tv);
                assert_eq!(id, 70523);
                assert_eq!(home.as_deref(), Some("at"));
                assert!(expand);
                assert!(!free);
                assert!(!json);
            }
            _ => panic!("expected details"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_media_type() {
        assert!(Cli::try_parse_from(["watchfinder", "details", "person", "1"]).is_err());
    }

    #[test]
    fn test_cli_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["watchfinder", "details", "movie", "abc"]).is_err());
    }

    #[test]
    fn test_cli_parse_broadcasters() {
        let cli = Cli::try_parse_from([
            "watchfinder",
            "broadcasters",
            "AT",
            "--series",
            "--age-months",
            "3",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Broadcasters {
                series: true,
                age_months: Some(3),
                ..
            }
        ));
    }
}
