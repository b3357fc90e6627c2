//! Public broadcaster directory and free-media matcher
//!
//! Static table of public-broadcaster media libraries per country, plus the
//! predicate deciding which of them to surface for a title.

use serde::Serialize;

/// Broadcasters that are shown for movies even though they prefer series
pub const PREFER_SERIES_EXEMPTIONS: &[&str] = &["ZDF Mediathek", "BBC iPlayer"];

/// A public broadcaster media library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Broadcaster {
    pub name: &'static str,
    pub url: &'static str,
    pub search_url: Option<&'static str>,
    /// Countries the library serves
    pub countries: &'static [&'static str],
    /// Mostly carries series; movies are only surfaced when exempted
    pub prefer_tv_shows: bool,
    /// Titles younger than this rarely show up in the library
    pub min_age_months: u32,
    /// Provider id on JustWatch, when it lists the library
    pub justwatch_provider_id: Option<u64>,
}

impl Broadcaster {
    pub fn serves(&self, country: &str) -> bool {
        self.countries
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country))
    }

    pub fn is_exempt(&self) -> bool {
        PREFER_SERIES_EXEMPTIONS.contains(&self.name)
    }

    /// Search link for a title, falling back to the library's front page
    pub fn search_link(&self, title: &str) -> String {
        match self.search_url {
            Some(base) => format!("{}{}", base, urlencoding::encode(title)),
            None => self.url.to_string(),
        }
    }

    fn accepts(&self, country: &str, is_series: bool, age_months: Option<u32>) -> bool {
        self.serves(country)
            && (!self.prefer_tv_shows || is_series || self.is_exempt())
            && age_months.map_or(true, |age| age >= self.min_age_months)
    }
}

pub static BROADCASTERS: &[Broadcaster] = &[
    // Germany
    Broadcaster {
        name: "ARD Mediathek",
        url: "https://www.ardmediathek.de",
        search_url: Some("https://www.ardmediathek.de/suche/"),
        countries: &["DE"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: Some(360),
    },
    Broadcaster {
        name: "ZDF Mediathek",
        url: "https://www.zdf.de",
        search_url: Some("https://www.zdf.de/suche?q="),
        countries: &["DE"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: Some(362),
    },
    Broadcaster {
        name: "Arte Mediathek",
        url: "https://www.arte.tv/de/",
        search_url: Some("https://www.arte.tv/de/search/?q="),
        countries: &["DE", "AT", "CH"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: Some(234),
    },
    Broadcaster {
        name: "3sat Mediathek",
        url: "https://www.3sat.de",
        search_url: Some("https://www.3sat.de/suche?q="),
        countries: &["DE", "AT", "CH"],
        prefer_tv_shows: false,
        min_age_months: 12,
        justwatch_provider_id: Some(513),
    },
    // Austria
    Broadcaster {
        name: "ORF TVthek",
        url: "https://tvthek.orf.at",
        search_url: Some("https://tvthek.orf.at/search?q="),
        countries: &["AT"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: Some(283),
    },
    // Switzerland
    Broadcaster {
        name: "SRF Play",
        url: "https://www.srf.ch/play",
        search_url: Some("https://www.srf.ch/play/suche?q="),
        countries: &["CH"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: Some(457),
    },
    Broadcaster {
        name: "RTS Play",
        url: "https://www.rts.ch/play",
        search_url: Some("https://www.rts.ch/play/recherche?query="),
        countries: &["CH"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // United Kingdom
    Broadcaster {
        name: "BBC iPlayer",
        url: "https://www.bbc.co.uk/iplayer",
        search_url: Some("https://www.bbc.co.uk/iplayer/search?q="),
        countries: &["GB"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: Some(38),
    },
    Broadcaster {
        name: "ITV Hub",
        url: "https://www.itv.com",
        search_url: Some("https://www.itv.com/hub/search?q="),
        countries: &["GB"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: Some(65),
    },
    Broadcaster {
        name: "Channel 4",
        url: "https://www.channel4.com",
        search_url: Some("https://www.channel4.com/search?q="),
        countries: &["GB"],
        prefer_tv_shows: false,
        min_age_months: 6,
        justwatch_provider_id: Some(103),
    },
    // United States
    Broadcaster {
        name: "PBS",
        url: "https://www.pbs.org/video",
        search_url: Some("https://www.pbs.org/search/?q="),
        countries: &["US"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: Some(209),
    },
    Broadcaster {
        name: "ABC",
        url: "https://abc.com",
        search_url: Some("https://abc.com/search?q="),
        countries: &["US"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // France
    Broadcaster {
        name: "France.tv",
        url: "https://www.france.tv",
        search_url: Some("https://www.france.tv/recherche/?q="),
        countries: &["FR"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: Some(263),
    },
    Broadcaster {
        name: "Arte (FR)",
        url: "https://www.arte.tv/fr/",
        search_url: Some("https://www.arte.tv/fr/search/?q="),
        countries: &["FR"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: Some(234),
    },
    // Spain
    Broadcaster {
        name: "RTVE Play",
        url: "https://www.rtve.es/play/",
        search_url: Some("https://www.rtve.es/play/buscador/?q="),
        countries: &["ES"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // Italy
    Broadcaster {
        name: "RaiPlay",
        url: "https://www.raiplay.it",
        search_url: Some("https://www.raiplay.it/ricerca?q="),
        countries: &["IT"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // Netherlands
    Broadcaster {
        name: "NPO Start",
        url: "https://www.npostart.nl",
        search_url: Some("https://www.npostart.nl/zoeken?query="),
        countries: &["NL"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // Belgium
    Broadcaster {
        name: "VRT MAX",
        url: "https://www.vrt.be/vrtmax/",
        search_url: Some("https://www.vrt.be/vrtmax/zoeken/?q="),
        countries: &["BE"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // Nordics
    Broadcaster {
        name: "SVT Play",
        url: "https://www.svtplay.se",
        search_url: Some("https://www.svtplay.se/sok?q="),
        countries: &["SE"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    Broadcaster {
        name: "NRK TV",
        url: "https://tv.nrk.no",
        search_url: Some("https://tv.nrk.no/sok?q="),
        countries: &["NO"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    Broadcaster {
        name: "DR TV",
        url: "https://www.dr.dk/drtv",
        search_url: Some("https://www.dr.dk/drtv/search?q="),
        countries: &["DK"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    Broadcaster {
        name: "Yle Areena",
        url: "https://areena.yle.fi",
        search_url: Some("https://areena.yle.fi/tv/haku?query="),
        countries: &["FI"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // Poland
    Broadcaster {
        name: "TVP VOD",
        url: "https://vod.tvp.pl",
        search_url: Some("https://vod.tvp.pl/search?q="),
        countries: &["PL"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // Australia
    Broadcaster {
        name: "ABC iView",
        url: "https://iview.abc.net.au",
        search_url: Some("https://iview.abc.net.au/search?query="),
        countries: &["AU"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    Broadcaster {
        name: "SBS On Demand",
        url: "https://www.sbs.com.au/ondemand",
        search_url: Some("https://www.sbs.com.au/ondemand/search?query="),
        countries: &["AU"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // Canada
    Broadcaster {
        name: "CBC Gem",
        url: "https://gem.cbc.ca",
        search_url: Some("https://gem.cbc.ca/search?q="),
        countries: &["CA"],
        prefer_tv_shows: false,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
    // Japan
    Broadcaster {
        name: "NHK Plus",
        url: "https://plus.nhk.jp",
        search_url: Some("https://plus.nhk.jp/search?q="),
        countries: &["JP"],
        prefer_tv_shows: true,
        min_age_months: 0,
        justwatch_provider_id: None,
    },
];

/// Look up a broadcaster by its exact name
pub fn broadcaster(name: &str) -> Option<&'static Broadcaster> {
    BROADCASTERS.iter().find(|b| b.name == name)
}

/// Every broadcaster serving `country`, in table order
pub fn serving(country: &str) -> impl Iterator<Item = &'static Broadcaster> + '_ {
    BROADCASTERS.iter().filter(move |b| b.serves(country))
}

/// Names of broadcasters to surface for a country and content kind
pub fn match_broadcasters(country: &str, is_series: bool) -> Vec<&'static str> {
    match_broadcasters_for_age(country, is_series, None)
}

/// Like [`match_broadcasters`], additionally dropping libraries whose
/// minimum title age exceeds `age_months` when the age is known
pub fn match_broadcasters_for_age(
    country: &str,
    is_series: bool,
    age_months: Option<u32>,
) -> Vec<&'static str> {
    matching_in(BROADCASTERS, country, is_series, age_months)
        .map(|b| b.name)
        .collect()
}

fn matching_in<'a>(
    table: &'a [Broadcaster],
    country: &'a str,
    is_series: bool,
    age_months: Option<u32>,
) -> impl Iterator<Item = &'a Broadcaster> + 'a {
    table
        .iter()
        .filter(move |b| b.accepts(country, is_series, age_months))
}
