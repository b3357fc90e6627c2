//! Plain-text rendering for CLI output

use std::fmt::Write;

use watchfinder::services::country_name;
use watchfinder::services::FreeMediaCountry;
use watchfinder::types::{
    AvailabilityBadge, Details, MonetizationType, ProviderAvailability, SearchItem,
};

const NO_AVAILABILITY: &str = "no availability data";

pub fn search_results(items: &[SearchItem]) -> String {
    if items.is_empty() {
        return "no results\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        let kind = item.media_type.as_deref().unwrap_or("?");
        let year = item.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        let _ = writeln!(out, "{:<6} {:>8}  {}{}", kind, item.id, item.display_title(), year);
    }
    out
}

pub fn details_header(details: &Details) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", details.display_title());
    if let Some(year) = details.year() {
        let _ = write!(out, " ({})", year);
    }
    if let Some(score) = details.user_score() {
        let _ = write!(out, "  {}%", score);
    }
    out.push('\n');
    if !details.genres.is_empty() {
        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        let _ = writeln!(out, "{}", genres.join(", "));
    }
    if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
        let _ = writeln!(out, "\n{}", overview);
    }
    out
}

fn badge_cell(badge: AvailabilityBadge, home: &str) -> String {
    match badge {
        AvailabilityBadge::Home => home.to_string(),
        AvailabilityBadge::Elsewhere => "other".to_string(),
        AvailabilityBadge::Unavailable => "-".to_string(),
    }
}

/// Ranked provider table; with `expand`, each row is followed by its
/// per-country breakdown
pub fn provider_table(providers: &[ProviderAvailability], home: &str, expand: bool) -> String {
    if providers.is_empty() {
        return format!("{}\n", NO_AVAILABILITY);
    }

    let width = providers
        .iter()
        .map(|p| p.group_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("provider".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:<6} {:<6} {:<6}",
        "provider",
        "stream",
        "rent",
        "buy",
        width = width
    );

    for p in providers {
        let cells: Vec<String> = MonetizationType::ALL
            .iter()
            .map(|class| badge_cell(p.badge(home, *class), home))
            .collect();
        let _ = writeln!(
            out,
            "{:<width$}  {:<6} {:<6} {:<6}",
            p.group_name,
            cells[0],
            cells[1],
            cells[2],
            width = width
        );

        if expand {
            if p.variants.len() > 1 {
                let variants: Vec<&str> = p.variants.iter().map(String::as_str).collect();
                let _ = writeln!(out, "    includes: {}", variants.join(", "));
            }
            for (country, types) in p.country_breakdown() {
                let labels: Vec<&str> = types.iter().map(|t| t.label()).collect();
                let _ = writeln!(
                    out,
                    "    {:<18} {}",
                    country_name(country),
                    labels.join(", ")
                );
            }
        }
    }
    out
}

pub fn free_media(entries: &[FreeMediaCountry], title: &str) -> String {
    if entries.is_empty() {
        return "no free public-broadcaster offers found\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}", country_name(&entry.country));
        for b in &entry.broadcasters {
            let _ = writeln!(out, "    {:<16} {}", b.name, b.search_link(title));
        }
    }
    out
}

pub fn broadcaster_list(country: &str, names: &[&str]) -> String {
    if names.is_empty() {
        return format!("no public broadcasters for {}\n", country_name(country));
    }
    let mut out = format!("{}\n", country_name(country));
    for name in names {
        let _ = writeln!(out, "    {}", name);
    }
    out
}
