//! Display names for the countries the provider reports on

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("DE", "Germany"),
    ("US", "United States"),
    ("GB", "United Kingdom"),
    ("FR", "France"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("ES", "Spain"),
    ("IT", "Italy"),
    ("BR", "Brazil"),
    ("MX", "Mexico"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("IN", "India"),
    ("AT", "Austria"),
    ("CH", "Switzerland"),
    ("NL", "Netherlands"),
    ("BE", "Belgium"),
    ("SE", "Sweden"),
    ("NO", "Norway"),
    ("DK", "Denmark"),
    ("FI", "Finland"),
    ("PL", "Poland"),
    ("CZ", "Czech Republic"),
    ("PT", "Portugal"),
    ("IE", "Ireland"),
    ("NZ", "New Zealand"),
    ("AR", "Argentina"),
    ("CL", "Chile"),
    ("CO", "Colombia"),
];

/// Country display name; unknown codes are shown as-is
pub fn country_name(code: &str) -> &str {
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}
