//! Text shown for country fields.
//!
//! This is the one place where a missing value turns into `N/A`; everything
//! before it keeps absence as `None`.

use crate::country::{Country, LatLng};

/// Placeholder for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// `value`, or [`NOT_AVAILABLE`] when it is absent or blank.
#[must_use]
pub fn or_na<S: AsRef<str>>(value: Option<S>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_owned();
    };

    let value = value.as_ref();
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_owned()
    } else {
        value.to_owned()
    }
}

/// `1234567` as `1,234,567`.
#[must_use]
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// Area as `377,930 km²`, with up to three decimals. Unknown or zero areas
/// are not available.
#[must_use]
pub fn area(value: Option<f64>) -> String {
    match value {
        Some(area) if area.is_finite() && area > 0.0 => {
            let rounded = (area * 1000.0).round() / 1000.0;
            let formatted = format!("{rounded:.3}");
            let (whole, fraction) = formatted
                .split_once('.')
                .unwrap_or((formatted.as_str(), ""));
            let fraction = fraction.trim_end_matches('0');

            let whole = whole.parse::<u64>().map_or_else(|_| whole.to_owned(), thousands);

            if fraction.is_empty() {
                format!("{whole} km²")
            } else {
                format!("{whole}.{fraction} km²")
            }
        }
        _ => NOT_AVAILABLE.to_owned(),
    }
}

/// Language names joined by `, `.
#[must_use]
pub fn languages(country: &Country) -> String {
    let names: Vec<&str> = country.language_names().collect();
    or_na((!names.is_empty()).then(|| names.join(", ")))
}

/// Currencies as `Japanese yen (¥)`, joined by `, `.
#[must_use]
pub fn currencies(country: &Country) -> String {
    let currencies = country.currencies.as_ref().map(|currencies| {
        currencies
            .values()
            .map(|currency| match &currency.symbol {
                Some(symbol) => format!("{} ({symbol})", currency.name),
                None => currency.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    });

    or_na(currencies)
}

/// Dialing codes: the root followed by each suffix, e.g. `+81`.
#[must_use]
pub fn calling_codes(country: &Country) -> String {
    let Some(root) = country.idd.as_ref().and_then(|idd| idd.root.as_deref()) else {
        return NOT_AVAILABLE.to_owned();
    };

    let suffixes = country
        .idd
        .as_ref()
        .and_then(|idd| idd.suffixes.as_deref())
        .unwrap_or_default();

    if suffixes.is_empty() {
        return or_na(Some(root));
    }

    suffixes
        .iter()
        .map(|suffix| format!("{root}{suffix}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// What a country card in the list shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryCard {
    /// `cca3` code, used to link to the details.
    pub code: String,
    /// Common name.
    pub name: String,
    /// Flag image URL.
    pub flag_url: String,
    /// Flag alternative text.
    pub flag_alt: String,
    /// First capital.
    pub capital: String,
    /// Region.
    pub region: String,
    /// Population with separators.
    pub population: String,
    /// Language names.
    pub languages: String,
}

impl From<&Country> for CountryCard {
    fn from(country: &Country) -> Self {
        Self {
            code: country.cca3.clone(),
            name: country.name.common.clone(),
            flag_url: country.flags.png.clone(),
            flag_alt: flag_alt(country),
            capital: or_na(country.capital()),
            region: or_na(Some(&country.region)),
            population: thousands(country.population),
            languages: languages(country),
        }
    }
}

/// What the details page shows.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryDetails {
    /// `cca3` code.
    pub code: String,
    /// Common name.
    pub name: String,
    /// Official name.
    pub official_name: String,
    /// Flag image URL.
    pub flag_url: String,
    /// Flag alternative text.
    pub flag_alt: String,
    /// First capital.
    pub capital: String,
    /// `Region / Subregion`.
    pub region: String,
    /// Population with separators.
    pub population: String,
    /// Area in km².
    pub area: String,
    /// Language names.
    pub languages: String,
    /// Currencies with their symbols.
    pub currencies: String,
    /// International dialing codes.
    pub calling_codes: String,
    /// Timezones.
    pub timezones: String,
    /// Codes of the bordering countries, each a link to its details.
    pub borders: Vec<String>,
    /// Map center, when known.
    pub coordinates: Option<LatLng>,
}

impl From<&Country> for CountryDetails {
    fn from(country: &Country) -> Self {
        Self {
            code: country.cca3.clone(),
            name: country.name.common.clone(),
            official_name: or_na(Some(&country.name.official)),
            flag_url: country.flags.svg.clone(),
            flag_alt: flag_alt(country),
            capital: or_na(country.capital()),
            region: format!(
                "{} / {}",
                or_na(Some(&country.region)),
                or_na(country.subregion.as_ref())
            ),
            population: thousands(country.population),
            area: area(country.area),
            languages: languages(country),
            currencies: currencies(country),
            calling_codes: calling_codes(country),
            timezones: or_na(country.timezones.as_ref().map(|zones| zones.join(", "))),
            borders: country.borders().to_vec(),
            coordinates: country.coordinates(),
        }
    }
}

fn flag_alt(country: &Country) -> String {
    country
        .flags
        .alt
        .clone()
        .unwrap_or_else(|| format!("Flag of {}", country.name.common))
}
