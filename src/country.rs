//! Country records as served by the REST Countries API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One nation's public metadata.
///
/// Records are immutable once fetched. A field projection (`?fields=`) leaves
/// most fields out of the payload, so everything except the code and the name
/// decodes to an empty default when absent. Fields the API itself omits for
/// some countries (capital, languages, coordinates...) are `Option`s; turning
/// them into display text is the job of [`crate::display`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-3 code, unique per country.
    pub cca3: String,
    /// Common and official names.
    pub name: CountryName,
    /// Capital cities; absent for a few territories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<Vec<String>>,
    /// Region, e.g. `Asia`.
    #[serde(default)]
    pub region: String,
    /// Subregion, e.g. `Eastern Asia`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
    /// Population count.
    #[serde(default)]
    pub population: u64,
    /// Language code to display name, e.g. `jpn -> Japanese`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<BTreeMap<String, String>>,
    /// Currency code to currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currencies: Option<BTreeMap<String, Currency>>,
    /// Flag images.
    #[serde(default)]
    pub flags: Flags,
    /// `[lat, lng]` pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latlng: Option<Vec<f64>>,
    /// Codes of the bordering countries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<Vec<String>>,
    /// Area in km².
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// Timezones, e.g. `UTC+09:00`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezones: Option<Vec<String>>,
    /// International direct dialing prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idd: Option<Idd>,
    /// Flag emoji.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

/// Common and official names of a country.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryName {
    /// Everyday name, e.g. `Japan`.
    pub common: String,
    /// Official name, e.g. `United States of America`.
    #[serde(default)]
    pub official: String,
}

/// A currency in use in a country.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Currency name, e.g. `Japanese yen`.
    pub name: String,
    /// Currency symbol, e.g. `¥`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Flag image URLs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// PNG flag URL.
    #[serde(default)]
    pub png: String,
    /// SVG flag URL.
    #[serde(default)]
    pub svg: String,
    /// Textual description of the flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// International direct dialing information.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idd {
    /// Root, e.g. `+8`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Suffixes appended to the root, e.g. `["1"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffixes: Option<Vec<String>>,
}

/// A latitude/longitude pair, used to center the map.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Country {
    /// First listed capital, if any.
    #[must_use]
    pub fn capital(&self) -> Option<&str> {
        self.capital
            .as_ref()
            .and_then(|capitals| capitals.first())
            .map(String::as_str)
    }

    /// Language display names, in code order.
    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages
            .iter()
            .flat_map(|languages| languages.values())
            .map(String::as_str)
    }

    /// Whether `language` is one of this country's language display names.
    #[must_use]
    pub fn speaks(&self, language: &str) -> bool {
        self.language_names().any(|name| name == language)
    }

    /// Map coordinates, when the record carries a valid pair.
    #[must_use]
    pub fn coordinates(&self) -> Option<LatLng> {
        match self.latlng.as_deref() {
            Some([lat, lng, ..]) if lat.is_finite() && lng.is_finite() => Some(LatLng {
                lat: *lat,
                lng: *lng,
            }),
            _ => None,
        }
    }

    /// Border country codes; empty when the country has none.
    #[must_use]
    pub fn borders(&self) -> &[String] {
        self.borders.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_projected_payload() {
        let country: Country = serde_json::from_str(
            r#"{"cca3":"JPN","name":{"common":"Japan","official":"Japan"},"region":"Asia"}"#,
        )
        .unwrap();

        assert_eq!(country.cca3, "JPN");
        assert_eq!(country.population, 0);
        assert!(country.capital().is_none());
        assert!(country.coordinates().is_none());
        assert!(country.borders().is_empty());
    }

    #[test]
    fn coordinates_require_two_values() {
        let mut country: Country =
            serde_json::from_str(r#"{"cca3":"JPN","name":{"common":"Japan"}}"#).unwrap();

        country.latlng = Some(vec![36.0]);
        assert!(country.coordinates().is_none());

        country.latlng = Some(vec![36.0, 138.0]);
        assert_eq!(
            country.coordinates(),
            Some(LatLng {
                lat: 36.0,
                lng: 138.0
            })
        );
    }
}
