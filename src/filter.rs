//! Client-side filtering and pagination of a fetched country list.
//!
//! The visible page is a pure function of the full list, the [`Criteria`] and
//! the page number. [`Browser`] owns those three values and enforces the paging
//! rules: any filter change resets to page 1 and out-of-range page requests are
//! ignored.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Country;

/// Number of countries shown per page.
pub const PAGE_SIZE: usize = 12;

/// Label of the "no filter" choice in the region and language selectors.
pub const ALL: &str = "All";

/// A world region as reported by the country API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Africa.
    Africa,
    /// North, Central and South America.
    Americas,
    /// Antarctica and its islands.
    Antarctic,
    /// Asia.
    Asia,
    /// Europe.
    Europe,
    /// Oceania.
    Oceania,
}

impl Region {
    /// Every region, in selector order.
    pub const ALL: [Self; 6] = [
        Self::Africa,
        Self::Americas,
        Self::Antarctic,
        Self::Asia,
        Self::Europe,
        Self::Oceania,
    ];

    /// Name used by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Americas => "Americas",
            Self::Antarctic => "Antarctic",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRegion(s.to_owned()))
    }
}

/// Returned when parsing a region name the API doesn't use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown region: {0}")]
pub struct UnknownRegion(pub String);

/// Region criterion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionFilter {
    /// Every region passes.
    #[default]
    All,
    /// Only countries whose region is exactly this one.
    Only(Region),
}

impl RegionFilter {
    /// Parses a selector value; `"All"` and unknown names select every region.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        value.parse().map_or(Self::All, Self::Only)
    }

    /// Value written back to the selector.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Only(region) => region.as_str(),
        }
    }

    fn matches(&self, country: &Country) -> bool {
        match self {
            Self::All => true,
            Self::Only(region) => country.region == region.as_str(),
        }
    }
}

/// Language criterion, matched against language display names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageFilter {
    /// Every language passes.
    #[default]
    All,
    /// Only countries listing this language name, e.g. `English`.
    Only(String),
}

impl LanguageFilter {
    /// Parses a selector value; `"All"` and the empty string select every language.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | ALL => Self::All,
            language => Self::Only(language.to_owned()),
        }
    }

    /// Value written back to the selector.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(language) => language,
        }
    }

    fn matches(&self, country: &Country) -> bool {
        match self {
            Self::All => true,
            Self::Only(language) => country.speaks(language),
        }
    }
}

/// The `(search, region, language)` triple selecting the visible countries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// Case-insensitive substring of the common name; empty matches everything.
    pub search: String,
    /// Region criterion.
    pub region: RegionFilter,
    /// Language criterion.
    pub language: LanguageFilter,
}

impl Criteria {
    /// Whether `country` passes all three criteria.
    #[must_use]
    pub fn matches(&self, country: &Country) -> bool {
        self.matcher()(country)
    }

    /// Whether these criteria let every country through.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.region == RegionFilter::All
            && self.language == LanguageFilter::All
    }

    /// Predicate with the search query lowercased once.
    fn matcher(&self) -> impl Fn(&Country) -> bool + '_ {
        let query = self.search.to_lowercase();

        move |country: &Country| {
            self.region.matches(country)
                && self.language.matches(country)
                && (query.is_empty() || country.name.common.to_lowercase().contains(&query))
        }
    }
}

/// The countries of `countries` matching `criteria`, in source order.
///
/// Duplicates in the source are kept.
#[must_use]
pub fn filter<'a>(countries: &'a [Country], criteria: &Criteria) -> Vec<&'a Country> {
    let matches = criteria.matcher();

    countries.iter().filter(|country| matches(*country)).collect()
}

/// Number of pages needed for `count` items; zero when there are none.
#[must_use]
pub const fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Items of the 1-indexed page `page`, clipped to the slice bounds.
///
/// Page `0` and pages past the end are empty.
#[must_use]
pub fn page<T>(items: &[T], page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }

    let start = (page - 1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }

    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Sorted, distinct language names across `countries`, for the language selector.
#[must_use]
pub fn unique_languages(countries: &[Country]) -> Vec<String> {
    countries
        .iter()
        .flat_map(Country::language_names)
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Paging state over a full country list.
///
/// # Example
/// ```rust
/// use country_atlas::filter::{Browser, RegionFilter};
///
/// let mut browser = Browser::new(Vec::new());
/// browser.set_region(RegionFilter::parse("Asia"));
///
/// assert_eq!(browser.current_page(), 1);
/// assert_eq!(browser.total_pages(), 0);
/// assert!(!browser.go_to_page(1));
/// ```
#[derive(Clone, Debug)]
pub struct Browser {
    countries: Vec<Country>,
    criteria: Criteria,
    matching: Vec<usize>,
    current_page: usize,
}

impl Browser {
    /// Creates a browser over `countries` with no filters on page 1.
    #[must_use]
    pub fn new(countries: Vec<Country>) -> Self {
        Self::with_criteria(countries, Criteria::default())
    }

    /// Creates a browser with restored criteria, on page 1.
    #[must_use]
    pub fn with_criteria(countries: Vec<Country>, criteria: Criteria) -> Self {
        let mut browser = Self {
            countries,
            criteria,
            matching: Vec::new(),
            current_page: 1,
        };
        browser.refilter();
        browser
    }

    /// Replaces the full list, e.g. after a fresh fetch.
    pub fn set_countries(&mut self, countries: Vec<Country>) {
        self.countries = countries;
        self.refilter();
    }

    /// Sets the name search.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
        self.refilter();
    }

    /// Sets the region criterion.
    pub fn set_region(&mut self, region: RegionFilter) {
        self.criteria.region = region;
        self.refilter();
    }

    /// Sets the language criterion.
    pub fn set_language(&mut self, language: LanguageFilter) {
        self.criteria.language = language;
        self.refilter();
    }

    /// Moves to `page`, returning `false` without changing anything when it
    /// is outside `1..=total_pages`.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }

        self.current_page = page;
        true
    }

    /// Moves to the next page if there is one.
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    /// Moves to the previous page if there is one.
    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// Countries on the current page.
    #[must_use]
    pub fn visible(&self) -> Vec<&Country> {
        page(&self.matching, self.current_page)
            .iter()
            .map(|&index| &self.countries[index])
            .collect()
    }

    /// Every country matching the criteria, in source order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Country> {
        self.matching
            .iter()
            .map(|&index| &self.countries[index])
            .collect()
    }

    /// Number of countries matching the criteria.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.matching.len()
    }

    /// Number of pages for the current criteria.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.matching.len())
    }

    /// Current 1-indexed page.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Active criteria.
    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// The full, unfiltered list.
    #[must_use]
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Language names offered by the selector.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        unique_languages(&self.countries)
    }

    fn refilter(&mut self) {
        let matches = self.criteria.matcher();

        self.matching = self
            .countries
            .iter()
            .enumerate()
            .filter(|&(_, country)| matches(country))
            .map(|(index, _)| index)
            .collect();
        self.current_page = 1;
    }
}
