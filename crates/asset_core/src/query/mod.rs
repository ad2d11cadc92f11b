//! Filter/sort pipeline deriving the displayed asset list
//!
//! `assets -> substring predicate -> comparator for (key, direction) -> stable sort`
//!
//! Nothing here mutates the catalog; the pipeline returns borrowed views that
//! are recomputed from the current state on every read.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::assets::Asset;

/// Field the visible list is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Display name, case-insensitive
    #[default]
    Name,
    /// Triangle count
    PolyCount,
    /// Creation instant; unreadable timestamps always last
    CreatedAt,
}

/// Ordering direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Orient an ascending comparison result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Text did not name a sort key or direction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSortError {
    /// Unknown key name
    #[error("unknown sort key: {0:?}")]
    Key(String),
    /// Unknown direction name
    #[error("unknown sort direction: {0:?}")]
    Direction(String),
}

impl FromStr for SortKey {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Ok(Self::Name),
            "polycount" | "polys" => Ok(Self::PolyCount),
            "createdat" | "created" | "date" => Ok(Self::CreatedAt),
            _ => Err(ParseSortError::Key(s.to_string())),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ParseSortError::Direction(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::PolyCount => "poly_count",
            Self::CreatedAt => "created_at",
        })
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        })
    }
}

/// Trim and lowercase a raw query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive substring match against name, tags and category
///
/// `needle` must already be normalized; an empty needle matches everything.
pub fn matches_query(asset: &Asset, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

    contains(&asset.name)
        || asset.tags.iter().any(|tag| contains(tag))
        || asset.category.as_deref().is_some_and(contains)
}

/// Assets matching `query`, in catalog order
pub fn filter_assets<'a>(assets: &'a [Asset], query: &str) -> Vec<&'a Asset> {
    let needle = normalize_query(query);
    assets
        .iter()
        .filter(|asset| matches_query(asset, &needle))
        .collect()
}

/// Primary collation key: decomposed, accents stripped, lowercased
///
/// `Éclair` and `eclair` share the key `eclair`.
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare display names the way a reader expects
///
/// Base letters first, ignoring case and accents, so `apple < Éclair < zebra`.
/// Ties fall back to case-folded text, then to the raw text.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn compare_instants(
    a: Option<&DateTime<Utc>>,
    b: Option<&DateTime<Utc>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort of a borrowed asset list
pub fn sort_assets(assets: &mut [&Asset], key: SortKey, direction: SortDirection) {
    match key {
        SortKey::Name => {
            assets.sort_by(|a, b| direction.apply(compare_names(&a.name, &b.name)));
        }
        SortKey::PolyCount => {
            assets.sort_by(|a, b| direction.apply(a.poly_count.cmp(&b.poly_count)));
        }
        SortKey::CreatedAt => {
            // Parse each timestamp once
            let mut keyed: Vec<(Option<DateTime<Utc>>, &Asset)> = assets
                .iter()
                .map(|asset| (asset.created_instant(), *asset))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| compare_instants(a.as_ref(), b.as_ref(), direction));
            for (slot, (_, asset)) in assets.iter_mut().zip(keyed) {
                *slot = asset;
            }
        }
    }
}

/// Full pipeline: filter by `query`, then stable-sort by `key` and `direction`
pub fn visible_assets<'a>(
    assets: &'a [Asset],
    query: &str,
    key: SortKey,
    direction: SortDirection,
) -> Vec<&'a Asset> {
    let mut visible = filter_assets(assets, query);
    sort_assets(&mut visible, key, direction);
    visible
}
