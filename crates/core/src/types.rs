use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog entry kind stored in the `content.content_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    #[serde(rename = "tvshow")]
    TvShow,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::TvShow => "tvshow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "tvshow" => Some(Self::TvShow),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected audio language. `Other` exists for stored legacy rows;
/// detection itself never produces it (English is the fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    French,
    Yoruba,
    Igbo,
    Hausa,
    Pidgin,
    Other,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "French",
            Self::Yoruba => "Yoruba",
            Self::Igbo => "Igbo",
            Self::Hausa => "Hausa",
            Self::Pidgin => "Pidgin",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "English" => Some(Self::English),
            "French" => Some(Self::French),
            "Yoruba" => Some(Self::Yoruba),
            "Igbo" => Some(Self::Igbo),
            "Hausa" => Some(Self::Hausa),
            "Pidgin" => Some(Self::Pidgin),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed genre vocabulary. Detection only ever produces these six,
/// so the stored tag set is an enum rather than free strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Romance,
    Action,
    Comedy,
    Drama,
    Thriller,
    Horror,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Romance,
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::Thriller,
        Genre::Horror,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Romance => "romance",
            Self::Action => "action",
            Self::Comedy => "comedy",
            Self::Drama => "drama",
            Self::Thriller => "thriller",
            Self::Horror => "horror",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "romance" => Some(Self::Romance),
            "action" => Some(Self::Action),
            "comedy" => Some(Self::Comedy),
            "drama" => Some(Self::Drama),
            "thriller" => Some(Self::Thriller),
            "horror" => Some(Self::Horror),
            _ => None,
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seasonal/holiday tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seasonal {
    Christmas,
    Easter,
    NewYear,
    Valentine,
    Independence,
}

impl Seasonal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Christmas => "Christmas",
            Self::Easter => "Easter",
            Self::NewYear => "NewYear",
            Self::Valentine => "Valentine",
            Self::Independence => "Independence",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Christmas" => Some(Self::Christmas),
            "Easter" => Some(Self::Easter),
            "NewYear" => Some(Self::NewYear),
            "Valentine" => Some(Self::Valentine),
            "Independence" => Some(Self::Independence),
            _ => None,
        }
    }
}

impl std::fmt::Display for Seasonal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four-level popularity bucket. Never stored independently — always
/// recomputed from the view count at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularityTier {
    Viral,
    Popular,
    Moderate,
    Niche,
}

impl PopularityTier {
    pub fn from_view_count(views: i64) -> Self {
        if views >= 1_000_000 {
            Self::Viral
        } else if views >= 500_000 {
            Self::Popular
        } else if views >= 100_000 {
            Self::Moderate
        } else {
            Self::Niche
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Viral => "viral",
            Self::Popular => "popular",
            Self::Moderate => "moderate",
            Self::Niche => "niche",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "viral" => Some(Self::Viral),
            "popular" => Some(Self::Popular),
            "moderate" => Some(Self::Moderate),
            "niche" => Some(Self::Niche),
            _ => None,
        }
    }
}

impl std::fmt::Display for PopularityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image variant as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// The fixed five-slot thumbnail shape persisted with every item.
/// Slots the platform did not deliver stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

impl ThumbnailSet {
    /// Normalize a raw variant map into the fixed shape. Total: unknown
    /// variant names are dropped, missing ones stay empty.
    pub fn from_variants(mut variants: BTreeMap<String, Thumbnail>) -> Self {
        Self {
            default: variants.remove("default"),
            medium: variants.remove("medium"),
            high: variants.remove("high"),
            standard: variants.remove("standard"),
            maxres: variants.remove("maxres"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none()
            && self.medium.is_none()
            && self.high.is_none()
            && self.standard.is_none()
            && self.maxres.is_none()
    }
}

/// Everything the text heuristics derive from a title + description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: ContentKind,
    pub genres: Vec<Genre>,
    pub language: Language,
    pub series: Option<String>,
    pub part: Option<u32>,
    pub seasonal: Option<Seasonal>,
    pub cast: Vec<String>,
    pub director: Option<String>,
    pub production_company: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popularity_tier_boundaries() {
        assert_eq!(PopularityTier::from_view_count(1_000_000), PopularityTier::Viral);
        assert_eq!(PopularityTier::from_view_count(999_999), PopularityTier::Popular);
        assert_eq!(PopularityTier::from_view_count(500_000), PopularityTier::Popular);
        assert_eq!(PopularityTier::from_view_count(499_999), PopularityTier::Moderate);
        assert_eq!(PopularityTier::from_view_count(100_000), PopularityTier::Moderate);
        assert_eq!(PopularityTier::from_view_count(99_999), PopularityTier::Niche);
        assert_eq!(PopularityTier::from_view_count(0), PopularityTier::Niche);
    }

    #[test]
    fn thumbnail_set_keeps_known_variants_only() {
        let mut variants = BTreeMap::new();
        for name in ["default", "maxres", "banner"] {
            variants.insert(
                name.to_string(),
                Thumbnail {
                    url: format!("https://img.example/{name}.jpg"),
                    width: Some(120),
                    height: Some(90),
                },
            );
        }

        let set = ThumbnailSet::from_variants(variants);
        assert!(set.default.is_some());
        assert!(set.maxres.is_some());
        assert!(set.medium.is_none());
        assert!(set.standard.is_none());
        assert!(!set.is_empty());
    }

    #[test]
    fn thumbnail_set_empty_when_no_variants() {
        let set = ThumbnailSet::from_variants(BTreeMap::new());
        assert!(set.is_empty());
    }

    #[test]
    fn enum_round_trips() {
        for genre in Genre::ALL {
            assert_eq!(Genre::parse(genre.as_str()), Some(genre));
        }
        assert_eq!(ContentKind::parse("tvshow"), Some(ContentKind::TvShow));
        assert_eq!(Language::parse("Pidgin"), Some(Language::Pidgin));
        assert_eq!(Language::parse("klingon"), None);
    }
}
