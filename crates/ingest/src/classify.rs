//! Keyword/pattern heuristics that turn raw title + description text
//! into a structured categorization.
//!
//! Every detector here is pure and total: given the same text it always
//! returns the same value and never fails, so a malformed upload can
//! never stall an ingestion run.

use netwood_core::types::{Classification, ContentKind, Genre, Language, Seasonal};
use regex::Regex;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------
// Ordered, read-only data: language and seasonal detection are
// first-match-wins, so table order is part of the contract.

static GENRE_KEYWORDS: &[(Genre, &[&str])] = &[
    (
        Genre::Romance,
        &["romance", "love", "romantic", "heart", "passion", "affair", "relationship"],
    ),
    (
        Genre::Action,
        &["action", "fight", "battle", "war", "gun", "combat", "mission", "soldier"],
    ),
    (
        Genre::Comedy,
        &["comedy", "funny", "hilarious", "laugh", "humor", "joke", "comical"],
    ),
    (
        Genre::Drama,
        &["drama", "emotional", "family", "life", "struggle", "pain", "tears"],
    ),
    (
        Genre::Thriller,
        &["thriller", "suspense", "mystery", "crime", "detective", "murder", "investigation"],
    ),
    (
        Genre::Horror,
        &["horror", "scary", "ghost", "haunted", "fear", "terror", "supernatural"],
    ),
];

static LANGUAGE_KEYWORDS: &[(Language, &[&str])] = &[
    (Language::English, &["english"]),
    (
        Language::French,
        &[
            "french",
            "français",
            "francais",
            "vf",
            "version française",
            "version francaise",
            "en français",
            "en francais",
            "doublé",
            "doublage",
            "sous-titré français",
            "film français",
            "complet en français",
        ],
    ),
    (Language::Yoruba, &["yoruba"]),
    (Language::Igbo, &["igbo"]),
    (Language::Hausa, &["hausa"]),
    (Language::Pidgin, &["pidgin", "broken english", "naija pidgin"]),
];

static SEASONAL_KEYWORDS: &[(Seasonal, &[&str])] = &[
    (
        Seasonal::Christmas,
        &["christmas", "xmas", "noel", "yuletide", "holiday season"],
    ),
    (Seasonal::Easter, &["easter", "resurrection", "paschal"]),
    (Seasonal::NewYear, &["new year", "newyear"]),
    (Seasonal::Valentine, &["valentine", "val day", "lovers day"]),
    (
        Seasonal::Independence,
        &["independence", "october 1st", "nigeria independence"],
    ),
];

static TV_SHOW_KEYWORDS: &[&str] = &[
    "series",
    "episode",
    "season",
    "tv show",
    "television",
    "show",
    "sitcom",
    "soap opera",
    "drama series",
    "web series",
];

// Cast indicators in priority order: the first one present in the
// description decides where the cast listing starts.
static CAST_INDICATORS: &[&str] = &[
    "starring",
    "stars",
    "featuring",
    "cast",
    "actors",
    "actresses",
    "lead role",
    "main role",
    "supporting role",
];

static DIRECTOR_INDICATORS: &[&str] = &["directed by", "director", "a film by", "filmmaker"];

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static RE_PART: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)part\s+(\d+)").unwrap());
static RE_SEASON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)season\s+(\d+)").unwrap());
static RE_EPISODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)episode\s+(\d+)").unwrap());
static RE_SXXEXX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)s(\d+)e(\d+)").unwrap());

static RE_CAST_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i),|\.|\band\b|&|\bwith\b|\balongside\b").unwrap());

static RE_NAME_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^,.;:!?&]+)").unwrap());

// Indicator phrases are regex fragments here: the last one is a
// wildcard matching "a <company> production".
static RE_COMPANY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["produced by", "production of", r"a .* production", "presents", "studios"]
        .iter()
        .map(|ind| Regex::new(&format!(r"(?i){ind}\s+([^,.;:!?&]+)")).unwrap())
        .collect()
});

static RE_TITLE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d{4})\)").unwrap());

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

/// Case-insensitive substring search. Indicators are all ASCII, so the
/// returned byte index is always a char boundary in the haystack.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Genres whose keyword list has at least one hit in the text. A title
/// may match several genres; no keyword hit means an empty set, never a
/// default genre.
pub fn detect_genres(title: &str, description: &str) -> Vec<Genre> {
    let text = format!("{title} {description}").to_lowercase();
    GENRE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(genre, _)| *genre)
        .collect()
}

/// First language in table order with a keyword hit; English when
/// nothing matches.
pub fn detect_language(title: &str, description: &str) -> Language {
    let text = format!("{title} {description}").to_lowercase();
    LANGUAGE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(language, _)| *language)
        .unwrap_or(Language::English)
}

/// Series membership parsed from the title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeriesInfo {
    pub series: Option<String>,
    pub part: Option<u32>,
}

/// Try the series patterns in fixed priority order: "part N" →
/// "season N" → "episode N" → SxxEyy. The series name is whatever
/// precedes the first matching marker; for SxxEyy the episode number
/// stands in as the part.
pub fn detect_series(title: &str) -> SeriesInfo {
    for (re, part_group) in [(&RE_PART, 1), (&RE_SEASON, 1), (&RE_EPISODE, 1), (&RE_SXXEXX, 2)] {
        if let Some(caps) = re.captures(title) {
            let Some(whole) = caps.get(0) else { continue };
            let part = caps.get(part_group).and_then(|m| m.as_str().parse().ok());
            let name = title[..whole.start()].trim();
            return SeriesInfo {
                series: if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                },
                part,
            };
        }
    }
    SeriesInfo::default()
}

/// First seasonal tag in table order with a keyword hit.
pub fn detect_seasonal(title: &str, description: &str) -> Option<Seasonal> {
    let text = format!("{title} {description}").to_lowercase();
    SEASONAL_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(seasonal, _)| *seasonal)
}

/// TV show if any TV-indicator keyword appears in the text; movie
/// otherwise.
pub fn detect_content_type(title: &str, description: &str) -> ContentKind {
    let text = format!("{title} {description}").to_lowercase();
    if TV_SHOW_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        ContentKind::TvShow
    } else {
        ContentKind::Movie
    }
}

/// Cast names listed after the first cast-indicator phrase in the
/// description. Fragments of two characters or fewer and purely numeric
/// fragments are discarded; duplicates are removed, first occurrence
/// order kept.
pub fn extract_cast(description: &str) -> Vec<String> {
    let mut cast_text = None;
    for indicator in CAST_INDICATORS {
        if let Some(idx) = find_ascii_ci(description, indicator) {
            cast_text = Some(description[idx + indicator.len()..].trim());
            break;
        }
    }
    let Some(text) = cast_text else {
        return Vec::new();
    };

    let mut cast: Vec<String> = Vec::new();
    for fragment in RE_CAST_SEP.split(text) {
        let name = fragment.trim();
        if name.chars().count() <= 2 || name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if !cast.iter().any(|existing| existing == name) {
            cast.push(name.to_string());
        }
    }
    cast
}

/// Name following the first director-indicator phrase, up to the first
/// punctuation/conjunction boundary.
pub fn extract_director(description: &str) -> Option<String> {
    for indicator in DIRECTOR_INDICATORS {
        if let Some(idx) = find_ascii_ci(description, indicator) {
            let after = description[idx + indicator.len()..].trim_start();
            if let Some(caps) = RE_NAME_BOUNDARY.captures(after) {
                let name = caps[1].trim();
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
    }
    None
}

/// Company name following the first production-indicator phrase.
pub fn extract_production_company(description: &str) -> Option<String> {
    for re in RE_COMPANY.iter() {
        if let Some(caps) = re.captures(description) {
            let name = caps[1].trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// Release year: a `(YYYY)` marker in the title, if present.
pub fn title_year(title: &str) -> Option<i32> {
    RE_TITLE_YEAR
        .captures(title)
        .and_then(|caps| caps[1].parse().ok())
}

/// Run every detector over one title + description.
pub fn categorize(title: &str, description: &str) -> Classification {
    let SeriesInfo { series, part } = detect_series(title);
    Classification {
        kind: detect_content_type(title, description),
        genres: detect_genres(title, description),
        language: detect_language(title, description),
        series,
        part,
        seasonal: detect_seasonal(title, description),
        cast: extract_cast(description),
        director: extract_director(description),
        production_company: extract_production_company(description),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_single_keyword() {
        assert_eq!(detect_genres("A funny day", ""), vec![Genre::Comedy]);
    }

    #[test]
    fn genre_multiple_matches() {
        let genres = detect_genres("Love and War", "a hilarious story");
        assert!(genres.contains(&Genre::Romance));
        assert!(genres.contains(&Genre::Action));
        assert!(genres.contains(&Genre::Comedy));
    }

    #[test]
    fn genre_no_keyword_yields_empty_set() {
        assert!(detect_genres("Untitled", "nothing to see here").is_empty());
    }

    #[test]
    fn genre_deduplicated_per_table_entry() {
        // Two comedy keywords still produce one comedy tag.
        assert_eq!(detect_genres("Funny and hilarious", ""), vec![Genre::Comedy]);
    }

    #[test]
    fn language_first_match_wins_over_table_order() {
        // Both an English and a French cue: English precedes French in
        // the table, so it wins.
        assert_eq!(
            detect_language("Movie english complet en français", ""),
            Language::English
        );
        assert_eq!(detect_language("Film complet en français", ""), Language::French);
    }

    #[test]
    fn language_defaults_to_english() {
        assert_eq!(detect_language("Some Movie", "no cues at all"), Language::English);
    }

    #[test]
    fn language_detects_nigerian_languages() {
        assert_eq!(detect_language("Latest Yoruba Movie", ""), Language::Yoruba);
        assert_eq!(detect_language("Igbo film", ""), Language::Igbo);
        assert_eq!(detect_language("Hausa drama", ""), Language::Hausa);
        assert_eq!(detect_language("Naija pidgin comedy", ""), Language::Pidgin);
    }

    #[test]
    fn series_part_pattern() {
        let info = detect_series("Royal Palace Part 2");
        assert_eq!(info.series.as_deref(), Some("Royal Palace"));
        assert_eq!(info.part, Some(2));
    }

    #[test]
    fn series_priority_part_before_season() {
        // Both markers present: "part" is checked first.
        let info = detect_series("My Village Season 1 Part 2");
        assert_eq!(info.part, Some(2));
        assert_eq!(info.series.as_deref(), Some("My Village Season 1"));
    }

    #[test]
    fn series_season_and_episode_patterns() {
        let info = detect_series("Lagos Wives Season 3");
        assert_eq!(info.series.as_deref(), Some("Lagos Wives"));
        assert_eq!(info.part, Some(3));

        let info = detect_series("Lagos Wives Episode 7");
        assert_eq!(info.part, Some(7));
    }

    #[test]
    fn series_sxxexx_uses_episode_as_part() {
        let info = detect_series("The Compound S01E05");
        assert_eq!(info.series.as_deref(), Some("The Compound"));
        assert_eq!(info.part, Some(5));
    }

    #[test]
    fn series_no_marker() {
        assert_eq!(detect_series("A Quiet Wedding"), SeriesInfo::default());
    }

    #[test]
    fn seasonal_detection() {
        assert_eq!(
            detect_seasonal("A Christmas Wedding", ""),
            Some(Seasonal::Christmas)
        );
        assert_eq!(detect_seasonal("", "val day special"), Some(Seasonal::Valentine));
        assert_eq!(detect_seasonal("Plain Movie", ""), None);
    }

    #[test]
    fn content_type_tv_keywords() {
        assert_eq!(detect_content_type("New web series", ""), ContentKind::TvShow);
        assert_eq!(detect_content_type("Season 2 premiere", ""), ContentKind::TvShow);
        assert_eq!(detect_content_type("", "best sitcom ever"), ContentKind::TvShow);
    }

    #[test]
    fn content_type_defaults_to_movie() {
        assert_eq!(detect_content_type("Blood Money", "a feature film"), ContentKind::Movie);
    }

    #[test]
    fn cast_extraction_with_separators() {
        let cast = extract_cast("Starring John Doe, Jane Smith and Mary");
        assert_eq!(cast, vec!["John Doe", "Jane Smith", "Mary"]);
    }

    #[test]
    fn cast_discards_short_and_numeric_fragments() {
        let cast = extract_cast("Featuring Ng, 2023, Chika Ike & Jim Iyke");
        assert_eq!(cast, vec!["Chika Ike", "Jim Iyke"]);
    }

    #[test]
    fn cast_deduplicated() {
        let cast = extract_cast("Featuring Rita Dominic, Rita Dominic, Desmond Elliot");
        assert_eq!(cast, vec!["Rita Dominic", "Desmond Elliot"]);
    }

    #[test]
    fn cast_empty_without_indicator() {
        assert!(extract_cast("A movie about three brothers").is_empty());
    }

    #[test]
    fn director_extraction() {
        assert_eq!(
            extract_director("Directed by Kemi Adetiba, produced by ...").as_deref(),
            Some("Kemi Adetiba")
        );
        assert_eq!(
            extract_director("A film by Kunle Afolayan. Enjoy!").as_deref(),
            Some("Kunle Afolayan")
        );
        assert_eq!(extract_director("No credits here"), None);
    }

    #[test]
    fn production_company_extraction() {
        assert_eq!(
            extract_production_company("Produced by FilmOne Entertainment, 2023").as_deref(),
            Some("FilmOne Entertainment")
        );
        assert_eq!(
            extract_production_company("A production of Royal Arts Academy. Enjoy").as_deref(),
            Some("Royal Arts Academy")
        );
        assert_eq!(extract_production_company("nothing relevant"), None);
    }

    #[test]
    fn title_year_marker() {
        assert_eq!(title_year("Blood Sisters (2022)"), Some(2022));
        assert_eq!(title_year("Blood Sisters"), None);
    }

    #[test]
    fn categorize_combines_all_detectors() {
        let c = categorize(
            "Royal Palace Part 2 (2023)",
            "A hilarious family comedy. Directed by Moses Inwang. \
             Produced by Royal Arts Academy. Starring John Okafor, Mercy Johnson",
        );
        assert_eq!(c.kind, ContentKind::Movie);
        assert!(c.genres.contains(&Genre::Comedy));
        assert!(c.genres.contains(&Genre::Drama));
        assert_eq!(c.language, Language::English);
        assert_eq!(c.series.as_deref(), Some("Royal Palace"));
        assert_eq!(c.part, Some(2));
        assert_eq!(c.seasonal, None);
        assert_eq!(c.cast, vec!["John Okafor", "Mercy Johnson"]);
        assert_eq!(c.director.as_deref(), Some("Moses Inwang"));
        assert_eq!(c.production_company.as_deref(), Some("Royal Arts Academy"));
    }

    #[test]
    fn categorize_is_deterministic() {
        let title = "Lagos Nights Season 1";
        let desc = "A thriller series starring Ramsey Nouah and Genevieve Nnaji";
        assert_eq!(categorize(title, desc), categorize(title, desc));
    }
}
