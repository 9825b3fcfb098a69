//! Domain types shared by the similarity index and the candidate resolver.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Stable position of an item in catalog order.
pub type RowId = usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    #[serde(rename = "Movie", alias = "movie")]
    Movie,
    #[serde(rename = "TV Show", alias = "tv", alias = "TVShow", alias = "tv show")]
    TvShow,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "tv" | "tv show" | "tvshow" => Ok(Self::TvShow),
            other => Err(format!("unknown media type '{other}' (expected movie or tv)")),
        }
    }
}

/// One catalog row, using the upstream column names on the wire.
///
/// `genres` is optional only so that a row missing it can be reported as a
/// data error at index build time rather than failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub title: String,
    pub director: Option<String>,
    pub cast: Option<String>,
    #[serde(rename = "listed_in", alias = "genres")]
    pub genres: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    #[serde(default, deserialize_with = "lenient_year")]
    pub release_year: Option<i32>,
    pub description: Option<String>,
}

impl CatalogItem {
    pub fn new(title: impl Into<String>, genres: impl Into<String>) -> Self {
        Self { title: title.into(), genres: Some(genres.into()), ..Self::default() }
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self { self.director = Some(director.into()); self }
    pub fn with_cast(mut self, cast: impl Into<String>) -> Self { self.cast = Some(cast.into()); self }
    pub fn with_media_type(mut self, media_type: MediaType) -> Self { self.media_type = media_type; self }
    pub fn with_year(mut self, year: i32) -> Self { self.release_year = Some(year); self }

    /// `title director cast genres`, missing optional fields as empty strings.
    /// Returns `None` when genres are absent.
    pub fn combined_text(&self) -> Option<String> {
        let genres = self.genres.as_deref()?;
        Some(format!(
            "{} {} {} {}",
            self.title,
            self.director.as_deref().unwrap_or(""),
            self.cast.as_deref().unwrap_or(""),
            genres
        ))
    }

    /// Individual genre labels from the comma-delimited list.
    pub fn genre_labels(&self) -> impl Iterator<Item = &str> {
        self.genres.as_deref().unwrap_or("").split(',').map(str::trim).filter(|g| !g.is_empty())
    }
}

/// Accepts integers, integral floats and numeric strings; anything else is no year.
fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(year_from_value))
}

fn year_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0).map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i32>().ok().or_else(|| {
                s.parse::<f64>().ok().filter(|f| f.is_finite() && f.fract() == 0.0).and_then(|f| i32::try_from(f as i64).ok())
            })
        }
        _ => None,
    }
}

/// One ranked neighbour of the query item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub row: RowId,
    pub title: String,
    pub score: f32,
}

/// Outcome of a recommendation query. A missing title is an ordinary result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Recommendations {
    Ranked(Vec<Recommendation>),
    TitleNotFound,
}

impl Recommendations {
    pub fn is_not_found(&self) -> bool { matches!(self, Self::TitleNotFound) }

    pub fn titles(&self) -> Vec<&str> {
        match self {
            Self::Ranked(items) => items.iter().map(|r| r.title.as_str()).collect(),
            Self::TitleNotFound => Vec::new(),
        }
    }

    pub fn ranked(&self) -> &[Recommendation] {
        match self {
            Self::Ranked(items) => items,
            Self::TitleNotFound => &[],
        }
    }
}

/// What the resolver is asked to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleQuery {
    pub title: String,
    pub year: Option<i32>,
    pub media_type: MediaType,
}

impl TitleQuery {
    pub fn new(title: impl Into<String>, year: Option<i32>, media_type: MediaType) -> Self {
        Self { title: title.into(), year, media_type }
    }

    pub fn movie(title: impl Into<String>, year: Option<i32>) -> Self { Self::new(title, year, MediaType::Movie) }
    pub fn tv(title: impl Into<String>, year: Option<i32>) -> Self { Self::new(title, year, MediaType::TvShow) }

    pub fn for_item(item: &CatalogItem) -> Self { Self::new(item.title.clone(), item.release_year, item.media_type) }
}

/// A normalized search result from the external metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExternalCandidate {
    pub display_name: String,
    pub release_date: String,
    pub popularity: f64,
    pub image_path: Option<String>,
}

impl ExternalCandidate {
    /// Trims the name and cleans popularity the same way [`ExternalCandidate::from_record`] does.
    pub fn new(display_name: impl Into<String>, release_date: impl Into<String>, popularity: f64) -> Self {
        let display_name = display_name.into().trim().to_string();
        Self { display_name, release_date: release_date.into(), popularity: clean_popularity(popularity), image_path: None }
    }

    pub fn with_image(mut self, path: impl Into<String>) -> Self { self.image_path = Some(path.into()); self }

    /// Normalizes one upstream search record. Movie records carry `title` and
    /// `release_date`, TV records `name` and `first_air_date`; either shape is
    /// accepted for either media type, the media type only picks which is tried first.
    pub fn from_record(record: &Value, media_type: MediaType) -> Self {
        let (name_keys, date_keys) = match media_type {
            MediaType::Movie => (["title", "name"], ["release_date", "first_air_date"]),
            MediaType::TvShow => (["name", "title"], ["first_air_date", "release_date"]),
        };
        let display_name = first_str(record, &name_keys).map(str::trim).unwrap_or("").to_string();
        let release_date = first_str(record, &date_keys).unwrap_or("").to_string();
        let popularity = match record.get("popularity") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        let popularity = clean_popularity(popularity);
        let image_path = first_str(record, &["poster_path"]).map(str::to_string);
        Self { display_name, release_date, popularity, image_path }
    }

    /// The leading four-digit year of `release_date`, if it has one.
    pub fn release_year(&self) -> Option<i32> {
        let prefix = self.release_date.get(..4)?;
        if prefix.bytes().all(|b| b.is_ascii_digit()) { prefix.parse().ok() } else { None }
    }
}

/// Popularity that is negative, NaN or infinite counts as none at all.
pub fn clean_popularity(popularity: f64) -> f64 {
    if popularity.is_finite() && popularity > 0.0 { popularity } else { 0.0 }
}

/// First non-empty string among `keys`.
fn first_str<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().filter_map(|k| record.get(*k).and_then(Value::as_str)).find(|s| !s.trim().is_empty())
}

/// Reads the `results` array of an upstream search response.
pub fn parse_search_response(response: &Value, media_type: MediaType) -> Vec<ExternalCandidate> {
    response
        .get("results")
        .and_then(Value::as_array)
        .map(|results| results.iter().map(|r| ExternalCandidate::from_record(r, media_type)).collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchResult {
    Found(String),
    NotFound,
}

impl MatchResult {
    pub fn is_found(&self) -> bool { matches!(self, Self::Found(_)) }

    pub fn image_path(&self) -> Option<&str> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn combined_text_fills_missing_fields_with_empty() {
        let item = CatalogItem::new("Alpha", "Drama");
        assert_eq!(item.combined_text().as_deref(), Some("Alpha   Drama"));
        let item = CatalogItem { genres: None, ..item };
        assert!(item.combined_text().is_none());
    }

    #[test]
    fn catalog_item_reads_upstream_columns() {
        let item: CatalogItem = serde_json::from_value(json!({
            "title": "Dark", "director": null, "cast": "Louis Hofmann",
            "listed_in": "International TV Shows, TV Mysteries", "type": "TV Show",
            "release_year": "2017", "description": "A missing child..."
        }))
        .unwrap();
        assert_eq!(item.media_type, MediaType::TvShow);
        assert_eq!(item.release_year, Some(2017));
        assert_eq!(item.director, None);
        assert_eq!(item.genre_labels().collect::<Vec<_>>(), vec!["International TV Shows", "TV Mysteries"]);
    }

    #[test]
    fn malformed_year_is_none() {
        let item: CatalogItem = serde_json::from_value(json!({"title": "X", "listed_in": "Drama", "release_year": "n/a"})).unwrap();
        assert_eq!(item.release_year, None);
        let item: CatalogItem = serde_json::from_value(json!({"title": "X", "listed_in": "Drama", "release_year": 2001.0})).unwrap();
        assert_eq!(item.release_year, Some(2001));
    }

    #[test]
    fn candidate_display_name_falls_back_between_schemas() {
        let tv = ExternalCandidate::from_record(&json!({"name": " Dark ", "first_air_date": "2017-12-01"}), MediaType::TvShow);
        assert_eq!(tv.display_name, "Dark");
        assert_eq!(tv.release_year(), Some(2017));
        let movie_shaped_tv = ExternalCandidate::from_record(&json!({"title": "Dark", "release_date": "2017"}), MediaType::TvShow);
        assert_eq!(movie_shaped_tv.display_name, "Dark");
        assert_eq!(movie_shaped_tv.release_year(), Some(2017));
    }

    #[test]
    fn candidate_tolerates_messy_fields() {
        let c = ExternalCandidate::from_record(&json!({"title": "X", "release_date": "19xx-01-01", "popularity": null}), MediaType::Movie);
        assert_eq!(c.release_year(), None);
        assert_eq!(c.popularity, 0.0);
        assert_eq!(c.image_path, None);
        let c = ExternalCandidate::from_record(&json!({"title": "X", "release_date": "", "popularity": "12.5", "poster_path": "/x.jpg"}), MediaType::Movie);
        assert_eq!(c.release_year(), None);
        assert_eq!(c.popularity, 12.5);
        assert_eq!(c.image_path.as_deref(), Some("/x.jpg"));
    }

    #[test]
    fn direct_constructor_matches_record_cleanup() {
        let c = ExternalCandidate::new("  The Matrix ", "1999", f64::NAN);
        assert_eq!(c.display_name, "The Matrix");
        assert_eq!(c.popularity, 0.0);
        assert_eq!(ExternalCandidate::new("X", "", f64::INFINITY).popularity, 0.0);
        assert_eq!(ExternalCandidate::new("X", "", -3.0).popularity, 0.0);
        assert_eq!(ExternalCandidate::new("X", "", 7.5).popularity, 7.5);
    }

    #[test]
    fn search_response_without_results_is_empty() {
        assert!(parse_search_response(&json!({"page": 1}), MediaType::Movie).is_empty());
        assert_eq!(parse_search_response(&json!({"results": [{"title": "A"}, {"name": "B"}]}), MediaType::Movie).len(), 2);
    }

    #[test]
    fn media_type_parses_cli_spellings() {
        assert_eq!("tv".parse::<MediaType>(), Ok(MediaType::TvShow));
        assert_eq!("Movie".parse::<MediaType>(), Ok(MediaType::Movie));
        assert!("radio".parse::<MediaType>().is_err());
    }
}
