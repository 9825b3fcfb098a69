use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::{CatalogItem, MediaType, Recommendations};

/// Narrowing applied to recommendations or to plain catalog browsing.
/// An empty filter passes everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Passes when any label occurs in the item's genre list.
    pub genres: Vec<String>,
    /// Inclusive release-year range. Items without a year fail when set.
    pub years: Option<(i32, i32)>,
    pub media_type: Option<MediaType>,
}

impl CatalogFilter {
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self { self.genres.push(genre.into()); self }
    pub fn with_years(mut self, from: i32, to: i32) -> Self { self.years = Some((from, to)); self }
    pub fn with_media_type(mut self, media_type: MediaType) -> Self { self.media_type = Some(media_type); self }

    pub fn is_empty(&self) -> bool { self.genres.is_empty() && self.years.is_none() && self.media_type.is_none() }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        if !self.genres.is_empty() {
            let listed = item.genres.as_deref().unwrap_or("");
            if !self.genres.iter().any(|g| listed.contains(g.as_str())) { return false; }
        }
        if let Some((from, to)) = self.years {
            match item.release_year {
                Some(y) if (from..=to).contains(&y) => {}
                _ => return false,
            }
        }
        self.media_type.map_or(true, |t| item.media_type == t)
    }
}

impl Recommendations {
    /// Drops ranked entries whose catalog row fails `filter`, keeping order.
    /// Applied after top-K selection, so the list can shrink below K.
    #[must_use]
    pub fn filtered(self, catalog: &Catalog, filter: &CatalogFilter) -> Self {
        match self {
            Self::Ranked(mut items) => {
                items.retain(|r| match catalog.get(r.row) {
                    Some(item) => filter.matches(item),
                    None => {
                        tracing::warn!(row = r.row, title = %r.title, "ranked row missing from catalog, dropped");
                        false
                    }
                });
                Self::Ranked(items)
            }
            Self::TitleNotFound => Self::TitleNotFound,
        }
    }
}
