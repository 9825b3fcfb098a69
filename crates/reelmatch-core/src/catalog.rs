//! The catalog table: loading, title lookup and genre statistics.
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::filter::CatalogFilter;
use crate::types::{CatalogItem, RowId};

/// Catalog rows in their original order. Row positions are stable for the
/// lifetime of the value; a changed catalog means a new `Catalog`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn from_items(items: Vec<CatalogItem>) -> Result<Self> {
        for (row, item) in items.iter().enumerate() {
            if item.title.trim().is_empty() { return Err(Error::data(row, "title is empty")); }
        }
        Ok(Self { items })
    }

    /// Reads a JSON array or JSON Lines file of catalog records.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let catalog = Self::parse(&raw)?;
        tracing::info!(path = %path.display(), rows = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let records: Vec<Value> = if raw.trim_start().starts_with('[') {
            serde_json::from_str(raw)?
        } else {
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .enumerate()
                .map(|(row, line)| serde_json::from_str(line).map_err(|e| Error::data(row, e.to_string())))
                .collect::<Result<_>>()?
        };
        let items = records
            .into_iter()
            .enumerate()
            .map(|(row, record)| serde_json::from_value::<CatalogItem>(record).map_err(|e| Error::data(row, e.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Self::from_items(items)
    }

    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn items(&self) -> &[CatalogItem] { &self.items }
    pub fn get(&self, row: RowId) -> Option<&CatalogItem> { self.items.get(row) }

    /// Case-insensitive exact title match; duplicates resolve to the first row.
    pub fn position_of(&self, title: &str) -> Option<RowId> {
        let wanted = title.to_lowercase();
        self.items.iter().position(|item| item.title.to_lowercase() == wanted)
    }

    /// Genre label frequencies, most frequent first, ties alphabetical.
    pub fn genre_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in self.items.iter().flat_map(CatalogItem::genre_labels) {
            *counts.entry(label).or_default() += 1;
        }
        let mut counts: Vec<(String, usize)> = counts.into_iter().map(|(g, c)| (g.to_string(), c)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    pub fn top_genres(&self, n: usize) -> Vec<(String, usize)> {
        let mut counts = self.genre_counts();
        counts.truncate(n);
        counts
    }

    /// Rows passing `filter`, in catalog order.
    pub fn browse(&self, filter: &CatalogFilter) -> Vec<RowId> {
        self.items.iter().enumerate().filter(|(_, item)| filter.matches(item)).map(|(row, _)| row).collect()
    }

    /// Smallest and largest release year present, if any row has one.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let years = self.items.iter().filter_map(|i| i.release_year);
        let (min, max) = years.fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
        (min <= max).then_some((min, max))
    }
}
