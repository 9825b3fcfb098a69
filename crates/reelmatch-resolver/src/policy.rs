use serde::{Deserialize, Serialize};

use reelmatch_core::config::ensure_unit_range;
use reelmatch_core::{Error, Result};

/// Weights, year bands and acceptance thresholds for candidate scoring.
///
/// With a query year: `title_weight_with_year * title + year_weight * year + popularity_weight_with_year * popularity`.
/// Without one the year term is dropped and its weight redistributed:
/// `title_weight_without_year * title + popularity_weight_without_year * popularity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverPolicy {
    pub title_weight_with_year: f64,
    pub year_weight: f64,
    pub popularity_weight_with_year: f64,
    pub title_weight_without_year: f64,
    pub popularity_weight_without_year: f64,
    pub threshold_with_year: f64,
    pub threshold_without_year: f64,
    pub year_exact: f64,
    pub year_adjacent: f64,
    pub year_near: f64,
    /// Largest year difference still scored as `year_near`.
    pub year_near_window: u32,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            title_weight_with_year: 0.6,
            year_weight: 0.3,
            popularity_weight_with_year: 0.1,
            title_weight_without_year: 0.85,
            popularity_weight_without_year: 0.15,
            threshold_with_year: 0.30,
            threshold_without_year: 0.60,
            year_exact: 1.0,
            year_adjacent: 0.7,
            year_near: 0.4,
            year_near_window: 3,
        }
    }
}

impl ResolverPolicy {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("title_weight_with_year", self.title_weight_with_year),
            ("year_weight", self.year_weight),
            ("popularity_weight_with_year", self.popularity_weight_with_year),
            ("title_weight_without_year", self.title_weight_without_year),
            ("popularity_weight_without_year", self.popularity_weight_without_year),
        ];
        for (name, w) in weights {
            if !(w.is_finite() && w >= 0.0) { return Err(Error::InvalidConfig(format!("{name} must be a non-negative number, got {w}"))); }
        }
        for (name, v) in [
            ("threshold_with_year", self.threshold_with_year),
            ("threshold_without_year", self.threshold_without_year),
            ("year_exact", self.year_exact),
            ("year_adjacent", self.year_adjacent),
            ("year_near", self.year_near),
        ] {
            ensure_unit_range(name, v)?;
        }
        Ok(())
    }

    /// Year band score; `0.0` when either side has no year.
    pub fn year_score(&self, query_year: Option<i32>, candidate_year: Option<i32>) -> f64 {
        let (Some(q), Some(c)) = (query_year, candidate_year) else { return 0.0 };
        match q.abs_diff(c) {
            0 => self.year_exact,
            1 => self.year_adjacent,
            d if d <= self.year_near_window => self.year_near,
            _ => 0.0,
        }
    }

    pub fn threshold(&self, has_year: bool) -> f64 {
        if has_year { self.threshold_with_year } else { self.threshold_without_year }
    }

    pub fn composite(&self, has_year: bool, title: f64, year: f64, popularity: f64) -> f64 {
        if has_year {
            self.title_weight_with_year * title + self.year_weight * year + self.popularity_weight_with_year * popularity
        } else {
            self.title_weight_without_year * title + self.popularity_weight_without_year * popularity
        }
    }
}
