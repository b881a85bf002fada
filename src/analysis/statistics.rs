//! Batch statistics over many scored images
//!
//! Consumes `(identifier, score)` pairs produced by batch scoring and
//! summarizes the primary `top5_cell_error` metric: count, mean, extremes, and
//! the worst, best and median cases for closer inspection.

use crate::algorithm::scoring::BatchEntry;
use crate::analysis::summary::ErrorScore;
use crate::math::stats::{mean, round_to_tenth};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Aggregate figures of the top cell error across a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatistics {
    /// Number of scored images
    pub count: usize,
    /// Mean top cell error, rounded to one decimal
    pub mean_top5: f64,
    /// Smallest top cell error
    pub min_top5: f64,
    /// Largest top cell error
    pub max_top5: f64,
    /// Mean of the per-image mean error percentages, rounded to one decimal
    pub mean_error_pct: f64,
}

impl BatchStatistics {
    /// Summarize a set of scores; `None` when there are none
    pub fn from_scores<'a, I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ErrorScore>,
    {
        let (top5, mean_pct): (Vec<f64>, Vec<f64>) = scores
            .into_iter()
            .map(|score| (score.top5_cell_error(), score.mean_error_pct()))
            .unzip();

        let mean_top5 = mean(&top5)?;
        Some(Self {
            count: top5.len(),
            mean_top5: round_to_tenth(mean_top5),
            min_top5: top5.iter().copied().fold(f64::INFINITY, f64::min),
            max_top5: top5.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_error_pct: round_to_tenth(mean(&mean_pct).unwrap_or_default()),
        })
    }

    /// Histogram of top cell errors in unit-wide bins starting at zero
    ///
    /// Bin `i` counts scores in `[i, i + 1)`.
    pub fn histogram<'a, I>(scores: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a ErrorScore>,
    {
        let mut bins: Vec<usize> = Vec::new();
        for score in scores {
            let bin = score.top5_cell_error().max(0.0).floor() as usize;
            if bins.len() <= bin {
                bins.resize(bin + 1, 0);
            }
            if let Some(count) = bins.get_mut(bin) {
                *count += 1;
            }
        }
        bins
    }
}

/// Identifiers of the cases worth looking at
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaseSelection {
    /// Highest errors in ascending order, so the worst case is last
    pub worst: Vec<String>,
    /// Lowest errors, best first
    pub best: Vec<String>,
    /// Image at the middle of the ranking
    pub median: Option<String>,
}

/// Pick the worst, best and median images by top cell error
///
/// Ties are broken by identifier so the selection is deterministic.
pub fn select_cases(scores: &[(String, ErrorScore)], worst: usize, best: usize) -> CaseSelection {
    let mut ranked: Vec<(&str, f64)> = scores
        .iter()
        .map(|(id, score)| (id.as_str(), score.top5_cell_error()))
        .collect();
    ranked.sort_by(|a, b| match a.1.total_cmp(&b.1) {
        Ordering::Equal => a.0.cmp(b.0),
        other => other,
    });

    CaseSelection {
        worst: ranked
            .iter()
            .skip(ranked.len().saturating_sub(worst))
            .map(|(id, _)| (*id).to_string())
            .collect(),
        best: ranked
            .iter()
            .take(best)
            .map(|(id, _)| (*id).to_string())
            .collect(),
        median: ranked.get(ranked.len() / 2).map(|(id, _)| (*id).to_string()),
    }
}

/// Serializable outcome of a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Scores keyed by image identifier
    pub scores: BTreeMap<String, ErrorScore>,
    /// Failure messages keyed by image identifier
    pub failures: BTreeMap<String, String>,
    /// Aggregate figures, absent when nothing was scored
    pub statistics: Option<BatchStatistics>,
    /// Unit-wide bins of the top cell error, see [`BatchStatistics::histogram`]
    pub histogram: Vec<usize>,
    /// Worst, best and median cases
    pub selection: CaseSelection,
}

impl BatchReport {
    /// Split batch entries into scores and failures and summarize the scores
    pub fn from_entries(entries: &[BatchEntry], worst: usize, best: usize) -> Self {
        let mut scores = BTreeMap::new();
        let mut failures = BTreeMap::new();
        for entry in entries {
            let id = entry.path.display().to_string();
            match &entry.result {
                Ok(score) => {
                    scores.insert(id, score.clone());
                }
                Err(e) => {
                    failures.insert(id, e.to_string());
                }
            }
        }

        let ranked: Vec<(String, ErrorScore)> = scores
            .iter()
            .map(|(id, score)| (id.clone(), score.clone()))
            .collect();

        Self {
            statistics: BatchStatistics::from_scores(scores.values()),
            histogram: BatchStatistics::histogram(scores.values()),
            selection: select_cases(&ranked, worst, best),
            scores,
            failures,
        }
    }
}
