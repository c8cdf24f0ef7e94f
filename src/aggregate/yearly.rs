use super::series::trailing_mean;
use crate::ingest::Record;
use serde::Serialize;
use std::collections::BTreeMap;

/// Window of the trailing moving average over the yearly series.
pub const TRAILING_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
    pub trailing_avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearShare {
    pub year: i32,
    pub mean_share: f64,
    pub trailing_avg: Option<f64>,
}

/// Prizes awarded per year, with a 5-entry trailing moving average over the
/// year-ordered series. Every record counts, derived fields or not.
pub fn prizes_per_year(records: &[Record]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for r in records {
        *counts.entry(r.year).or_default() += 1;
    }

    let values: Vec<f64> = counts.values().map(|&c| c as f64).collect();
    let avgs = trailing_mean(&values, TRAILING_WINDOW);
    counts
        .into_iter()
        .zip(avgs)
        .map(|((year, count), trailing_avg)| YearCount {
            year,
            count,
            trailing_avg,
        })
        .collect()
}

/// Mean `share_pct` per year, smoothed like `prizes_per_year`. Records with
/// a missing `share_pct` are excluded from the mean; a year with no
/// well-formed share at all is omitted from the series.
pub fn avg_share_per_year(records: &[Record]) -> Vec<YearShare> {
    let mut sums: BTreeMap<i32, (f64, u64)> = BTreeMap::new();
    for r in records {
        if let Some(pct) = r.share_pct {
            let entry = sums.entry(r.year).or_insert((0.0, 0));
            entry.0 += pct;
            entry.1 += 1;
        }
    }

    let means: Vec<(i32, f64)> = sums
        .into_iter()
        .map(|(year, (sum, n))| (year, sum / n as f64))
        .collect();
    let values: Vec<f64> = means.iter().map(|&(_, m)| m).collect();
    let avgs = trailing_mean(&values, TRAILING_WINDOW);
    means
        .into_iter()
        .zip(avgs)
        .map(|((year, mean_share), trailing_avg)| YearShare {
            year,
            mean_share,
            trailing_avg,
        })
        .collect()
}
