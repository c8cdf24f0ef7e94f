use crate::ingest::Record;
use serde::Serialize;

/// One `(year, winning_age, category)` triple. The charting collaborator
/// does the histogram binning and LOWESS smoothing; this table is the raw
/// material for both, with missing ages already excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeSample {
    pub year: i32,
    pub winning_age: i32,
    pub category: String,
}

/// The oldest and youngest recipients by age at the time of the award.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeExtremes {
    pub oldest: Record,
    pub youngest: Record,
}

/// Find the oldest and youngest winners. Ties go to the record seen first in
/// input order; `None` when no record has a computable age.
pub fn extremes(records: &[Record]) -> Option<AgeExtremes> {
    let mut oldest: Option<(&Record, i32)> = None;
    let mut youngest: Option<(&Record, i32)> = None;
    for r in records {
        let Some(age) = r.winning_age else { continue };
        if oldest.map_or(true, |(_, max)| age > max) {
            oldest = Some((r, age));
        }
        if youngest.map_or(true, |(_, min)| age < min) {
            youngest = Some((r, age));
        }
    }
    Some(AgeExtremes {
        oldest: oldest?.0.clone(),
        youngest: youngest?.0.clone(),
    })
}

/// Every record with a computable age, in input order.
pub fn age_samples(records: &[Record]) -> Vec<AgeSample> {
    records
        .iter()
        .filter_map(|r| {
            r.winning_age.map(|winning_age| AgeSample {
                year: r.year,
                winning_age,
                category: r.category.clone(),
            })
        })
        .collect()
}
