use super::{count_by, top_n_ascending, TOP_N};
use crate::ingest::Record;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryIsoCount {
    pub country: String,
    pub iso: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub country: String,
    pub category: String,
    pub count: u64,
    pub country_total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeCount {
    pub country: String,
    pub year: i32,
    pub cumulative: u64,
}

/// Top 20 birth countries by prize count, ascending. Records without a birth
/// country are skipped.
pub fn top_countries(records: &[Record]) -> Vec<CountryCount> {
    top_n_ascending(
        count_by(records, |r| r.birth_country_current.as_deref()),
        TOP_N,
    )
    .into_iter()
    .map(|(country, count)| CountryCount { country, count })
    .collect()
}

/// Prize count per (birth country, ISO code) pair. Feeds the choropleth, so
/// the ISO code is required on both sides.
pub fn country_totals(records: &[Record]) -> Vec<CountryIsoCount> {
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for r in records {
        if let (Some(country), Some(iso)) = (&r.birth_country_current, &r.iso) {
            *counts.entry((country.clone(), iso.clone())).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|((country, iso), count)| CountryIsoCount { country, iso, count })
        .collect()
}

/// Category breakdown per country, restricted to the current top-20 country
/// list and joined against each country's total. Sorted by that total
/// ascending so the stacked bars come out in top-20 order.
pub fn category_by_country(records: &[Record]) -> Vec<CategoryCount> {
    let totals: HashMap<String, u64> = top_countries(records)
        .into_iter()
        .map(|c| (c.country, c.count))
        .collect();

    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for r in records {
        if let Some(country) = &r.birth_country_current {
            if totals.contains_key(country) {
                *counts
                    .entry((country.clone(), r.category.clone()))
                    .or_default() += 1;
            }
        }
    }

    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|((country, category), count)| {
            let country_total = totals[&country];
            CategoryCount {
                country,
                category,
                count,
                country_total,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.country_total
            .cmp(&b.country_total)
            .then_with(|| a.country.cmp(&b.country))
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Running prize total per country over the years it won anything. Years are
/// ascending within each country, so the cumulative column never decreases.
pub fn cumulative_by_country(records: &[Record]) -> Vec<CumulativeCount> {
    let mut counts: BTreeMap<(String, i32), u64> = BTreeMap::new();
    for r in records {
        if let Some(country) = &r.birth_country_current {
            *counts.entry((country.clone(), r.year)).or_default() += 1;
        }
    }

    // (country, year) keys iterate years ascending within each country
    let mut rows = Vec::with_capacity(counts.len());
    let mut running: Option<(String, u64)> = None;
    for ((country, year), count) in counts {
        let cumulative = match &mut running {
            Some((current, total)) if *current == country => {
                *total += count;
                *total
            }
            _ => {
                running = Some((country.clone(), count));
                count
            }
        };
        rows.push(CumulativeCount {
            country,
            year,
            cumulative,
        });
    }
    rows
}
