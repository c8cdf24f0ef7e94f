use super::{count_by, top_n_ascending, TOP_N};
use crate::ingest::Record;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgHierarchyCount {
    pub country: String,
    pub city: String,
    pub name: String,
    pub count: u64,
}

/// Top 20 research institutions by prize count, ascending. Unaffiliated
/// recipients carry no organization and are skipped.
pub fn top_organizations(records: &[Record]) -> Vec<OrgCount> {
    top_n_ascending(count_by(records, |r| r.organization_name.as_deref()), TOP_N)
        .into_iter()
        .map(|(name, count)| OrgCount { name, count })
        .collect()
}

/// Top 20 cities hosting prize-winning institutions, ascending.
pub fn top_org_cities(records: &[Record]) -> Vec<CityCount> {
    top_n_ascending(count_by(records, |r| r.organization_city.as_deref()), TOP_N)
        .into_iter()
        .map(|(city, count)| CityCount { city, count })
        .collect()
}

/// Top 20 laureate birth cities, ascending.
pub fn top_birth_cities(records: &[Record]) -> Vec<CityCount> {
    top_n_ascending(count_by(records, |r| r.birth_city.as_deref()), TOP_N)
        .into_iter()
        .map(|(city, count)| CityCount { city, count })
        .collect()
}

/// Prize count per (organization country, city, name) triple, descending by
/// count. Feeds the hierarchical (sunburst) breakdown; rows missing any level
/// are skipped.
pub fn org_hierarchy(records: &[Record]) -> Vec<OrgHierarchyCount> {
    let mut counts: BTreeMap<(String, String, String), u64> = BTreeMap::new();
    for r in records {
        if let (Some(country), Some(city), Some(name)) = (
            &r.organization_country,
            &r.organization_city,
            &r.organization_name,
        ) {
            *counts
                .entry((country.clone(), city.clone(), name.clone()))
                .or_default() += 1;
        }
    }

    let mut rows: Vec<OrgHierarchyCount> = counts
        .into_iter()
        .map(|((country, city, name), count)| OrgHierarchyCount {
            country,
            city,
            name,
            count,
        })
        .collect();
    // descending by count, key order breaks ties deterministically
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}
