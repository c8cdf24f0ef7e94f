pub mod date;
pub mod share;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Columns the input header row must carry. Load fails fast if any is absent.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "year",
    "category",
    "prize_share",
    "birth_date",
    "birth_country_current",
    "ISO",
    "birth_city",
    "organization_name",
    "organization_city",
    "organization_country",
];

/// One award record as it appears in the CSV, before derivation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    year: i32,
    category: String,
    prize_share: String,
    birth_date: Option<String>,
    birth_country_current: Option<String>,
    #[serde(rename = "ISO")]
    iso: Option<String>,
    birth_city: Option<String>,
    organization_name: Option<String>,
    organization_city: Option<String>,
    organization_country: Option<String>,
}

/// One award record with derived fields attached. Immutable once built:
/// every aggregation pass reads a `&[Record]` and produces its own output.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub category: String,
    pub prize_share: String,
    pub birth_date: Option<NaiveDate>,
    pub birth_country_current: Option<String>,
    pub iso: Option<String>,
    pub birth_city: Option<String>,
    pub organization_name: Option<String>,
    pub organization_city: Option<String>,
    pub organization_country: Option<String>,
    /// `100 * num / den` of `prize_share`; `None` when the fraction is
    /// malformed. Always in `(0, 100]` when present.
    pub share_pct: Option<f64>,
    /// `year - birth_year`; `None` exactly when `birth_date` is `None`.
    pub winning_age: Option<i32>,
}

/// Load the full record set from `path`, deriving `share_pct` and
/// `winning_age` on the way in.
///
/// Missing required columns or a row that fails CSV-level parsing are fatal.
/// Per-value problems (unparseable `birth_date`, malformed `prize_share`)
/// leave the derived field missing for that record only.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open input CSV {}", path.display()))?;

    let headers = rdr
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!(
            "input {} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        );
    }

    let mut records = Vec::new();
    for (idx, row) in rdr.deserialize::<RawRecord>().enumerate() {
        let raw =
            row.with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        records.push(derive(raw));
    }
    info!(count = records.len(), "loaded records");
    Ok(records)
}

fn derive(raw: RawRecord) -> Record {
    let birth_date = match raw.birth_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => {
            let parsed = date::parse_birth_date(s);
            if parsed.is_none() {
                warn!(value = s, "unparseable birth_date, treating as missing");
            }
            parsed
        }
    };
    let share_pct = share::parse_share_pct(&raw.prize_share);
    if share_pct.is_none() {
        warn!(value = %raw.prize_share, "malformed prize_share, treating as missing");
    }
    let winning_age = birth_date.map(|d| raw.year - d.year());

    Record {
        year: raw.year,
        category: raw.category,
        prize_share: raw.prize_share,
        birth_date,
        birth_country_current: non_empty(raw.birth_country_current),
        iso: non_empty(raw.iso),
        birth_city: non_empty(raw.birth_city),
        organization_name: non_empty(raw.organization_name),
        organization_city: non_empty(raw.organization_city),
        organization_country: non_empty(raw.organization_country),
        share_pct,
        winning_age,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,prizecrunch::ingest=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const HEADER: &str = "year,category,prize_share,birth_date,birth_country_current,ISO,birth_city,organization_name,organization_city,organization_country";

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().expect("create temp csv");
        writeln!(tmp, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(tmp, "{}", row).unwrap();
        }
        tmp
    }

    #[test]
    fn loads_and_derives_fields() -> Result<()> {
        init_test_logging();
        let tmp = write_csv(&[
            "1901,Chemistry,1/1,1852-08-30,Netherlands,NLD,Rotterdam,Berlin University,Berlin,Germany",
            "1903,Physics,1/4,1867-11-07,Poland,POL,Warsaw,Sorbonne University,Paris,France",
        ]);

        let records = load_records(tmp.path())?;
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.year, 1901);
        assert_eq!(first.category, "Chemistry");
        assert_eq!(first.share_pct, Some(100.0));
        assert_eq!(first.winning_age, Some(1901 - 1852));
        assert_eq!(first.birth_country_current.as_deref(), Some("Netherlands"));
        assert_eq!(first.iso.as_deref(), Some("NLD"));

        let second = &records[1];
        assert_eq!(second.share_pct, Some(25.0));
        assert_eq!(second.winning_age, Some(36));
        Ok(())
    }

    #[test]
    fn missing_required_column_is_fatal() {
        init_test_logging();
        let mut tmp = NamedTempFile::new().expect("create temp csv");
        writeln!(tmp, "year,category,prize_share").unwrap();
        writeln!(tmp, "1901,Peace,1/2").unwrap();

        let err = load_records(tmp.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing required columns"), "got: {}", msg);
        assert!(msg.contains("birth_date"), "got: {}", msg);
        assert!(msg.contains("ISO"), "got: {}", msg);
    }

    #[test]
    fn extra_columns_are_tolerated() -> Result<()> {
        init_test_logging();
        let mut tmp = NamedTempFile::new().expect("create temp csv");
        writeln!(tmp, "{},laureate_type", HEADER).unwrap();
        writeln!(
            tmp,
            "1901,Peace,1/2,1828-05-08,Switzerland,CHE,Geneva,,,,Individual"
        )
        .unwrap();

        let records = load_records(tmp.path())?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].share_pct, Some(50.0));
        Ok(())
    }

    #[test]
    fn malformed_values_become_missing_not_fatal() -> Result<()> {
        init_test_logging();
        // institutional recipient: no birth_date, broken share
        let tmp = write_csv(&[
            "1917,Peace,abc,,,,,Red Cross,Geneva,Switzerland",
            "1901,Medicine,1/1,not-a-date,Germany,DEU,Hansdorf,Marburg University,Marburg,Germany",
        ]);

        let records = load_records(tmp.path())?;
        assert_eq!(records[0].share_pct, None);
        assert_eq!(records[0].birth_date, None);
        assert_eq!(records[0].winning_age, None);
        assert_eq!(records[0].birth_country_current, None);

        assert_eq!(records[1].share_pct, Some(100.0));
        assert_eq!(records[1].birth_date, None);
        assert_eq!(records[1].winning_age, None);
        Ok(())
    }

    #[test]
    fn unreadable_file_is_fatal() {
        init_test_logging();
        assert!(load_records("definitely/not/here.csv").is_err());
    }

    #[test]
    fn winning_age_present_iff_birth_date_present() -> Result<()> {
        init_test_logging();
        let tmp = write_csv(&[
            "2000,Physics,1/2,1930-01-15,USA,USA,Chicago,MIT,Cambridge MA,USA",
            "2000,Peace,1/1,,,,,UN,New York NY,USA",
        ]);

        let records = load_records(tmp.path())?;
        for r in &records {
            assert_eq!(r.winning_age.is_some(), r.birth_date.is_some());
        }
        assert_eq!(records[0].winning_age, Some(70));
        Ok(())
    }
}
