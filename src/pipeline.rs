use crate::{
    age,
    aggregate::{geo, orgs, yearly},
    chart::{ChartKind, ChartSink, ChartSpec},
    config::{Config, Pass},
    ingest::{self, Record},
};
use anyhow::Result;
use rayon::prelude::*;
use tracing::info;

/// Load the record set and run everything: the configured aggregation passes
/// plus the age analysis.
pub fn run(config: &Config, sink: &dyn ChartSink) -> Result<()> {
    let records = ingest::load_records(&config.input_path)?;
    run_passes(&records, &config.selected(), sink)?;
    run_age_analysis(&records, sink)?;
    Ok(())
}

/// Run the selected passes over the immutable record set. Each pass is a pure
/// function of `records`, so they run in parallel; results are handed to the
/// sink in the order the passes were selected.
#[tracing::instrument(level = "info", skip(records, passes, sink), fields(passes = passes.len()))]
pub fn run_passes(records: &[Record], passes: &[Pass], sink: &dyn ChartSink) -> Result<()> {
    let specs: Vec<Result<ChartSpec>> = passes
        .par_iter()
        .map(|pass| build_chart(records, *pass))
        .collect();
    for spec in specs {
        sink.render(&spec?)?;
    }
    Ok(())
}

fn build_chart(records: &[Record], pass: Pass) -> Result<ChartSpec> {
    match pass {
        Pass::PrizesPerYear => ChartSpec::new(
            "prizes_per_year",
            "Number of prizes awarded per year",
            ChartKind::ScatterTrend,
            &yearly::prizes_per_year(records),
        ),
        Pass::AvgSharePerYear => ChartSpec::new(
            "avg_share_per_year",
            "Average prize share over time",
            ChartKind::ScatterTrend,
            &yearly::avg_share_per_year(records),
        ),
        Pass::TopCountries => ChartSpec::new(
            "top_countries",
            "Top 20 countries by number of prizes",
            ChartKind::BarH,
            &geo::top_countries(records),
        ),
        Pass::CountryTotals => ChartSpec::new(
            "country_totals",
            "Global distribution of prizes",
            ChartKind::Choropleth,
            &geo::country_totals(records),
        ),
        Pass::CategoryByCountry => ChartSpec::new(
            "category_by_country",
            "Top 20 countries by number of prizes and category",
            ChartKind::StackedBarH,
            &geo::category_by_country(records),
        ),
        Pass::CumulativeByCountry => ChartSpec::new(
            "cumulative_by_country",
            "Cumulative prizes by country over time",
            ChartKind::Line,
            &geo::cumulative_by_country(records),
        ),
        Pass::TopOrganizations => ChartSpec::new(
            "top_organizations",
            "Top 20 research institutions by number of prizes",
            ChartKind::BarH,
            &orgs::top_organizations(records),
        ),
        Pass::TopOrgCities => ChartSpec::new(
            "top_org_cities",
            "Which cities do the most research?",
            ChartKind::BarH,
            &orgs::top_org_cities(records),
        ),
        Pass::TopBirthCities => ChartSpec::new(
            "top_birth_cities",
            "Where were the laureates born?",
            ChartKind::BarH,
            &orgs::top_birth_cities(records),
        ),
        Pass::OrgHierarchy => ChartSpec::new(
            "org_hierarchy",
            "Where do discoveries take place?",
            ChartKind::Sunburst,
            &orgs::org_hierarchy(records),
        ),
    }
}

/// Log the oldest and youngest winners and hand the raw age samples to the
/// sink, once as histogram input and once as regression input. Binning and
/// LOWESS smoothing are the renderer's job.
pub fn run_age_analysis(records: &[Record], sink: &dyn ChartSink) -> Result<()> {
    match age::extremes(records) {
        Some(ext) => {
            info!(
                year = ext.oldest.year,
                category = %ext.oldest.category,
                age = ext.oldest.winning_age.unwrap_or_default(),
                country = ext.oldest.birth_country_current.as_deref().unwrap_or("unknown"),
                "oldest winner"
            );
            info!(
                year = ext.youngest.year,
                category = %ext.youngest.category,
                age = ext.youngest.winning_age.unwrap_or_default(),
                country = ext.youngest.birth_country_current.as_deref().unwrap_or("unknown"),
                "youngest winner"
            );
        }
        None => info!("no records with a computable winning age"),
    }

    let samples = age::age_samples(records);
    if samples.is_empty() {
        return Ok(());
    }
    sink.render(&ChartSpec::new(
        "age_distribution",
        "Distribution of age on receipt of prize",
        ChartKind::Histogram,
        &samples,
    )?)?;
    sink.render(&ChartSpec::new(
        "age_trend",
        "Winning age over time, overall and per category",
        ChartKind::Regression,
        &samples,
    )?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::CollectSink;
    use chrono::NaiveDate;

    fn record(year: i32, country: &str) -> Record {
        Record {
            year,
            category: "Physics".to_string(),
            prize_share: "1/2".to_string(),
            birth_date: NaiveDate::from_ymd_opt(year - 40, 1, 1),
            birth_country_current: Some(country.to_string()),
            iso: Some("XX".to_string()),
            birth_city: Some("Springfield".to_string()),
            organization_name: Some("State University".to_string()),
            organization_city: Some("Springfield".to_string()),
            organization_country: Some(country.to_string()),
            share_pct: Some(50.0),
            winning_age: Some(40),
        }
    }

    #[test]
    fn all_passes_produce_one_chart_each() -> Result<()> {
        let records = vec![record(1901, "Sweden"), record(1902, "Norway")];
        let sink = CollectSink::new();

        run_passes(&records, &Pass::ALL, &sink)?;

        let names = sink.names();
        assert_eq!(names.len(), Pass::ALL.len());
        assert!(names.contains(&"prizes_per_year".to_string()));
        assert!(names.contains(&"org_hierarchy".to_string()));
        Ok(())
    }

    #[test]
    fn pass_subset_renders_only_that_subset() -> Result<()> {
        let records = vec![record(1901, "Sweden")];
        let sink = CollectSink::new();

        run_passes(&records, &[Pass::TopCountries, Pass::PrizesPerYear], &sink)?;

        assert_eq!(
            sink.names(),
            vec!["top_countries".to_string(), "prizes_per_year".to_string()]
        );
        Ok(())
    }

    #[test]
    fn age_analysis_renders_histogram_and_regression() -> Result<()> {
        let records = vec![record(1901, "Sweden")];
        let sink = CollectSink::new();

        run_age_analysis(&records, &sink)?;

        assert_eq!(
            sink.names(),
            vec!["age_distribution".to_string(), "age_trend".to_string()]
        );
        let specs = sink.0.lock().unwrap();
        assert_eq!(specs[0].data[0]["winning_age"], 40);
        Ok(())
    }

    #[test]
    fn age_analysis_with_no_ages_renders_nothing() -> Result<()> {
        let mut r = record(1917, "Switzerland");
        r.birth_date = None;
        r.winning_age = None;
        let sink = CollectSink::new();

        run_age_analysis(&[r], &sink)?;
        assert!(sink.names().is_empty());
        Ok(())
    }

    #[test]
    fn end_to_end_from_csv_to_chart_files() -> Result<()> {
        use std::io::Write;

        let mut csv = tempfile::NamedTempFile::new()?;
        writeln!(csv, "year,category,prize_share,birth_date,birth_country_current,ISO,birth_city,organization_name,organization_city,organization_country")?;
        writeln!(csv, "1901,Physics,1/1,1845-03-27,Germany,DEU,Lennep,Munich University,Munich,Germany")?;
        writeln!(csv, "1903,Physics,1/4,1867-11-07,Poland,POL,Warsaw,Sorbonne University,Paris,France")?;

        let out = tempfile::tempdir()?;
        let config = Config {
            input_path: csv.path().to_path_buf(),
            out_dir: out.path().to_path_buf(),
            passes: Some(vec![Pass::PrizesPerYear, Pass::TopCountries]),
        };
        let sink = crate::chart::JsonDirSink::new(&config.out_dir)?;

        run(&config, &sink)?;

        for name in ["prizes_per_year", "top_countries", "age_distribution", "age_trend"] {
            assert!(
                out.path().join(format!("{}.json", name)).exists(),
                "missing chart {}",
                name
            );
        }
        let top: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
            out.path().join("top_countries.json"),
        )?)?;
        assert_eq!(top["data"].as_array().unwrap().len(), 2);
        Ok(())
    }

    #[test]
    fn empty_record_set_is_not_an_error() -> Result<()> {
        let sink = CollectSink::new();
        run_passes(&[], &Pass::ALL, &sink)?;
        run_age_analysis(&[], &sink)?;
        // every chart is rendered, each with an empty table
        assert_eq!(sink.names().len(), Pass::ALL.len());
        Ok(())
    }
}
