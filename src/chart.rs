use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

/// What the external renderer should do with a prepared table. The pipeline
/// never styles or draws anything itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    ScatterTrend,
    BarH,
    Choropleth,
    StackedBarH,
    Line,
    Sunburst,
    Histogram,
    Regression,
}

/// A prepared summary table plus rendering instructions.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub name: String,
    pub title: String,
    pub kind: ChartKind,
    pub data: serde_json::Value,
}

impl ChartSpec {
    pub fn new<T: Serialize>(name: &str, title: &str, kind: ChartKind, rows: &[T]) -> Result<Self> {
        let data = serde_json::to_value(rows)
            .with_context(|| format!("failed to serialize rows for chart {}", name))?;
        Ok(ChartSpec {
            name: name.to_string(),
            title: title.to_string(),
            kind,
            data,
        })
    }
}

/// The external charting collaborator. Given a spec it produces some visual
/// artifact; how is its business.
pub trait ChartSink {
    fn render(&self, chart: &ChartSpec) -> Result<()>;
}

/// Sink that writes each spec as pretty JSON under `out_dir`, one file per
/// chart, for an out-of-process renderer to pick up.
pub struct JsonDirSink {
    out_dir: PathBuf,
}

impl JsonDirSink {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create chart dir {}", out_dir.display()))?;
        Ok(JsonDirSink { out_dir })
    }
}

impl ChartSink for JsonDirSink {
    fn render(&self, chart: &ChartSpec) -> Result<()> {
        let path = self.out_dir.join(format!("{}.json", chart.name));

        // write atomically: to tmp file, then rename over original
        let tmp_path = self.out_dir.join(format!(".{}.json.tmp", chart.name));
        let mut tmp = fs::File::create(&tmp_path)
            .with_context(|| format!("failed to create {}", tmp_path.display()))?;
        serde_json::to_writer_pretty(&mut tmp, chart)
            .with_context(|| format!("failed to serialize chart {}", chart.name))?;
        tmp.write_all(b"\n")?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("failed to move {} into place", path.display()))?;

        info!(chart = %chart.name, path = %path.display(), "wrote chart");
        Ok(())
    }
}

/// Test double that records every spec handed to it.
#[cfg(test)]
pub struct CollectSink(pub std::sync::Mutex<Vec<ChartSpec>>);

#[cfg(test)]
impl CollectSink {
    pub fn new() -> Self {
        CollectSink(std::sync::Mutex::new(Vec::new()))
    }

    pub fn names(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
impl ChartSink for CollectSink {
    fn render(&self, chart: &ChartSpec) -> Result<()> {
        self.0.lock().unwrap().push(chart.clone());
        Ok(())
    }
}
