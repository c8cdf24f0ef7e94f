use anyhow::Result;
use prizecrunch::{chart::JsonDirSink, config::Config, pipeline};
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "prizecrunch.yaml".to_string());
    let config = Config::load(&config_path)?;
    info!(
        input = %config.input_path.display(),
        out = %config.out_dir.display(),
        passes = config.selected().len(),
        "configured"
    );

    // ─── 3) run the pipeline ─────────────────────────────────────────
    let sink = JsonDirSink::new(&config.out_dir)?;
    pipeline::run(&config, &sink)?;

    info!("all done");
    Ok(())
}
