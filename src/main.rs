//! pcos-risk entrypoint: loads the model artifacts once, then scores one JSON
//! observation per stdin line and writes one JSON response per stdout line.

use pcos_risk::{
    config::ServiceConfig,
    logging::StructuredLogger,
    pipeline::InferenceContext,
    transport::score_lines,
};
use std::io::BufWriter;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("PCOS_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = ServiceConfig::load(&config_path)?;

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(
        config = %config_path.display(),
        model = %config.model.path.display(),
        schema = %config.schema.path.display(),
        "pcos-risk starting"
    );

    let context = InferenceContext::load(&config)?;

    let stdin = std::io::stdin();
    let mut out = BufWriter::new(std::io::stdout().lock());
    let stats = score_lines(&context, stdin.lock(), &mut out)?;

    info!(scored = stats.scored, rejected = stats.rejected, "pcos-risk done");
    Ok(())
}
