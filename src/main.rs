use std::process::ExitCode;

use anyhow::Context;
use geodash::config::Config;
use geodash::error::PipelineError;
use geodash::pipeline;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load().context("loading configuration")?;

    match pipeline::run(&config, &mut std::io::stdout()) {
        Ok(report) => {
            for line in report.summary() {
                log::info!("{line}");
            }
            log::info!(
                "{} records, {} frames, {} missing sources -> {}",
                report.dataset.len(),
                report.frames,
                report.missing.len(),
                report.output.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        // Already reported on stdout by the pipeline.
        Err(PipelineError::NoValidFiles | PipelineError::EmptyDataset) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e).context("building dashboard"),
    }
}
