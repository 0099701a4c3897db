use std::io::Write;
use std::path::PathBuf;

use crate::chart::build_figure;
use crate::config::Config;
use crate::data::loader::load_file;
use crate::data::merge::merge;
use crate::data::model::{Dataset, SourceTable};
use crate::error::PipelineError;
use crate::render::{self, RenderOptions};

/// What a successful run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Source files that did not exist.
    pub missing: Vec<PathBuf>,
    /// Source files that existed but could not be read.
    pub rejected: Vec<String>,
    pub dataset: Dataset,
    pub frames: usize,
    pub output: PathBuf,
}

impl RunReport {
    /// One line per loaded source, then one per rejected source.
    pub fn summary(&self) -> Vec<String> {
        let loaded = self.dataset.sources.iter().map(|s| {
            format!(
                "{} ({}): {} of {} rows kept",
                s.file_name, s.body_type, s.rows_kept, s.rows_read
            )
        });
        let rejected = self.rejected.iter().map(|msg| format!("skipped {msg}"));
        loaded.chain(rejected).collect()
    }
}

/// Result of trying every configured source.
#[derive(Debug, Default)]
pub struct LoadedSources {
    /// Tables that loaded, in configuration order.
    pub tables: Vec<SourceTable>,
    pub missing: Vec<PathBuf>,
    /// Messages for files that were present but unreadable.
    pub rejected: Vec<String>,
}

/// Load every configured source, skipping the ones that fail.
///
/// Each missing file gets one line on `out` and a warning in the log.
pub fn load_sources<W: Write>(
    config: &Config,
    out: &mut W,
) -> Result<LoadedSources, PipelineError> {
    let mut loaded = LoadedSources::default();

    for path in config.source_paths() {
        match load_file(&path) {
            Ok(table) => loaded.tables.push(table),
            Err(e) if e.is_not_found() => {
                log::warn!("{e}");
                writeln!(out, "Error: {e}").map_err(PipelineError::Diagnostics)?;
                loaded.missing.push(path);
            }
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                loaded.rejected.push(e.to_string());
            }
        }
    }

    Ok(loaded)
}

/// Run the whole dashboard: load, merge, build, export, show.
///
/// Diagnostics for the user go to `out`. No document is written when no
/// source could be loaded or no complete rows remain.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<RunReport, PipelineError> {
    let loaded = load_sources(config, out)?;

    let dataset = match merge(loaded.tables, &config.missing_placeholder) {
        Ok(ds) => ds,
        Err(e) => return fail(out, e),
    };

    let figure = match build_figure(&dataset, &config.chart) {
        Ok(figure) => figure,
        Err(e @ PipelineError::EmptyDataset) => return fail(out, e),
        Err(e) => return Err(e),
    };
    let opts = RenderOptions {
        cdn_url: config.cdn_url.clone(),
        page_title: config.chart.title.clone(),
    };
    render::export(&figure, &opts, &config.output)?;

    if config.open_viewer {
        render::show(&config.output);
    }

    Ok(RunReport {
        missing: loaded.missing,
        rejected: loaded.rejected,
        frames: figure.frames.len(),
        dataset,
        output: config.output.clone(),
    })
}

/// Report a terminal condition on `out` and in the log.
fn fail<W: Write>(out: &mut W, err: PipelineError) -> Result<RunReport, PipelineError> {
    log::error!("{err}");
    writeln!(out, "{err}").map_err(PipelineError::Diagnostics)?;
    Err(err)
}
