//! Chart layer: turns a merged [`Dataset`] into a plotly figure.
//!
//! `builder` produces the marker layers and per-year frames, `layout`
//! wires the dropdowns and the year slider around them.

pub mod builder;
pub mod figure;
pub mod layout;

use crate::config::ChartConfig;
use crate::data::model::Dataset;
use crate::error::PipelineError;

use builder::ChartBuilder;
use figure::{Figure, LatLon};

/// Build the complete animated figure for a dataset.
pub fn build_figure(dataset: &Dataset, cfg: &ChartConfig) -> Result<Figure, PipelineError> {
    let colors = cfg.color_map()?;
    let chart = ChartBuilder::new(dataset, &colors, cfg.marker_size).build()?;

    let (lat, lon) = dataset.center().ok_or(PipelineError::EmptyDataset)?;
    let layout = layout::configure(&chart, LatLon { lat, lon }, cfg);

    Ok(Figure {
        data: chart.initial,
        layout,
        frames: chart.frames,
    })
}
