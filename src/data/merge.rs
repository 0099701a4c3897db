use super::model::{Dataset, Measurement, Record, SourceSummary, SourceTable};
use crate::error::PipelineError;

/// Text shown for a site where no coliform measurement was taken.
pub const DEFAULT_MISSING_PLACEHOLDER: &str = "No hubo medición";

/// Concatenate cleaned tables in the given order.
///
/// Missing coliform values become `placeholder`. A table with zero kept
/// rows still counts as loaded; only an empty `tables` is an error.
pub fn merge(tables: Vec<SourceTable>, placeholder: &str) -> Result<Dataset, PipelineError> {
    if tables.is_empty() {
        return Err(PipelineError::NoValidFiles);
    }

    let total: usize = tables.iter().map(|t| t.observations.len()).sum();
    let mut records = Vec::with_capacity(total);
    let mut sources = Vec::with_capacity(tables.len());

    for table in tables {
        sources.push(SourceSummary {
            file_name: table.file_name,
            body_type: table.body_type,
            rows_read: table.rows_read,
            rows_kept: table.observations.len(),
        });

        records.extend(table.observations.into_iter().map(|obs| Record {
            site: obs.site,
            year: obs.year,
            latitude: obs.latitude,
            longitude: obs.longitude,
            quality: obs.quality,
            coliform: obs
                .coliform
                .unwrap_or_else(|| Measurement::Text(placeholder.to_string())),
            body_type: obs.body_type,
        }));
    }

    log::info!("Merged {} records from {} files", records.len(), sources.len());

    Ok(Dataset { records, sources })
}
