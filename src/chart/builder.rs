use serde_json::Value as JsonValue;

use super::figure::{Frame, Marker, Trace};
use crate::color::ColorMap;
use crate::data::model::{Dataset, WaterBodyType};
use crate::error::PipelineError;

const HOVER_TEMPLATE: &str =
    "Sitio: %{customdata[0]}<br>Calidad: %{customdata[1]}<br>Coliformes Fec: %{customdata[2]}";

/// Initial layers plus the per-year animation frames.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub years: Vec<i32>,
    pub body_types: Vec<WaterBodyType>,
    /// One layer per type for the earliest year, named by type label.
    pub initial: Vec<Trace>,
    /// One frame per year, ascending.
    pub frames: Vec<Frame>,
}

/// Builds marker layers from a merged dataset.
pub struct ChartBuilder<'a> {
    dataset: &'a Dataset,
    colors: &'a ColorMap,
    marker_size: f64,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(dataset: &'a Dataset, colors: &'a ColorMap, marker_size: f64) -> Self {
        Self {
            dataset,
            colors,
            marker_size,
        }
    }

    /// Build initial layers and frames. Fails on a dataset with no rows.
    pub fn build(&self) -> Result<ChartData, PipelineError> {
        let years = self.dataset.years();
        let body_types = self.dataset.body_types();
        let first_year = *years.first().ok_or(PipelineError::EmptyDataset)?;

        let initial = body_types
            .iter()
            .map(|&t| self.layer(first_year, t, t.label().to_string()))
            .collect();

        // The first year is repeated here so the slider can return to it.
        let frames = years
            .iter()
            .map(|&year| Frame {
                name: year.to_string(),
                data: body_types
                    .iter()
                    .map(|&t| self.layer(year, t, format!("{} - {year}", t.label())))
                    .collect(),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Built {} frames x {} layers ({:?})",
            frames.len(),
            body_types.len(),
            years
        );

        Ok(ChartData {
            years,
            body_types,
            initial,
            frames,
        })
    }

    /// One layer for a year/type pair. Empty when no rows match.
    pub fn layer(&self, year: i32, body_type: WaterBodyType, name: String) -> Trace {
        let mut lat = Vec::new();
        let mut lon = Vec::new();
        let mut color = Vec::new();
        let mut customdata = Vec::new();

        for r in self.dataset.select(year, body_type) {
            lat.push(r.latitude);
            lon.push(r.longitude);
            color.push(self.colors.hex_for(&r.quality));
            customdata.push([
                JsonValue::String(r.site.clone()),
                JsonValue::String(r.quality.label().to_string()),
                r.coliform.to_json(),
            ]);
        }

        Trace {
            kind: "scattermapbox",
            mode: "markers",
            name,
            lat,
            lon,
            marker: Marker {
                size: self.marker_size,
                color,
            },
            customdata,
            hovertemplate: HOVER_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Measurement, QualityCategory, Record};

    fn rec(site: &str, year: i32, t: WaterBodyType, q: QualityCategory) -> Record {
        Record {
            site: site.to_string(),
            year,
            latitude: 20.0,
            longitude: -87.0,
            quality: q,
            coliform: Measurement::Text("No hubo medición".into()),
            body_type: t,
        }
    }

    fn sample() -> Dataset {
        Dataset {
            records: vec![
                rec("C1", 2019, WaterBodyType::Coastal, QualityCategory::Good),
                rec("L1", 2018, WaterBodyType::Lotic, QualityCategory::Contaminated),
                rec("C2", 2020, WaterBodyType::Coastal, QualityCategory::Acceptable),
                rec("L2", 2019, WaterBodyType::Lotic, QualityCategory::parse("Otra")),
            ],
            sources: Vec::new(),
        }
    }

    #[test]
    fn one_frame_per_year_with_one_layer_per_type() {
        let ds = sample();
        let colors = ColorMap::default();
        let chart = ChartBuilder::new(&ds, &colors, 10.0).build().unwrap();

        assert_eq!(chart.years, vec![2018, 2019, 2020]);
        let names: Vec<_> = chart.frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["2018", "2019", "2020"]);
        for frame in &chart.frames {
            assert_eq!(frame.data.len(), 2);
        }
        // 2018 has no coastal rows; the layer is still there, empty.
        assert!(chart.frames[0].data[0].is_empty());
        assert_eq!(chart.frames[0].data[0].name, "Costero - 2018");
        assert_eq!(chart.frames[0].data[1].len(), 1);
    }

    #[test]
    fn initial_layers_use_earliest_year_and_type_labels() {
        let ds = sample();
        let colors = ColorMap::default();
        let chart = ChartBuilder::new(&ds, &colors, 10.0).build().unwrap();

        let names: Vec<_> = chart.initial.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Costero", "Lótico"]);
        assert!(chart.initial[0].is_empty());
        assert_eq!(chart.initial[1].marker.color, vec!["#ff0000".to_string()]);
    }

    #[test]
    fn hover_data_and_unknown_quality_colour() {
        let ds = sample();
        let colors = ColorMap::default();
        let builder = ChartBuilder::new(&ds, &colors, 12.0);
        let layer = builder.layer(2019, WaterBodyType::Lotic, "x".into());

        assert_eq!(layer.marker.size, 12.0);
        assert_eq!(layer.marker.color, vec!["#808080".to_string()]);
        assert_eq!(layer.customdata[0][0], JsonValue::from("L2"));
        assert_eq!(layer.customdata[0][1], JsonValue::from("Otra"));
        assert_eq!(layer.customdata[0][2], JsonValue::from("No hubo medición"));
        assert!(layer.hovertemplate.starts_with("Sitio: %{customdata[0]}"));
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let ds = Dataset::default();
        let colors = ColorMap::default();
        let err = ChartBuilder::new(&ds, &colors, 10.0).build().unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
    }
}
