//! Serialisable plotly figure.
//!
//! Field names follow plotly.js attribute names so the struct tree can be
//! handed to `Plotly.newPlot` as-is.

use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub frames: Vec<Frame>,
}

// ---------------------------------------------------------------------------
// Traces and frames
// ---------------------------------------------------------------------------

/// A `scattermapbox` marker layer.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub marker: Marker,
    /// `[site, quality, coliform]` per point.
    pub customdata: Vec<[JsonValue; 3]>,
    pub hovertemplate: String,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub size: f64,
    pub color: Vec<String>,
}

/// One animation step.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub name: String,
    pub data: Vec<Trace>,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub mapbox: Mapbox,
    pub title: Title,
    pub font: Font,
    pub annotations: Vec<Annotation>,
    pub updatemenus: Vec<UpdateMenu>,
    pub sliders: Vec<Slider>,
    pub margin: Margin,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mapbox {
    pub style: String,
    pub zoom: f64,
    pub center: LatLon,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: Font,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub text: String,
    pub showarrow: bool,
    pub x: f64,
    pub xanchor: &'static str,
    pub y: f64,
    pub yanchor: &'static str,
    pub yref: &'static str,
    pub align: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

/// A dropdown menu.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateMenu {
    pub buttons: Vec<Button>,
    pub direction: &'static str,
    pub showactive: bool,
    pub x: f64,
    pub xanchor: &'static str,
    pub y: f64,
    pub yanchor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub method: &'static str,
    pub label: String,
    pub args: Vec<JsonValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Slider {
    pub active: usize,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    pub currentvalue: CurrentValue,
    pub pad: Pad,
    pub len: f64,
    pub x: f64,
    pub y: f64,
    pub steps: Vec<SliderStep>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentValue {
    pub prefix: String,
    pub font: Font,
    pub visible: bool,
    pub xanchor: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pad {
    pub b: u32,
    pub t: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderStep {
    pub method: &'static str,
    pub label: String,
    pub args: Vec<JsonValue>,
}
