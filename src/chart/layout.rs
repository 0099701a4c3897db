use serde_json::json;

use super::builder::ChartData;
use super::figure::{
    Annotation, Button, CurrentValue, Font, LatLon, Layout, Mapbox, Margin, Pad, Slider,
    SliderStep, Title, UpdateMenu,
};
use crate::config::ChartConfig;
use crate::data::filter::{selections, visibility_mask};

/// Base tile styles offered by the map-style dropdown: (label, style).
pub const MAP_STYLES: [(&str, &str); 2] = [
    ("Open Street Map", "open-street-map"),
    ("Carto Positron", "carto-positron"),
];

const MAP_MENU_X: f64 = 0.01;
const TYPE_MENU_X: f64 = 0.11;
const MENU_Y: f64 = 1.045;
const LABEL_Y: f64 = 1.068;

/// Assemble the layout: map, dropdowns, year slider, titles.
pub fn configure(chart: &ChartData, center: LatLon, cfg: &ChartConfig) -> Layout {
    let font = Font {
        family: Some(cfg.font_family.clone()),
        size: None,
        color: Some(cfg.font_color.clone()),
    };

    Layout {
        mapbox: Mapbox {
            style: MAP_STYLES[0].1.to_string(),
            zoom: cfg.zoom,
            center,
        },
        title: Title {
            text: cfg.title.clone(),
            x: 0.01,
            y: 0.991,
            font: Font {
                size: Some(20.0),
                ..font.clone()
            },
        },
        font,
        annotations: vec![
            menu_label("Tipo de mapa:", MAP_MENU_X),
            menu_label("Tipo de agua:", TYPE_MENU_X),
        ],
        updatemenus: vec![map_style_menu(), type_menu(chart)],
        sliders: vec![year_slider(&chart.years, cfg.transition_ms)],
        margin: Margin {
            r: 0,
            t: 100,
            l: 0,
            b: 15,
        },
    }
}

fn menu_label(text: &str, x: f64) -> Annotation {
    Annotation {
        text: text.to_string(),
        showarrow: false,
        x,
        xanchor: "left",
        y: LABEL_Y,
        yanchor: "top",
        yref: "paper",
        align: "left",
    }
}

fn dropdown(buttons: Vec<Button>, x: f64) -> UpdateMenu {
    UpdateMenu {
        buttons,
        direction: "down",
        showactive: true,
        x,
        xanchor: "left",
        y: MENU_Y,
        yanchor: "top",
    }
}

/// Switches the base tile layer in place.
pub fn map_style_menu() -> UpdateMenu {
    let buttons = MAP_STYLES
        .iter()
        .map(|(label, style)| Button {
            method: "relayout",
            label: label.to_string(),
            args: vec![json!("mapbox.style"), json!(style)],
        })
        .collect();
    dropdown(buttons, MAP_MENU_X)
}

/// Shows one water-body type at a time, or all of them.
pub fn type_menu(chart: &ChartData) -> UpdateMenu {
    let layer_names: Vec<&str> = chart.initial.iter().map(|t| t.name.as_str()).collect();
    let buttons = selections(&chart.body_types)
        .into_iter()
        .map(|sel| Button {
            method: "update",
            label: sel.label().to_string(),
            args: vec![json!({ "visible": visibility_mask(&layer_names, sel) })],
        })
        .collect();
    dropdown(buttons, TYPE_MENU_X)
}

/// One animate step per year.
pub fn year_slider(years: &[i32], transition_ms: u64) -> Slider {
    let steps = years
        .iter()
        .map(|year| {
            let name = year.to_string();
            SliderStep {
                method: "animate",
                args: vec![
                    json!([name]),
                    json!({
                        "frame": { "duration": transition_ms, "redraw": true },
                        "mode": "immediate",
                        "transition": { "duration": transition_ms },
                    }),
                ],
                label: name,
            }
        })
        .collect();

    Slider {
        active: 0,
        xanchor: "left",
        yanchor: "top",
        currentvalue: CurrentValue {
            prefix: "Año: ".to_string(),
            font: Font {
                size: Some(20.0),
                ..Font::default()
            },
            visible: true,
            xanchor: "right",
        },
        pad: Pad { b: 23, t: 30 },
        len: 0.9,
        x: 0.05,
        y: 0.0,
        steps,
    }
}
