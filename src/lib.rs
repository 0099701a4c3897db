//! Water-quality map dashboard.
//!
//! Reads the per-water-body CSV exports, merges them and writes an
//! animated, year-sliderable plotly map as a standalone HTML page.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;
