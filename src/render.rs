use std::path::Path;

use crate::chart::figure::Figure;
use crate::error::PipelineError;

/// Element id of the chart container in the exported page.
const DIV_ID: &str = "geodash";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub cdn_url: String,
    pub page_title: String,
}

/// Serialise a figure into a standalone HTML page that loads plotly.js
/// from the CDN.
pub fn render_html(figure: &Figure, opts: &RenderOptions) -> Result<String, PipelineError> {
    let figure_json = escape_script(&serde_json::to_string(figure)?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{cdn}" charset="utf-8"></script>
</head>
<body style="margin: 0;">
<div id="{id}" class="plotly-graph-div" style="height: 100vh; width: 100%;"></div>
<script type="text/javascript">
const figure = {figure_json};
Plotly.newPlot("{id}", figure.data, figure.layout, {{ responsive: true }}).then(function () {{
    Plotly.addFrames("{id}", figure.frames);
}});
</script>
</body>
</html>
"#,
        title = escape_text(&opts.page_title),
        cdn = escape_text(&opts.cdn_url),
        id = DIV_ID,
    ))
}

/// Write the rendered page, creating missing parent directories.
pub fn export(figure: &Figure, opts: &RenderOptions, path: &Path) -> Result<(), PipelineError> {
    let html = render_html(figure, opts)?;
    let write_err = |source: std::io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, html).map_err(write_err)?;

    log::info!("Wrote {} ({} frames)", path.display(), figure.frames.len());
    Ok(())
}

/// Open an exported page in the system viewer. Failure is only logged.
pub fn show(path: &Path) {
    match open::that(path) {
        Ok(()) => log::info!("Opened {}", path.display()),
        Err(e) => log::warn!("Could not open {}: {e}", path.display()),
    }
}

/// Keep JSON from closing the surrounding `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_figure;
    use crate::config::{ChartConfig, DEFAULT_CDN_URL};
    use crate::data::model::{Dataset, Measurement, QualityCategory, Record, WaterBodyType};

    fn figure(site: &str) -> Figure {
        let ds = Dataset {
            records: vec![Record {
                site: site.to_string(),
                year: 2019,
                latitude: 21.1,
                longitude: -86.8,
                quality: QualityCategory::Good,
                coliform: Measurement::Number(4.0),
                body_type: WaterBodyType::Coastal,
            }],
            sources: Vec::new(),
        };
        build_figure(&ds, &ChartConfig::default()).unwrap()
    }

    fn opts() -> RenderOptions {
        RenderOptions {
            cdn_url: DEFAULT_CDN_URL.to_string(),
            page_title: "Calidad del Agua".to_string(),
        }
    }

    #[test]
    fn page_references_cdn_and_adds_frames() {
        let html = render_html(&figure("P-1"), &opts()).unwrap();
        assert!(html.contains(r#"<script src="https://cdn.plot.ly/plotly-2.35.2.min.js""#));
        assert!(html.contains("Plotly.newPlot(\"geodash\""));
        assert!(html.contains("Plotly.addFrames(\"geodash\", figure.frames)"));
        assert!(html.contains("\"type\":\"scattermapbox\""));
        assert!(html.contains("\"name\":\"2019\""));
    }

    #[test]
    fn site_text_cannot_close_script() {
        let html = render_html(&figure("</script><b>x"), &opts()).unwrap();
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("<\\/script><b>x"));
    }

    #[test]
    fn export_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("index.html");
        export(&figure("P-1"), &opts(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
