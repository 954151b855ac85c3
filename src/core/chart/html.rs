//! Standalone HTML export for plotly figures
//!
//! The page loads plotly.js from its CDN and embeds the figure as JSON. After
//! rendering, the Lexend web font and a global CSS override are injected right
//! after `<head>` so every text element of the chart uses it.

use super::figure::Figure;
use crate::core::error::ChartError;
use askama::Template;
use std::fs;
use std::path::Path;

/// plotly.js bundle referenced by every page
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Google Fonts stylesheet for Lexend
pub const FONT_LINK: &str =
    r#"<link href="https://fonts.googleapis.com/css2?family=Lexend&display=swap" rel="stylesheet">"#;

/// CSS override forcing Lexend onto the page and all plotly text layers
pub const FONT_STYLE: &str = "
<style>
  html, body, .js-plotly-plot, .plotly, .plotly text, .colorbar, .hoverlayer, .g-gtitle, .g-xtitle, .g-ytitle, .infolayer text {
    font-family: 'Lexend', Arial, sans-serif !important;
  }
</style>
";

const DIV_ID: &str = "delay-atlas-chart";

#[derive(Template)]
#[template(path = "chart.html")]
struct ChartPage<'a> {
    title: &'a str,
    plotly_cdn: &'a str,
    div_id: &'a str,
    figure_json: &'a str,
}

/// Render `figure` as a complete HTML page with the font injected
///
/// # Errors
/// Returns an error if the figure cannot be serialized or the template fails
pub fn render_page(title: &str, figure: &Figure) -> Result<String, ChartError> {
    // keep "</script>" inside hover text from closing the inline script
    let figure_json = figure.to_json()?.replace("</", "<\\/");
    let page = ChartPage {
        title,
        plotly_cdn: PLOTLY_CDN,
        div_id: DIV_ID,
        figure_json: &figure_json,
    }
    .render()?;
    Ok(inject_fonts(&page))
}

/// Insert [`FONT_LINK`] and [`FONT_STYLE`] right after `<head>`
///
/// Pages that already contain the font link are returned unchanged.
#[must_use]
pub fn inject_fonts(page: &str) -> String {
    if page.contains(FONT_LINK) {
        return page.to_string();
    }
    page.replacen("<head>", &format!("<head>{FONT_LINK}{FONT_STYLE}"), 1)
}

/// Write a rendered page, creating the parent directory if needed
///
/// # Errors
/// Returns an error if the directory or file cannot be written
pub fn write_page(path: &Path, page: &str) -> Result<(), ChartError> {
    let write_err = |source| ChartError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, page).map_err(write_err)?;
    crate::debug!("Wrote {} bytes to {}", page.len(), path.display());
    Ok(())
}
