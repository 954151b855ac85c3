//! Chart generation
//!
//! Builds plotly figures for the route map and the airport network and
//! renders them as standalone HTML pages.

pub mod figure;
pub mod html;
pub mod network;
pub mod route_map;

use crate::core::error::ChartError;
use std::path::Path;

pub use figure::{Figure, FONT_FAMILY};
pub use html::{inject_fonts, render_page, FONT_LINK, FONT_STYLE, PLOTLY_CDN};
pub use network::{NetworkChart, NETWORK_FILE};
pub use route_map::{RouteMapChart, ROUTE_MAP_FILE};

/// Trait for chart generators
pub trait Chart {
    /// Page title
    fn title(&self) -> &'static str;

    /// File name used when no explicit output path is given
    fn default_file_name(&self) -> &'static str;

    /// Build the plotly figure
    fn figure(&self) -> Figure;

    /// Render the full HTML page, fonts injected
    ///
    /// # Errors
    /// Returns an error if the figure cannot be serialized or the page template fails
    fn render(&self) -> Result<String, ChartError> {
        render_page(self.title(), &self.figure())
    }

    /// Render the page and write it to `output_path`
    ///
    /// # Errors
    /// Returns an error if rendering fails or the file cannot be written
    fn generate(&self, output_path: &Path) -> Result<(), ChartError> {
        let page = self.render()?;
        html::write_page(output_path, &page)
    }
}
