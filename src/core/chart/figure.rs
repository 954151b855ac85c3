//! Serializable subset of the plotly.js figure schema

use crate::core::colorscale::PlotlyColorscale;
use serde::Serialize;

/// Font family applied to every text element
pub const FONT_FAMILY: &str = "Lexend, Arial, sans-serif";

/// A complete chart: traces plus layout
#[derive(Debug, Clone, Default, Serialize)]
pub struct Figure {
    /// Traces, drawn in order
    pub data: Vec<Trace>,
    /// Figure-level layout
    pub layout: Layout,
}

/// Plotly trace type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    /// Cartesian scatter
    #[default]
    Scatter,
    /// Scatter on a geographic projection
    ScatterGeo,
}

/// One trace; unset fields are omitted from the JSON
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trace {
    /// Trace type
    #[serde(rename = "type")]
    pub kind: TraceKind,
    /// Latitudes (geo traces)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<Vec<Option<f64>>>,
    /// Longitudes (geo traces)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<Vec<Option<f64>>>,
    /// X values (cartesian traces); `None` entries break lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<Option<f64>>>,
    /// Y values (cartesian traces)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<Option<f64>>>,
    /// Drawing mode, e.g. `lines` or `markers+text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    /// Line style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    /// Marker style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    /// Per-point labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    /// Per-point hover text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    /// Which fields appear on hover (`text`, `skip`, `none`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<&'static str>,
    /// Label placement relative to the marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
    /// Label font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textfont: Option<Font>,
    /// Whether the trace gets a legend entry
    pub showlegend: bool,
}

/// Line style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// CSS color
    pub color: String,
    /// Width in pixels
    pub width: f64,
}

/// Marker style
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    /// Marker size in pixels
    pub size: f64,
    /// Per-point values mapped through the colorscale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<f64>>,
    /// Colorscale used for numeric colors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<PlotlyColorscale>,
    /// Lower colorscale bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    /// Upper colorscale bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    /// Opacity in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Whether to draw the colorbar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
    /// Colorbar settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    /// Marker outline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

/// Colorbar placement and labelling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    /// Bar title
    pub title: Title,
    /// Tick label font
    pub tickfont: Font,
    /// Horizontal anchor (paper coordinates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical anchor (paper coordinates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Bar length as a fraction of the plot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<f64>,
    /// Bar thickness in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

impl ColorBar {
    /// Colorbar with a Lexend title and tick font
    #[must_use]
    pub fn titled(text: &str) -> Self {
        Self {
            title: Title::new(text),
            tickfont: Font::lexend(),
            x: None,
            y: None,
            len: None,
            thickness: None,
        }
    }

    /// Anchor the bar at (x, y) with the given length and thickness
    #[must_use]
    pub fn placed(mut self, x: f64, y: f64, len: f64, thickness: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.len = Some(len);
        self.thickness = Some(thickness);
        self
    }
}

/// Title text with font
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// Title text
    pub text: String,
    /// Title font
    pub font: Font,
}

impl Title {
    /// Title in the chart font
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: Font::lexend(),
        }
    }
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    /// CSS font family list
    pub family: &'static str,
    /// Size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// CSS color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl Font {
    /// The chart font with plotly's default size and color
    #[must_use]
    pub const fn lexend() -> Self {
        Self {
            family: FONT_FAMILY,
            size: None,
            color: None,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::lexend()
    }
}

/// Hover label styling
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HoverLabel {
    /// Label font
    pub font: Font,
}

/// Plot margins in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Margin {
    /// Left
    pub l: u32,
    /// Right
    pub r: u32,
    /// Top
    pub t: u32,
    /// Bottom
    pub b: u32,
}

/// Geographic subplot settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geo {
    /// Map projection
    pub projection: Projection,
    /// Draw country borders
    pub showcountries: bool,
    /// Fill land masses
    pub showland: bool,
    /// Draw the map frame
    pub showframe: bool,
    /// Frame color
    pub framecolor: &'static str,
    /// Land fill color
    pub landcolor: &'static str,
    /// Country border color
    pub countrycolor: &'static str,
    /// Coastline color
    pub coastlinecolor: &'static str,
}

/// Map projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Projection name, e.g. `natural earth`
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Cartesian axis settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Axis {
    /// Draw grid lines
    pub showgrid: bool,
    /// Draw the zero line
    pub zeroline: bool,
    /// Draw tick labels
    pub showticklabels: bool,
}

impl Axis {
    /// An axis with no grid, zero line or tick labels
    pub const HIDDEN: Self = Self {
        showgrid: false,
        zeroline: false,
        showticklabels: false,
    };
}

/// Layout title position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TitlePosition {
    /// Horizontal position (paper coordinates)
    pub x: f64,
}

/// Figure layout; unset fields are omitted from the JSON
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    /// Title placement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitlePosition>,
    /// Geographic subplot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    /// Margins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    /// Hover behaviour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<&'static str>,
    /// X axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    /// Y axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    /// Page background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<&'static str>,
    /// Plot area background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<&'static str>,
    /// Global font
    pub font: Font,
    /// Hover label styling
    pub hoverlabel: HoverLabel,
}

impl Figure {
    /// Serialize to the JSON object plotly.js expects
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_fields_are_omitted() {
        let trace = Trace {
            kind: TraceKind::ScatterGeo,
            mode: Some("lines"),
            ..Trace::default()
        };
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!({"type": "scattergeo", "mode": "lines", "showlegend": false})
        );
    }

    #[test]
    fn test_gaps_serialize_as_null() {
        let trace = Trace {
            x: Some(vec![Some(0.5), Some(1.0), None]),
            ..Trace::default()
        };
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(value["x"], json!([0.5, 1.0, null]));
    }

    #[test]
    fn test_marker_values_serialize_as_array() {
        let marker = Marker {
            size: 9.0,
            color: Some(vec![1.0, 2.0]),
            ..Marker::default()
        };
        let value = serde_json::to_value(&marker).unwrap();
        assert_eq!(value["color"], json!([1.0, 2.0]));
        assert!(value.get("colorscale").is_none());
    }

    #[test]
    fn test_layout_always_carries_font() {
        let json = Figure::default().to_json().unwrap();
        assert!(json.contains(FONT_FAMILY));
        assert!(json.contains("\"hoverlabel\""));
    }
}
