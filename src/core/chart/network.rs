//! Force-directed airport network colored by node degree

use super::figure::{
    Axis, ColorBar, Figure, HoverLabel, Layout, Line, Margin, Marker, Trace, TraceKind,
};
use super::Chart;
use crate::core::aggregate::{country_or_unknown, CountryByStation};
use crate::core::colorscale::ColorScale;
use crate::core::layout::Point;
use crate::core::models::AirportIndex;
use crate::core::network::FlightNetwork;

/// Default output file name
pub const NETWORK_FILE: &str = "network_predefined_turbo_3.html";

const EDGE_COLOR: &str = "rgba(120,120,120,0.6)";
const EDGE_WIDTH: f64 = 0.7;

/// One placed station
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    /// Station code
    pub code: String,
    /// Layout position
    pub position: Point,
    /// Number of distinct neighbours
    pub degree: usize,
    /// Hover text
    pub hover: String,
}

/// Network diagram over laid-out stations
#[derive(Debug, Clone, Default)]
pub struct NetworkChart {
    nodes: Vec<PlacedNode>,
    edges: Vec<(usize, usize)>,
}

impl NetworkChart {
    /// Combine a network with its layout and station metadata
    ///
    /// `positions` must be in the network's node order. Countries and airport
    /// names only enrich hover text; stations without them still appear.
    #[must_use]
    pub fn new(
        network: &FlightNetwork,
        positions: &[Point],
        countries: &CountryByStation,
        airports: &AirportIndex,
    ) -> Self {
        let nodes = network
            .codes()
            .zip(network.degrees())
            .zip(positions)
            .map(|((code, degree), &position)| PlacedNode {
                code: code.to_string(),
                position,
                degree,
                hover: node_hover_text(
                    code,
                    &country_or_unknown(countries, code),
                    airports.get(code).map(|a| a.name.as_str()),
                    degree,
                ),
            })
            .collect();

        Self {
            nodes,
            edges: network.edge_positions(),
        }
    }

    /// Placed stations in node order
    #[must_use]
    pub fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    fn edge_trace(&self) -> Trace {
        let mut x = Vec::with_capacity(self.edges.len() * 3);
        let mut y = Vec::with_capacity(self.edges.len() * 3);
        for &(a, b) in &self.edges {
            let (Some(a), Some(b)) = (self.nodes.get(a), self.nodes.get(b)) else {
                continue;
            };
            x.extend([Some(a.position.x), Some(b.position.x), None]);
            y.extend([Some(a.position.y), Some(b.position.y), None]);
        }

        Trace {
            kind: TraceKind::Scatter,
            x: Some(x),
            y: Some(y),
            mode: Some("lines"),
            line: Some(Line {
                color: EDGE_COLOR.to_string(),
                width: EDGE_WIDTH,
            }),
            hoverinfo: Some("none"),
            ..Trace::default()
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn node_trace(&self) -> Trace {
        let degrees: Vec<f64> = self.nodes.iter().map(|n| n.degree as f64).collect();
        let (cmin, cmax) = degree_bounds(&degrees);

        Trace {
            kind: TraceKind::Scatter,
            x: Some(self.nodes.iter().map(|n| Some(n.position.x)).collect()),
            y: Some(self.nodes.iter().map(|n| Some(n.position.y)).collect()),
            mode: Some("markers"),
            hoverinfo: Some("text"),
            text: Some(self.nodes.iter().map(|n| n.hover.clone()).collect()),
            marker: Some(Marker {
                size: 9.0,
                color: Some(degrees),
                colorscale: Some(ColorScale::VIRIDIS.reversed().to_plotly()),
                cmin: Some(cmin),
                cmax: Some(cmax),
                colorbar: Some(ColorBar::titled("Node Connections")),
                line: Some(Line {
                    color: "white".to_string(),
                    width: 0.5,
                }),
                ..Marker::default()
            }),
            ..Trace::default()
        }
    }
}

/// Colorscale bounds for node degrees: `(max(min, 0), max)`, or `(0, 1)` when empty
#[must_use]
pub fn degree_bounds(degrees: &[f64]) -> (f64, f64) {
    if degrees.is_empty() {
        return (0.0, 1.0);
    }
    let min = degrees.iter().copied().fold(f64::INFINITY, f64::min);
    let max = degrees.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min.max(0.0), max)
}

/// Hover text for a network node
#[must_use]
pub fn node_hover_text(code: &str, country: &str, name: Option<&str>, degree: usize) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{code} ({country})<br>{name}<br>Connections: {degree}"),
        None => format!("{code} ({country})<br>Connections: {degree}"),
    }
}

impl Chart for NetworkChart {
    fn title(&self) -> &'static str {
        "Airport connection network"
    }

    fn default_file_name(&self) -> &'static str {
        NETWORK_FILE
    }

    fn figure(&self) -> Figure {
        Figure {
            data: vec![self.edge_trace(), self.node_trace()],
            layout: Layout {
                margin: Some(Margin::default()),
                hovermode: Some("closest"),
                xaxis: Some(Axis::HIDDEN),
                yaxis: Some(Axis::HIDDEN),
                paper_bgcolor: Some("#ffffff"),
                plot_bgcolor: Some("#ffffff"),
                hoverlabel: HoverLabel::default(),
                ..Layout::default()
            },
        }
    }
}
