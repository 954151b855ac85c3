//! Geographic route map: routes colored by mean delay and sized by traffic

use super::figure::{
    ColorBar, Figure, Font, Geo, HoverLabel, Layout, Line, Margin, Marker, Projection,
    TitlePosition, Trace, TraceKind,
};
use super::Chart;
use crate::core::aggregate::RouteMapData;
use crate::core::colorscale::{line_width, ColorScale, ValueRange};
use crate::core::models::{NodeAggregate, RouteAggregate};

/// Default output file name
pub const ROUTE_MAP_FILE: &str = "delay_airports_routes.html";

const MAP_BLUE: &str = "#5D7398";
const MAP_LAND: &str = "#CCD7C7";

/// Route map over aggregated routes and airports
#[derive(Debug, Clone, Copy)]
pub struct RouteMapChart<'a> {
    data: &'a RouteMapData,
}

impl<'a> RouteMapChart<'a> {
    /// Chart over `data`
    #[must_use]
    pub const fn new(data: &'a RouteMapData) -> Self {
        Self { data }
    }

    fn route_scale() -> ColorScale {
        ColorScale::TURBO
    }

    fn node_scale() -> ColorScale {
        ColorScale::INFERNO.reversed()
    }

    fn route_lines(routes: &[RouteAggregate], delays: ValueRange, flights: ValueRange) -> Vec<Trace> {
        let scale = Self::route_scale();
        routes
            .iter()
            .map(|route| {
                #[allow(clippy::cast_precision_loss)]
                let width = line_width(route.flights as f64, flights);
                Trace {
                    kind: TraceKind::ScatterGeo,
                    lat: Some(vec![
                        Some(route.origin_coords.lat),
                        Some(route.destination_coords.lat),
                    ]),
                    lon: Some(vec![
                        Some(route.origin_coords.lon),
                        Some(route.destination_coords.lon),
                    ]),
                    mode: Some("lines"),
                    line: Some(Line {
                        color: scale.sample(delays.normalize(route.mean_delay)).css(),
                        width,
                    }),
                    hoverinfo: Some("skip"),
                    ..Trace::default()
                }
            })
            .collect()
    }

    fn route_hover(routes: &[RouteAggregate]) -> Trace {
        let midpoints: Vec<_> = routes.iter().map(RouteAggregate::midpoint).collect();
        Trace {
            kind: TraceKind::ScatterGeo,
            lat: Some(midpoints.iter().map(|m| Some(m.lat)).collect()),
            lon: Some(midpoints.iter().map(|m| Some(m.lon)).collect()),
            mode: Some("markers"),
            marker: Some(Marker {
                size: 6.0,
                opacity: Some(0.0),
                ..Marker::default()
            }),
            hoverinfo: Some("text"),
            hovertext: Some(routes.iter().map(route_hover_text).collect()),
            ..Trace::default()
        }
    }

    /// Invisible trace whose only job is to draw the route colorbar
    fn route_colorbar(delays: ValueRange) -> Trace {
        let (lo, hi) = delays.color_bounds();
        Trace {
            kind: TraceKind::ScatterGeo,
            lat: Some(vec![None]),
            lon: Some(vec![None]),
            mode: Some("markers"),
            marker: Some(Marker {
                size: 0.1,
                color: Some(vec![lo, hi]),
                colorscale: Some(Self::route_scale().to_plotly()),
                showscale: Some(true),
                colorbar: Some(
                    ColorBar::titled("mean delay (Route)").placed(1.02, 0.2, 0.3, 15.0),
                ),
                ..Marker::default()
            }),
            hoverinfo: Some("none"),
            ..Trace::default()
        }
    }

    fn airports(nodes: &[NodeAggregate]) -> Trace {
        let bounds = ValueRange::from_values(nodes.iter().map(|n| n.mean_delay))
            .map(|r| r.color_bounds());
        Trace {
            kind: TraceKind::ScatterGeo,
            lat: Some(nodes.iter().map(|n| Some(n.coords.lat)).collect()),
            lon: Some(nodes.iter().map(|n| Some(n.coords.lon)).collect()),
            mode: Some("markers+text"),
            text: Some(nodes.iter().map(|n| n.code.clone()).collect()),
            textposition: Some("top center"),
            textfont: Some(Font::lexend()),
            hoverinfo: Some("text"),
            hovertext: Some(nodes.iter().map(airport_hover_text).collect()),
            marker: Some(Marker {
                size: 10.0,
                color: Some(nodes.iter().map(|n| n.mean_delay).collect()),
                colorscale: Some(Self::node_scale().to_plotly()),
                cmin: bounds.map(|(lo, _)| lo),
                cmax: bounds.map(|(_, hi)| hi),
                showscale: Some(true),
                colorbar: Some(
                    ColorBar::titled("mean delay (Airport)").placed(1.02, 0.8, 0.3, 15.0),
                ),
                line: Some(Line {
                    color: "white".to_string(),
                    width: 1.0,
                }),
                ..Marker::default()
            }),
            ..Trace::default()
        }
    }

    fn layout() -> Layout {
        Layout {
            title: Some(TitlePosition { x: 0.5 }),
            geo: Some(Geo {
                projection: Projection {
                    kind: "natural earth",
                },
                showcountries: true,
                showland: true,
                showframe: true,
                framecolor: MAP_BLUE,
                landcolor: MAP_LAND,
                countrycolor: MAP_BLUE,
                coastlinecolor: MAP_BLUE,
            }),
            margin: Some(Margin {
                l: 10,
                r: 10,
                t: 60,
                b: 10,
            }),
            paper_bgcolor: Some("#FFFFFF"),
            plot_bgcolor: Some(MAP_BLUE),
            font: Font {
                size: Some(12.0),
                color: Some("black"),
                ..Font::lexend()
            },
            hoverlabel: HoverLabel::default(),
            ..Layout::default()
        }
    }
}

/// Hover text for a route midpoint
#[must_use]
pub fn route_hover_text(route: &RouteAggregate) -> String {
    format!(
        "Route: {} → {}<br>Flights: {}<br>Mean delay: {:.1}",
        route.origin, route.destination, route.flights, route.mean_delay
    )
}

/// Hover text for an airport marker
#[must_use]
pub fn airport_hover_text(node: &NodeAggregate) -> String {
    format!(
        "Airport: {} ({})<br>Node mean delay: {:.1}",
        node.code, node.country, node.mean_delay
    )
}

impl Chart for RouteMapChart<'_> {
    fn title(&self) -> &'static str {
        "Flight delays by route and airport"
    }

    fn default_file_name(&self) -> &'static str {
        ROUTE_MAP_FILE
    }

    fn figure(&self) -> Figure {
        let routes = &self.data.routes;
        let delays = ValueRange::from_values(routes.iter().map(|r| r.mean_delay))
            .unwrap_or(ValueRange { min: 0.0, max: 0.0 });
        #[allow(clippy::cast_precision_loss)]
        let flights = ValueRange::from_values(routes.iter().map(|r| r.flights as f64))
            .unwrap_or(ValueRange { min: 0.0, max: 0.0 });

        let mut data = Self::route_lines(routes, delays, flights);
        data.push(Self::route_hover(routes));
        data.push(Self::route_colorbar(delays));
        data.push(Self::airports(&self.data.nodes));

        Figure {
            data,
            layout: Self::layout(),
        }
    }
}
