//! Continuous color scales and the value-to-color / value-to-width mappings

use serde::Serialize;

/// A sequential palette: evenly spaced hex stops from low to high
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScale {
    name: &'static str,
    stops: &'static [&'static str],
    reversed: bool,
}

const TURBO: &[&str] = &[
    "#30123b", "#4145ab", "#4675ed", "#39a2fc", "#1bcfd4", "#24eca6", "#61fc6c", "#a4fc3b",
    "#d1e834", "#f3c63a", "#fe9b2d", "#f36315", "#d93806", "#b11901", "#7a0402",
];

const INFERNO: &[&str] = &[
    "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60", "#cf4446", "#ed6925", "#fb9b06",
    "#f7d13d", "#fcffa4",
];

const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// An RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb`
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    /// CSS `rgb(r, g, b)` form
    #[must_use]
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }

    /// Channel-wise blend, rounded to whole 8-bit channels
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::suboptimal_flops
    )]
    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl ColorScale {
    /// Rainbow-like palette used for route lines
    pub const TURBO: Self = Self::new("Turbo", TURBO);
    /// Dark-to-light palette
    pub const INFERNO: Self = Self::new("Inferno", INFERNO);
    /// Purple-to-yellow palette
    pub const VIRIDIS: Self = Self::new("Viridis", VIRIDIS);

    const fn new(name: &'static str, stops: &'static [&'static str]) -> Self {
        Self {
            name,
            stops,
            reversed: false,
        }
    }

    /// The same palette running high-to-low
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            reversed: !self.reversed,
            ..self
        }
    }

    /// Palette name, with an `_r` suffix when reversed
    #[must_use]
    pub fn name(&self) -> String {
        if self.reversed {
            format!("{}_r", self.name)
        } else {
            self.name.to_string()
        }
    }

    fn rgb_stops(&self) -> Vec<Rgb> {
        let mut stops: Vec<Rgb> = self.stops.iter().filter_map(|h| Rgb::from_hex(h)).collect();
        if self.reversed {
            stops.reverse();
        }
        stops
    }

    /// Interpolated color at position `t` in `[0, 1]` (clamped)
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn sample(&self, t: f64) -> Rgb {
        let stops = self.rgb_stops();
        let Some(&first) = stops.first() else {
            return Rgb(0, 0, 0);
        };
        if stops.len() == 1 || t.is_nan() {
            return first;
        }

        let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        stops[lower].lerp(stops[lower + 1], scaled - lower as f64)
    }

    /// Colorscale in the `[[position, color], ...]` form plotly accepts
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_plotly(&self) -> PlotlyColorscale {
        let stops = self.rgb_stops();
        let last = stops.len().saturating_sub(1).max(1) as f64;
        PlotlyColorscale(
            stops
                .into_iter()
                .enumerate()
                .map(|(i, rgb)| (i as f64 / last, rgb.css()))
                .collect(),
        )
    }
}

/// Serialized colorscale: position/color pairs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotlyColorscale(pub Vec<(f64, String)>);

/// Observed min/max of a value set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl ValueRange {
    /// Range over the finite values in `values`, `None` when there are none
    #[must_use]
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some(Self { min: v, max: v }),
                Some(r) => Some(Self {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    /// Whether min and max coincide
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Position of `value` inside the range; `0.5` for a degenerate range
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.5
        } else {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        }
    }

    /// Bounds for a colorbar; a degenerate range is widened so the bar renders
    #[must_use]
    pub fn color_bounds(&self) -> (f64, f64) {
        if self.is_degenerate() {
            (self.min, self.max + 1e-9)
        } else {
            (self.min, self.max)
        }
    }
}

/// Width of the narrowest route line
pub const MIN_LINE_WIDTH: f64 = 0.5;
/// Width of the widest route line
pub const MAX_LINE_WIDTH: f64 = 6.0;
/// Width used when every route carries the same number of flights
pub const UNIFORM_LINE_WIDTH: f64 = 2.5;

/// Line width for a route flown `flights` times, given the flight-count range
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn line_width(flights: f64, range: ValueRange) -> f64 {
    if range.is_degenerate() {
        UNIFORM_LINE_WIDTH
    } else {
        MIN_LINE_WIDTH + (MAX_LINE_WIDTH - MIN_LINE_WIDTH) * range.normalize(flights)
    }
}
