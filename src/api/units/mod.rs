//! Built-in rendering units.

mod axis;
mod grid;
mod line_series;
mod tooltip;
mod visual_map;
mod waterfall_series;

pub use axis::AxisUnit;
pub use grid::GridUnit;
pub use line_series::LineSeriesUnit;
pub use tooltip::TooltipUnit;
pub use visual_map::VisualMapUnit;
pub use waterfall_series::WaterfallSeriesUnit;

use std::fmt;

use crate::core::LineKind;

/// How a unit keys its per-series model state: the configured id when one
/// exists, otherwise the series' position within the unit's slice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeriesKey {
    Id(String),
    Index(usize),
}

impl SeriesKey {
    #[must_use]
    pub fn from_spec(id: Option<&str>, index: usize) -> Self {
        match id {
            Some(id) => Self::Id(id.to_owned()),
            None => Self::Index(index),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// Dash pattern for a configured stroke kind.
pub(crate) fn dash_pattern(kind: LineKind) -> Option<&'static [f64]> {
    match kind {
        LineKind::Solid => None,
        LineKind::Dashed => Some(&[4.0, 4.0]),
        LineKind::Dotted => Some(&[1.0, 3.0]),
    }
}

/// Stroke widths from configuration are defensively defaulted; a zero or
/// non-finite width must not abort a render pass.
pub(crate) fn stroke_width_or(width: f64, fallback: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        fallback
    }
}
