//! Axis layout: tick generation, label formatting and axis-line geometry.

use std::collections::HashMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::coord::linear_map;
use crate::core::layout::{LayoutEngine, Rect, RenderContext};
use crate::core::option::{AxisPosition, AxisSpec, ChartOption, TickPolicy};

/// Which axis list of the configuration an engine serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisFamily {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One tick: data value, pixel coordinate along the axis, formatted label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub coord: f64,
    pub label: String,
}

/// Axis-line endpoints in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Fully resolved geometry for one axis index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub position: AxisPosition,
    pub orient: Orientation,
    pub axis_line: AxisLine,
    /// Resolved numeric domain. With the nice-numbers policy this expands to
    /// the nice bounds so every tick stays inside the grid span.
    pub range: (f64, f64),
    /// Pixel span along the owning grid edge; inverted for vertical axes
    /// (screen Y grows downward, data Y grows upward).
    pub pixel_range: (f64, f64),
    pub grid_index: usize,
    pub ticks: Vec<AxisTick>,
}

/// Computes and caches `AxisLayout` per axis index.
///
/// Like the layout engine, the cache is cleared wholesale whenever the
/// configuration or the container context changes.
#[derive(Debug)]
pub struct AxisEngine {
    family: AxisFamily,
    cache: HashMap<usize, AxisLayout>,
}

impl AxisEngine {
    #[must_use]
    pub fn new(family: AxisFamily) -> Self {
        Self {
            family,
            cache: HashMap::new(),
        }
    }

    #[must_use]
    pub fn family(&self) -> AxisFamily {
        self.family
    }

    /// Resolves the layout of the axis at `axis_index`.
    ///
    /// A missing index falls back to axis 0; `None` when the family has no
    /// axes configured at all.
    pub fn layout(
        &mut self,
        option: &ChartOption,
        context: RenderContext,
        layout_engine: &mut LayoutEngine,
        axis_index: usize,
    ) -> Option<AxisLayout> {
        if let Some(cached) = self.cache.get(&axis_index) {
            return Some(cached.clone());
        }

        let axes = self.axes(option);
        let spec = axes.get(axis_index).or_else(|| axes.first())?;
        let rect = layout_engine.rect(option, context, spec.grid_index);
        let layout = compute_layout(spec, rect);
        self.cache.insert(axis_index, layout.clone());
        Some(layout)
    }

    /// Drops every cached layout.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    fn axes<'a>(&self, option: &'a ChartOption) -> &'a [AxisSpec] {
        match self.family {
            AxisFamily::X => &option.x_axis,
            AxisFamily::Y => &option.y_axis,
        }
    }
}

fn compute_layout(spec: &AxisSpec, rect: Rect) -> AxisLayout {
    let position = spec.position;
    let orient = if position.is_horizontal() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };

    // Symbolic dataMin/dataMax degrade to the 0/100 placeholder domain.
    let mut range = (spec.min.resolve_or(0.0), spec.max.resolve_or(100.0));

    let pixel_range = match orient {
        Orientation::Horizontal => (rect.x, rect.right()),
        Orientation::Vertical => (rect.bottom(), rect.y),
    };

    let values = match spec.tick_policy {
        TickPolicy::Even => even_tick_values(range.0, range.1, spec.split_number),
        TickPolicy::Nice => {
            let values = nice_ticks(range.0, range.1, spec.split_number);
            if let (Some(first), Some(last)) = (values.first(), values.last()) {
                range = (*first, *last);
            }
            values
        }
    };

    let ticks = values
        .into_iter()
        .map(|value| AxisTick {
            value,
            coord: linear_map(value, range, pixel_range),
            label: format_tick_label(value),
        })
        .collect();

    AxisLayout {
        position,
        orient,
        axis_line: axis_line_for(rect, position),
        range,
        pixel_range,
        grid_index: spec.grid_index,
        ticks,
    }
}

fn axis_line_for(rect: Rect, position: AxisPosition) -> AxisLine {
    match position {
        AxisPosition::Bottom => AxisLine {
            x1: rect.x,
            y1: rect.bottom(),
            x2: rect.right(),
            y2: rect.bottom(),
        },
        AxisPosition::Top => AxisLine {
            x1: rect.x,
            y1: rect.y,
            x2: rect.right(),
            y2: rect.y,
        },
        AxisPosition::Left => AxisLine {
            x1: rect.x,
            y1: rect.y,
            x2: rect.x,
            y2: rect.bottom(),
        },
        AxisPosition::Right => AxisLine {
            x1: rect.right(),
            y1: rect.y,
            x2: rect.right(),
            y2: rect.bottom(),
        },
    }
}

/// Even-division ticks: `split_number + 1` candidates with min and max
/// force-included even when the span does not divide evenly.
fn even_tick_values(min: f64, max: f64, split_number: u32) -> Vec<f64> {
    let step = if split_number > 0 {
        (max - min) / f64::from(split_number)
    } else {
        0.0
    };

    let mut values: Vec<f64> = (0..=split_number)
        .map(|i| min + step * f64::from(i))
        .filter(|value| *value >= min && *value <= max)
        .collect();

    if !values.contains(&min) {
        values.insert(0, min);
    }
    if !values.contains(&max) {
        values.push(max);
    }

    let mut keyed: Vec<OrderedFloat<f64>> = values.into_iter().map(OrderedFloat).collect();
    keyed.sort_unstable();
    keyed.dedup();
    keyed.into_iter().map(|key| key.0).collect()
}

/// "Nice numbers" tick enumeration.
///
/// The step is the raw span division rounded to a {1, 2, 5, 10} mantissa,
/// the bounds expand outward to step multiples, and each enumerated tick is
/// re-rounded to the nearest step multiple to cancel accumulation drift.
/// The first tick is always <= `min` and the last always >= `max`.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, split_number: u32) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };

    let raw_step = (hi - lo) / f64::from(split_number.max(1));
    let step = nice_step(raw_step, true);
    if !step.is_finite() || step <= 0.0 {
        return vec![lo, hi];
    }

    let nice_lo = (lo / step).floor() * step;
    let nice_hi = (hi / step).ceil() * step;
    let count = ((nice_hi - nice_lo) / step).round() as i64;

    let mut ticks = Vec::with_capacity(count.unsigned_abs() as usize + 1);
    for i in 0..=count {
        let raw = nice_lo + step * i as f64;
        ticks.push((raw / step).round() * step);
    }
    ticks
}

/// Rounds a raw step to a {1, 2, 5, 10} mantissa at the same magnitude.
///
/// `round` selects the round-half variant (thresholds 1.5/3/7); otherwise
/// the ceiling variant (<=1/<=2/<=5) is used.
#[must_use]
pub fn nice_step(raw_step: f64, round: bool) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 0.0;
    }

    let exponent = raw_step.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = raw_step / magnitude;

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * magnitude
}

/// Tick label formatting: exponential at 1 decimal for |v| >= 1000, else 0
/// decimals for integers and 2 for fractional values.
#[must_use]
pub fn format_tick_label(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{value:.1e}")
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_tick_label, nice_step, nice_ticks};

    #[test]
    fn nice_step_round_variant_thresholds() {
        assert!((nice_step(1.4, true) - 1.0).abs() <= 1e-12);
        assert!((nice_step(1.5, true) - 2.0).abs() <= 1e-12);
        assert!((nice_step(2.9, true) - 2.0).abs() <= 1e-12);
        assert!((nice_step(3.0, true) - 5.0).abs() <= 1e-12);
        assert!((nice_step(6.9, true) - 5.0).abs() <= 1e-12);
        assert!((nice_step(7.0, true) - 10.0).abs() <= 1e-12);
    }

    #[test]
    fn nice_step_ceiling_variant_thresholds() {
        assert!((nice_step(1.0, false) - 1.0).abs() <= 1e-12);
        assert!((nice_step(1.1, false) - 2.0).abs() <= 1e-12);
        assert!((nice_step(2.1, false) - 5.0).abs() <= 1e-12);
        assert!((nice_step(5.1, false) - 10.0).abs() <= 1e-12);
    }

    #[test]
    fn nice_ticks_cover_the_requested_span() {
        let ticks = nice_ticks(0.0, 97.0, 5);
        assert!(*ticks.first().expect("non-empty") <= 0.0);
        assert!(*ticks.last().expect("non-empty") >= 97.0);
        let step = ticks[1] - ticks[0];
        for pair in ticks.windows(2) {
            assert!((pair[1] - pair[0] - step).abs() <= 1e-9, "uneven spacing");
        }
    }

    #[test]
    fn tick_labels_follow_magnitude_rules() {
        assert_eq!(format_tick_label(50.0), "50");
        assert_eq!(format_tick_label(0.125), "0.13");
        assert_eq!(format_tick_label(1500.0), "1.5e3");
        assert_eq!(format_tick_label(-2500.0), "-2.5e3");
    }
}
