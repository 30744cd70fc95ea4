//! Bidirectional data/pixel coordinate transforms.
//!
//! All geometry lookups degrade instead of failing: a resolution miss
//! (unknown axis or grid, empty grid list, non-finite input) yields `None`
//! or passes the input through, never an error. A render pass must survive
//! any finder a caller throws at it.

use serde::{Deserialize, Serialize};

use crate::core::axis::{AxisEngine, AxisFamily};
use crate::core::layout::{LayoutEngine, RenderContext};
use crate::core::option::{AxisSpec, ChartOption};

/// Maps `value` from `domain` into `range` linearly.
///
/// A degenerate domain (`max == min`) maps everything to `range.0` rather
/// than dividing by zero.
#[must_use]
pub fn linear_map(value: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    let (domain_min, domain_max) = domain;
    let (range_min, range_max) = range;

    if domain_max == domain_min {
        return range_min;
    }

    let ratio = (value - domain_min) / (domain_max - domain_min);
    range_min + ratio * (range_max - range_min)
}

/// Selects which axis/grid a coordinate operation targets, by index or
/// symbolic id. Indices take precedence over ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Finder {
    pub x_axis_index: Option<usize>,
    pub x_axis_id: Option<String>,
    pub y_axis_index: Option<usize>,
    pub y_axis_id: Option<String>,
    pub grid_index: Option<usize>,
    pub grid_id: Option<String>,
}

impl Finder {
    #[must_use]
    pub fn x_axis(index: usize) -> Self {
        Self {
            x_axis_index: Some(index),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn y_axis(index: usize) -> Self {
        Self {
            y_axis_index: Some(index),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn grid(index: usize) -> Self {
        Self {
            grid_index: Some(index),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_y_axis(mut self, index: usize) -> Self {
        self.y_axis_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_x_axis_id(mut self, id: impl Into<String>) -> Self {
        self.x_axis_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_y_axis_id(mut self, id: impl Into<String>) -> Self {
        self.y_axis_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_grid_id(mut self, id: impl Into<String>) -> Self {
        self.grid_id = Some(id.into());
        self
    }

    fn has_x(&self) -> bool {
        self.x_axis_index.is_some() || self.x_axis_id.is_some()
    }

    fn has_y(&self) -> bool {
        self.y_axis_index.is_some() || self.y_axis_id.is_some()
    }
}

/// Precomputed domain/pixel-range pair for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    pub domain: (f64, f64),
    pub pixel_range: (f64, f64),
}

impl AxisTransform {
    #[must_use]
    pub fn to_pixel(self, value: f64) -> f64 {
        linear_map(value, self.domain, self.pixel_range)
    }

    #[must_use]
    pub fn from_pixel(self, pixel: f64) -> f64 {
        linear_map(pixel, self.pixel_range, self.domain)
    }
}

/// Batch-transform payload: both axis transforms resolved once, so callers
/// converting large point arrays skip per-point axis resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateTransform {
    pub x: Option<AxisTransform>,
    pub y: Option<AxisTransform>,
}

/// Short-lived view over the live option and geometry caches that answers
/// coordinate queries.
pub struct CoordinateResolver<'a> {
    option: &'a ChartOption,
    context: RenderContext,
    layout: &'a mut LayoutEngine,
    x_axis: &'a mut AxisEngine,
    y_axis: &'a mut AxisEngine,
}

impl<'a> CoordinateResolver<'a> {
    #[must_use]
    pub fn new(
        option: &'a ChartOption,
        context: RenderContext,
        layout: &'a mut LayoutEngine,
        x_axis: &'a mut AxisEngine,
        y_axis: &'a mut AxisEngine,
    ) -> Self {
        Self {
            option,
            context,
            layout,
            x_axis,
            y_axis,
        }
    }

    /// Converts a data value to a pixel coordinate along the axis the finder
    /// selects.
    pub fn to_pixel(&mut self, finder: &Finder, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let family = self.pick_family(finder)?;
        let transform = self.axis_transform(family, finder)?;
        Some(transform.to_pixel(value))
    }

    /// Converts a pixel coordinate back to a data value.
    pub fn from_pixel(&mut self, finder: &Finder, pixel: f64) -> Option<f64> {
        if !pixel.is_finite() {
            return None;
        }
        let family = self.pick_family(finder)?;
        let transform = self.axis_transform(family, finder)?;
        Some(transform.from_pixel(pixel))
    }

    /// Converts an `[x, y]` data point to pixel space. Components that fail
    /// to resolve pass through unchanged.
    pub fn point_to_pixel(&mut self, finder: &Finder, point: [f64; 2]) -> [f64; 2] {
        let x = self
            .component_transform(AxisFamily::X, finder, point[0])
            .map(|transform| transform.to_pixel(point[0]));
        let y = self
            .component_transform(AxisFamily::Y, finder, point[1])
            .map(|transform| transform.to_pixel(point[1]));
        [x.unwrap_or(point[0]), y.unwrap_or(point[1])]
    }

    /// Converts an `[x, y]` pixel point back to data space, passing
    /// unresolvable components through unchanged.
    pub fn point_from_pixel(&mut self, finder: &Finder, point: [f64; 2]) -> [f64; 2] {
        let x = self
            .component_transform(AxisFamily::X, finder, point[0])
            .map(|transform| transform.from_pixel(point[0]));
        let y = self
            .component_transform(AxisFamily::Y, finder, point[1])
            .map(|transform| transform.from_pixel(point[1]));
        [x.unwrap_or(point[0]), y.unwrap_or(point[1])]
    }

    /// Resolves both axis transforms once for high-volume callers.
    pub fn batch_transform(&mut self, finder: &Finder) -> CoordinateTransform {
        CoordinateTransform {
            x: self.axis_transform(AxisFamily::X, finder),
            y: self.axis_transform(AxisFamily::Y, finder),
        }
    }

    /// Whether a pixel point falls inside the finder's grid (inclusive).
    pub fn contains_point(&mut self, finder: &Finder, point: [f64; 2]) -> bool {
        if !point[0].is_finite() || !point[1].is_finite() {
            return false;
        }
        if self.option.grid.is_empty() {
            return false;
        }
        let grid_index = self.resolve_grid_index(finder);
        let rect = self.layout.rect(self.option, self.context, grid_index);
        rect.contains(point[0], point[1])
    }

    /// Scalar axis selection: an explicit y finder wins, then an explicit x
    /// finder, then whichever axis kind is the only one configured.
    fn pick_family(&self, finder: &Finder) -> Option<AxisFamily> {
        let has_x_axes = !self.option.x_axis.is_empty();
        let has_y_axes = !self.option.y_axis.is_empty();

        if finder.has_y() && has_y_axes {
            Some(AxisFamily::Y)
        } else if finder.has_x() && has_x_axes {
            Some(AxisFamily::X)
        } else if has_x_axes && !has_y_axes {
            Some(AxisFamily::X)
        } else if has_y_axes && !has_x_axes {
            Some(AxisFamily::Y)
        } else if has_x_axes {
            Some(AxisFamily::X)
        } else {
            None
        }
    }

    fn component_transform(
        &mut self,
        family: AxisFamily,
        finder: &Finder,
        value: f64,
    ) -> Option<AxisTransform> {
        if !value.is_finite() {
            return None;
        }
        self.axis_transform(family, finder)
    }

    fn axis_transform(&mut self, family: AxisFamily, finder: &Finder) -> Option<AxisTransform> {
        if self.option.grid.is_empty() {
            return None;
        }
        let axis_index = self.resolve_axis_index(family, finder);
        let engine = match family {
            AxisFamily::X => &mut *self.x_axis,
            AxisFamily::Y => &mut *self.y_axis,
        };
        let layout = engine.layout(self.option, self.context, self.layout, axis_index)?;
        Some(AxisTransform {
            domain: layout.range,
            pixel_range: layout.pixel_range,
        })
    }

    fn resolve_axis_index(&self, family: AxisFamily, finder: &Finder) -> usize {
        let (index, id, axes): (Option<usize>, Option<&String>, &[AxisSpec]) = match family {
            AxisFamily::X => (
                finder.x_axis_index,
                finder.x_axis_id.as_ref(),
                &self.option.x_axis,
            ),
            AxisFamily::Y => (
                finder.y_axis_index,
                finder.y_axis_id.as_ref(),
                &self.option.y_axis,
            ),
        };

        if let Some(index) = index {
            return index;
        }
        if let Some(id) = id {
            if let Some(found) = axes
                .iter()
                .position(|axis| axis.id.as_deref() == Some(id.as_str()))
            {
                return found;
            }
        }
        0
    }

    /// Grid resolution order: explicit index, explicit id, the x finder's
    /// axis, the y finder's axis, then grid 0.
    fn resolve_grid_index(&self, finder: &Finder) -> usize {
        if let Some(index) = finder.grid_index {
            return index;
        }
        if let Some(id) = &finder.grid_id {
            if let Some(found) = self
                .option
                .grid
                .iter()
                .position(|grid| grid.id.as_deref() == Some(id.as_str()))
            {
                return found;
            }
        }
        if finder.has_x() {
            let axis_index = self.resolve_axis_index(AxisFamily::X, finder);
            if let Some(axis) = self
                .option
                .x_axis
                .get(axis_index)
                .or_else(|| self.option.x_axis.first())
            {
                return axis.grid_index;
            }
        }
        if finder.has_y() {
            let axis_index = self.resolve_axis_index(AxisFamily::Y, finder);
            if let Some(axis) = self
                .option
                .y_axis
                .get(axis_index)
                .or_else(|| self.option.y_axis.first())
            {
                return axis.grid_index;
            }
        }
        0
    }
}
