//! Grid layout: box-model specs resolved into pixel rectangles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::option::{ChartOption, GridSpec};

/// Axis-aligned pixel rectangle. Dimensions are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Inclusive boundary check.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Container dimensions broadcast to every consumer on resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    pub container_width: f64,
    pub container_height: f64,
}

impl RenderContext {
    #[must_use]
    pub const fn new(container_width: f64, container_height: f64) -> Self {
        Self {
            container_width,
            container_height,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.container_width.is_finite()
            && self.container_height.is_finite()
            && self.container_width > 0.0
            && self.container_height > 0.0
    }
}

/// Computes and caches pixel rectangles for grid specs.
///
/// The memo is cleared wholesale on any configuration or container change:
/// percentage offsets interact non-locally with the container size, so
/// selective invalidation is unsafe.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    cache: HashMap<usize, Rect>,
}

impl LayoutEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the pixel rectangle of the grid at `grid_index`.
    ///
    /// A missing index falls back to grid 0; with no grids configured the
    /// zero rect is returned.
    pub fn rect(&mut self, option: &ChartOption, context: RenderContext, grid_index: usize) -> Rect {
        if let Some(cached) = self.cache.get(&grid_index) {
            return *cached;
        }

        let rect = match option.grid.get(grid_index).or_else(|| option.grid.first()) {
            Some(grid) => compute_rect(grid, context),
            None => Rect::ZERO,
        };
        self.cache.insert(grid_index, rect);
        rect
    }

    /// Drops every cached rectangle.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

fn compute_rect(grid: &GridSpec, context: RenderContext) -> Rect {
    let top = grid.top.resolve(context.container_height);
    let bottom = grid.bottom.resolve(context.container_height);
    let left = grid.left.resolve(context.container_width);
    let right = grid.right.resolve(context.container_width);

    Rect {
        x: left,
        y: top,
        width: (context.container_width - left - right).max(0.0),
        height: (context.container_height - top - bottom).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutEngine, Rect, RenderContext};
    use crate::core::option::{ChartOption, GridSpec};

    fn context() -> RenderContext {
        RenderContext::new(800.0, 600.0)
    }

    #[test]
    fn rect_resolves_percent_against_container() {
        let option = ChartOption::baseline();
        let mut layout = LayoutEngine::new();
        let rect = layout.rect(&option, context(), 0);
        assert_eq!(rect, Rect::new(80.0, 60.0, 640.0, 480.0));
    }

    #[test]
    fn oversized_margins_clamp_dimensions_to_zero() {
        let mut option = ChartOption::baseline();
        option.grid = vec![GridSpec {
            left: 500.0.into(),
            right: 400.0.into(),
            ..GridSpec::default()
        }];
        let mut layout = LayoutEngine::new();
        let rect = layout.rect(&option, context(), 0);
        assert_eq!(rect.width, 0.0);
        assert!(rect.height > 0.0);
    }

    #[test]
    fn missing_grid_index_falls_back_to_first_grid() {
        let option = ChartOption::baseline();
        let mut layout = LayoutEngine::new();
        assert_eq!(
            layout.rect(&option, context(), 7),
            layout.rect(&option, context(), 0)
        );
    }

    #[test]
    fn invalidate_drops_all_cached_rects() {
        let option = ChartOption::baseline();
        let mut layout = LayoutEngine::new();
        let _ = layout.rect(&option, context(), 0);
        let _ = layout.rect(&option, context(), 1);
        assert_eq!(layout.cached_len(), 2);
        layout.invalidate();
        assert_eq!(layout.cached_len(), 0);
    }
}
