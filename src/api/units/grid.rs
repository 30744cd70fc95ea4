use std::any::Any;

use crate::api::scheduler::{RenderUnit, SceneServices, UnitKind};
use crate::core::{ChartOption, GridSpec, RenderContext};
use crate::error::ChartResult;
use crate::render::{Color, DrawSurface, Placement, RectPrimitive};

/// Renders the plot frame of every configured grid and publishes its clip
/// region. Other units derive their geometry from the same rectangles via
/// the layout engine.
#[derive(Debug, Default)]
pub struct GridUnit {
    grids: Vec<GridSpec>,
    dirty: bool,
}

impl GridUnit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderUnit for GridUnit {
    fn kind(&self) -> UnitKind {
        UnitKind::Grid
    }

    fn on_option_update(&mut self, option: &ChartOption) {
        if self.grids != option.grid {
            self.grids = option.grid.clone();
            self.dirty = true;
        }
    }

    fn on_resize(&mut self, _context: RenderContext) {
        self.dirty = true;
    }

    fn update(&mut self, services: &mut SceneServices<'_>) -> ChartResult<()> {
        let group = self.kind().group();
        services.surface.clear_group(group)?;

        for (index, grid) in self.grids.iter().enumerate() {
            let rect = services.grid_rect(index);
            let frame = RectPrimitive {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                fill: None,
                stroke: Some(Color::parse_lossy("#333")),
                stroke_width: 1.0,
                placement: Placement::new(grid.zlevel, grid.z),
            };
            services.surface.draw_rect(group, frame)?;
        }

        self.dirty = false;
        Ok(())
    }

    fn clear(&mut self, surface: &mut dyn DrawSurface) {
        let _ = surface.clear_group(self.kind().group());
        self.grids.clear();
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
