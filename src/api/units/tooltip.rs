use std::any::Any;

use crate::api::scheduler::{RenderUnit, SceneServices, UnitKind};
use crate::core::{ChartOption, RenderContext, TooltipSpec};
use crate::error::ChartResult;
use crate::render::DrawSurface;

/// Holds the tooltip configuration slice.
///
/// Tooltip content is pointer-driven and pointer events are outside the
/// core, so nothing is drawn here; the unit exists so tooltip-only option
/// changes stay minimal and its slice is ready when a host wires input.
#[derive(Debug, Default)]
pub struct TooltipUnit {
    tooltip: Option<TooltipSpec>,
    dirty: bool,
}

impl TooltipUnit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn spec(&self) -> Option<&TooltipSpec> {
        self.tooltip.as_ref()
    }
}

impl RenderUnit for TooltipUnit {
    fn kind(&self) -> UnitKind {
        UnitKind::Tooltip
    }

    fn on_option_update(&mut self, option: &ChartOption) {
        if self.tooltip.as_ref() != Some(&option.tooltip) {
            self.tooltip = Some(option.tooltip.clone());
            self.dirty = true;
        }
    }

    fn on_resize(&mut self, _context: RenderContext) {
        self.dirty = true;
    }

    fn update(&mut self, services: &mut SceneServices<'_>) -> ChartResult<()> {
        services.surface.clear_group(self.kind().group())?;
        self.dirty = false;
        Ok(())
    }

    fn clear(&mut self, surface: &mut dyn DrawSurface) {
        let _ = surface.clear_group(self.kind().group());
        self.tooltip = None;
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
