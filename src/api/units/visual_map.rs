use std::any::Any;

use crate::api::scheduler::{RenderUnit, SceneServices, UnitKind};
use crate::core::axis::format_tick_label;
use crate::core::{ChartOption, RenderContext, VisualMapOrient, VisualMapSpec};
use crate::error::ChartResult;
use crate::render::{Color, DrawSurface, Placement, RectPrimitive, TextHAlign, TextPrimitive};

/// Renders visual-mapping legends: a ramp bar frame plus min/max labels.
///
/// The ramp gradient itself is the backend's job; the engine only places the
/// bar and passes the color stops through on the series images.
#[derive(Debug, Default)]
pub struct VisualMapUnit {
    specs: Vec<VisualMapSpec>,
    dirty: bool,
}

impl VisualMapUnit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderUnit for VisualMapUnit {
    fn kind(&self) -> UnitKind {
        UnitKind::VisualMap
    }

    fn on_option_update(&mut self, option: &ChartOption) {
        if self.specs != option.visual_map {
            self.specs = option.visual_map.clone();
            self.dirty = true;
        }
    }

    fn on_resize(&mut self, _context: RenderContext) {
        self.dirty = true;
    }

    fn update(&mut self, services: &mut SceneServices<'_>) -> ChartResult<()> {
        let group = self.kind().group();
        services.surface.clear_group(group)?;

        let container_width = services.context.container_width;
        let container_height = services.context.container_height;

        for spec in &self.specs {
            if !spec.show {
                continue;
            }

            let (bar_width, bar_height) = match spec.orient {
                VisualMapOrient::Vertical => (spec.item_width, spec.item_height),
                VisualMapOrient::Horizontal => (spec.item_height, spec.item_width),
            };
            let right_offset = spec.right.resolve(container_width);
            let bottom_offset = spec.bottom.resolve(container_height);
            let x = (container_width - right_offset - bar_width).max(0.0);
            let y = (container_height - bottom_offset - bar_height).max(0.0);

            let placement = Placement::new(spec.zlevel, spec.z);
            let text_color = Color::parse_lossy(&spec.text_style.color);
            let font_size = spec.text_style.font_size.max(1.0);

            let bar = RectPrimitive {
                x,
                y,
                width: bar_width,
                height: bar_height,
                fill: None,
                stroke: Some(text_color),
                stroke_width: 1.0,
                placement,
            };
            services.surface.draw_rect(group, bar)?;

            let (max_anchor, min_anchor, align) = match spec.orient {
                VisualMapOrient::Vertical => (
                    (x + bar_width + 4.0, y + font_size),
                    (x + bar_width + 4.0, y + bar_height),
                    TextHAlign::Left,
                ),
                VisualMapOrient::Horizontal => (
                    (x + bar_width, y - 4.0),
                    (x, y - 4.0),
                    TextHAlign::Center,
                ),
            };

            let max_label = TextPrimitive::new(
                format_tick_label(spec.max),
                max_anchor.0,
                max_anchor.1,
                font_size,
                text_color,
                align,
            )
            .with_placement(placement);
            let min_label = TextPrimitive::new(
                format_tick_label(spec.min),
                min_anchor.0,
                min_anchor.1,
                font_size,
                text_color,
                align,
            )
            .with_placement(placement);
            services.surface.draw_text(group, max_label)?;
            services.surface.draw_text(group, min_label)?;
        }

        self.dirty = false;
        Ok(())
    }

    fn clear(&mut self, surface: &mut dyn DrawSurface) {
        let _ = surface.clear_group(self.kind().group());
        self.specs.clear();
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
