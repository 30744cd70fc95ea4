use std::any::Any;

use crate::api::scheduler::{RenderUnit, SceneServices, UnitKind};
use crate::api::units::{dash_pattern, stroke_width_or};
use crate::core::{
    AxisFamily, AxisLayout, AxisPosition, AxisSpec, ChartOption, Orientation, RenderContext,
};
use crate::error::ChartResult;
use crate::render::{Color, DrawSurface, LinePrimitive, Placement, TextHAlign, TextPrimitive};

/// Renders one axis family: axis line, tick marks, tick labels, split lines
/// across the grid and the optional unit caption.
///
/// The same unit type serves both families; `AxisFamily` picks the slice and
/// the scheduler identity.
#[derive(Debug)]
pub struct AxisUnit {
    family: AxisFamily,
    axes: Vec<AxisSpec>,
    dirty: bool,
}

impl AxisUnit {
    #[must_use]
    pub fn x() -> Self {
        Self {
            family: AxisFamily::X,
            axes: Vec::new(),
            dirty: false,
        }
    }

    #[must_use]
    pub fn y() -> Self {
        Self {
            family: AxisFamily::Y,
            axes: Vec::new(),
            dirty: false,
        }
    }

    fn slice<'a>(&self, option: &'a ChartOption) -> &'a [AxisSpec] {
        match self.family {
            AxisFamily::X => &option.x_axis,
            AxisFamily::Y => &option.y_axis,
        }
    }

    fn draw_axis(
        &self,
        services: &mut SceneServices<'_>,
        spec: &AxisSpec,
        layout: &AxisLayout,
    ) -> ChartResult<()> {
        let group = self.kind().group();
        let placement = Placement::new(spec.zlevel, spec.z);
        let line = layout.axis_line;

        if spec.split_line.show {
            let grid_rect = services.grid_rect(layout.grid_index);
            let style = &spec.split_line.line_style;
            let color = Color::parse_lossy(&style.color);
            let width = stroke_width_or(style.width, 1.0);
            for tick in &layout.ticks {
                let mut split = match layout.orient {
                    Orientation::Horizontal => LinePrimitive::new(
                        tick.coord,
                        grid_rect.y,
                        tick.coord,
                        grid_rect.bottom(),
                        width,
                        color,
                    ),
                    Orientation::Vertical => LinePrimitive::new(
                        grid_rect.x,
                        tick.coord,
                        grid_rect.right(),
                        tick.coord,
                        width,
                        color,
                    ),
                };
                if let Some(pattern) = dash_pattern(style.kind) {
                    split = split.with_dash(pattern);
                }
                services.surface.draw_line(group, split.with_placement(placement))?;
            }
        }

        if spec.axis_line.show {
            let axis_line =
                LinePrimitive::new(line.x1, line.y1, line.x2, line.y2, 1.0, Color::parse_lossy(&spec.axis_line.color))
                    .with_placement(placement);
            services.surface.draw_line(group, axis_line)?;
        }

        if spec.axis_tick.show {
            let color = Color::parse_lossy(&spec.axis_tick.color);
            let length = spec.axis_tick.length.max(0.0);
            for tick in &layout.ticks {
                let mark = match layout.position {
                    AxisPosition::Bottom => {
                        LinePrimitive::new(tick.coord, line.y1, tick.coord, line.y1 + length, 1.0, color)
                    }
                    AxisPosition::Top => {
                        LinePrimitive::new(tick.coord, line.y1, tick.coord, line.y1 - length, 1.0, color)
                    }
                    AxisPosition::Left => {
                        LinePrimitive::new(line.x1, tick.coord, line.x1 - length, tick.coord, 1.0, color)
                    }
                    AxisPosition::Right => {
                        LinePrimitive::new(line.x1, tick.coord, line.x1 + length, tick.coord, 1.0, color)
                    }
                };
                services.surface.draw_line(group, mark.with_placement(placement))?;
            }
        }

        if spec.axis_label.show {
            let color = Color::parse_lossy(&spec.axis_label.color);
            let font_size = spec.axis_label.font_size.max(1.0);
            let offset = spec.axis_tick.length.max(0.0) + 4.0;
            for tick in &layout.ticks {
                let label = match layout.position {
                    AxisPosition::Bottom => TextPrimitive::new(
                        tick.label.clone(),
                        tick.coord,
                        line.y1 + offset + font_size,
                        font_size,
                        color,
                        TextHAlign::Center,
                    ),
                    AxisPosition::Top => TextPrimitive::new(
                        tick.label.clone(),
                        tick.coord,
                        line.y1 - offset,
                        font_size,
                        color,
                        TextHAlign::Center,
                    ),
                    AxisPosition::Left => TextPrimitive::new(
                        tick.label.clone(),
                        line.x1 - offset,
                        tick.coord,
                        font_size,
                        color,
                        TextHAlign::Right,
                    ),
                    AxisPosition::Right => TextPrimitive::new(
                        tick.label.clone(),
                        line.x1 + offset,
                        tick.coord,
                        font_size,
                        color,
                        TextHAlign::Left,
                    ),
                };
                services.surface.draw_text(group, label.with_placement(placement))?;
            }
        }

        if spec.unit.show && !spec.unit.text.is_empty() {
            let color = Color::parse_lossy(&spec.unit.color);
            let font_size = spec.unit.font_size.max(1.0);
            let caption = match layout.orient {
                Orientation::Horizontal => TextPrimitive::new(
                    spec.unit.text.clone(),
                    line.x2 + 6.0,
                    line.y2,
                    font_size,
                    color,
                    TextHAlign::Left,
                ),
                Orientation::Vertical => TextPrimitive::new(
                    spec.unit.text.clone(),
                    line.x1,
                    line.y1 - 8.0,
                    font_size,
                    color,
                    TextHAlign::Center,
                ),
            };
            services.surface.draw_text(group, caption.with_placement(placement))?;
        }

        Ok(())
    }
}

impl RenderUnit for AxisUnit {
    fn kind(&self) -> UnitKind {
        match self.family {
            AxisFamily::X => UnitKind::XAxis,
            AxisFamily::Y => UnitKind::YAxis,
        }
    }

    fn depends_on(&self) -> &'static [UnitKind] {
        &[UnitKind::Grid]
    }

    fn on_option_update(&mut self, option: &ChartOption) {
        let slice = self.slice(option);
        if self.axes != slice {
            self.axes = slice.to_vec();
            self.dirty = true;
        }
    }

    fn on_resize(&mut self, _context: RenderContext) {
        self.dirty = true;
    }

    fn update(&mut self, services: &mut SceneServices<'_>) -> ChartResult<()> {
        let group = self.kind().group();
        services.surface.clear_group(group)?;

        for (index, spec) in self.axes.iter().enumerate() {
            if !spec.show {
                continue;
            }
            let Some(layout) = services.axis_layout(self.family, index) else {
                continue;
            };
            self.draw_axis(services, spec, &layout)?;
        }

        self.dirty = false;
        Ok(())
    }

    fn clear(&mut self, surface: &mut dyn DrawSurface) {
        let _ = surface.clear_group(self.kind().group());
        self.axes.clear();
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
