use std::any::Any;

use indexmap::IndexMap;

use crate::api::scheduler::{RenderUnit, SceneServices, UnitKind};
use crate::api::units::{SeriesKey, stroke_width_or};
use crate::core::{ChartOption, Finder, LineSeriesSpec, RenderContext, SeriesData, SeriesSpec};
use crate::error::ChartResult;
use crate::render::{Color, DrawSurface, GroupId, LinePrimitive, Placement};

#[derive(Debug)]
struct LineState {
    rows: Vec<Vec<f64>>,
    seeded_from: SeriesData,
}

/// Renders line series as polyline segments, one surface group per series.
///
/// The unit owns its point model: configured data seeds it, and the
/// high-frequency push path replaces the latest sample in place without
/// going through the merge pipeline.
#[derive(Debug, Default)]
pub struct LineSeriesUnit {
    series: Vec<LineSeriesSpec>,
    states: IndexMap<SeriesKey, LineState>,
    prev_groups: usize,
    dirty: bool,
}

impl LineSeriesUnit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn extract(option: &ChartOption) -> Vec<LineSeriesSpec> {
        option
            .series
            .iter()
            .filter_map(|series| match series {
                SeriesSpec::Line(spec) => Some(spec.clone()),
                SeriesSpec::Waterfall(_) => None,
            })
            .collect()
    }

    fn sync_states(&mut self) {
        let keys: Vec<SeriesKey> = self
            .series
            .iter()
            .enumerate()
            .map(|(index, spec)| SeriesKey::from_spec(spec.id.as_deref(), index))
            .collect();
        self.states.retain(|key, _| keys.contains(key));

        for (index, spec) in self.series.iter().enumerate() {
            let key = SeriesKey::from_spec(spec.id.as_deref(), index);
            match self.states.get_mut(&key) {
                Some(state) => {
                    // Re-seed only when the configured data itself changed;
                    // pushed realtime samples survive unrelated option churn.
                    if state.seeded_from != spec.data {
                        state.rows = spec.data.0.clone();
                        state.seeded_from = spec.data.clone();
                    }
                }
                None => {
                    self.states.insert(
                        key,
                        LineState {
                            rows: spec.data.0.clone(),
                            seeded_from: spec.data.clone(),
                        },
                    );
                }
            }
        }
    }

    /// Replace-latest push semantics for the high-frequency data path.
    /// Returns `false` when the series key is unknown.
    pub fn replace_latest(&mut self, key: &SeriesKey, frame: Vec<f64>) -> bool {
        let Some(state) = self.states.get_mut(key) else {
            return false;
        };
        if let Some(last) = state.rows.last_mut() {
            *last = frame;
        } else {
            state.rows.push(frame);
        }
        self.dirty = true;
        true
    }

    #[must_use]
    pub fn rows(&self, key: &SeriesKey) -> Option<&[Vec<f64>]> {
        self.states.get(key).map(|state| state.rows.as_slice())
    }
}

impl RenderUnit for LineSeriesUnit {
    fn kind(&self) -> UnitKind {
        UnitKind::LineSeries
    }

    fn depends_on(&self) -> &'static [UnitKind] {
        &[UnitKind::Grid, UnitKind::XAxis, UnitKind::YAxis]
    }

    fn on_option_update(&mut self, option: &ChartOption) {
        let slice = Self::extract(option);
        if self.series != slice {
            self.series = slice;
            self.sync_states();
            self.dirty = true;
        }
    }

    fn on_resize(&mut self, _context: RenderContext) {
        self.dirty = true;
    }

    fn update(&mut self, services: &mut SceneServices<'_>) -> ChartResult<()> {
        // Clear every group drawn last pass so removed series leave nothing behind.
        for index in 0..self.prev_groups.max(self.series.len()) {
            services
                .surface
                .clear_group(GroupId::indexed(UnitKind::LineSeries.as_str(), index as u32))?;
        }

        for (index, spec) in self.series.iter().enumerate() {
            if !spec.show {
                continue;
            }
            let group = GroupId::indexed(UnitKind::LineSeries.as_str(), index as u32);
            let finder = Finder {
                x_axis_index: Some(spec.x_axis_index),
                y_axis_index: Some(spec.y_axis_index),
                ..Finder::default()
            };
            let transform = services.coordinates().batch_transform(&finder);
            let (Some(x_transform), Some(y_transform)) = (transform.x, transform.y) else {
                // Unresolvable axes degrade to skipping the series.
                continue;
            };

            let grid_index = services
                .option
                .x_axis
                .get(spec.x_axis_index)
                .or_else(|| services.option.x_axis.first())
                .map(|axis| axis.grid_index)
                .unwrap_or(0);
            let clip = services.grid_rect(grid_index);
            services.surface.set_clip(group, Some(clip))?;

            let key = SeriesKey::from_spec(spec.id.as_deref(), index);
            let Some(state) = self.states.get(&key) else {
                continue;
            };

            let color = Color::parse_lossy(&spec.color);
            let width = stroke_width_or(spec.width, 2.0);
            let placement = Placement::new(spec.zlevel, spec.z);

            let mut previous: Option<[f64; 2]> = None;
            for row in &state.rows {
                let pixel = row
                    .first()
                    .zip(row.get(1))
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(x, y)| [x_transform.to_pixel(*x), y_transform.to_pixel(*y)]);

                if let (Some(from), Some(to)) = (previous, pixel) {
                    let segment = LinePrimitive::new(from[0], from[1], to[0], to[1], width, color)
                        .with_placement(placement);
                    services.surface.draw_line(group, segment)?;
                }
                // A non-transformable sample breaks the polyline.
                previous = pixel;
            }
        }

        self.prev_groups = self.series.len();
        self.dirty = false;
        Ok(())
    }

    fn clear(&mut self, surface: &mut dyn DrawSurface) {
        for index in 0..self.prev_groups.max(self.series.len()) {
            let _ = surface.clear_group(GroupId::indexed(
                UnitKind::LineSeries.as_str(),
                index as u32,
            ));
        }
        self.series.clear();
        self.states.clear();
        self.prev_groups = 0;
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
