use std::any::Any;

use indexmap::IndexMap;
use tracing::trace;

use crate::api::scheduler::{RenderUnit, SceneServices, UnitKind};
use crate::core::{
    ChartOption, RenderContext, RingBuffer, ScrollDirection, SeriesData, SeriesSpec, ValueRange,
    WaterfallSeriesSpec,
};
use crate::api::units::SeriesKey;
use crate::error::ChartResult;
use crate::render::{DrawSurface, GroupId, ImagePrimitive, Placement};

/// Default sample range when a rolling window holds no finite data yet
/// (spectral power in dB).
const EMPTY_VALUE_RANGE: (f64, f64) = (-100.0, 0.0);

#[derive(Debug)]
struct WaterfallState {
    ring: RingBuffer<Vec<f64>>,
    seeded_from: SeriesData,
}

/// Renders rolling-window matrix series as one sample-matrix image per
/// series, newest frames at the scroll edge.
///
/// Owns the per-series ring buffers; the high-frequency push path appends
/// frames here with FIFO eviction, bypassing the merge pipeline entirely.
#[derive(Debug, Default)]
pub struct WaterfallSeriesUnit {
    series: Vec<WaterfallSeriesSpec>,
    states: IndexMap<SeriesKey, WaterfallState>,
    prev_groups: usize,
    dirty: bool,
}

impl WaterfallSeriesUnit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn extract(option: &ChartOption) -> Vec<WaterfallSeriesSpec> {
        option
            .series
            .iter()
            .filter_map(|series| match series {
                SeriesSpec::Waterfall(spec) => Some(spec.clone()),
                SeriesSpec::Line(_) => None,
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
                    state.ring.set_capacity(spec.max_rows);
                    // Re-seed only when the configured frames changed, so
                    // pushed realtime frames survive unrelated option churn.
                    if state.seeded_from != spec.data {
                        state.ring.clear();
                        state.ring.push_many(spec.data.0.iter().cloned());
                        state.seeded_from = spec.data.clone();
                    }
                }
                None => {
                    let mut ring = RingBuffer::new(spec.max_rows);
                    ring.push_many(spec.data.0.iter().cloned());
                    self.states.insert(
                        key,
                        WaterfallState {
                            ring,
                            seeded_from: spec.data.clone(),
                        },
                    );
                }
            }
        }
    }

    /// Appends one frame to a series' rolling window, evicting the oldest
    /// frame when full. Returns `false` when the series key is unknown.
    pub fn push_frame(&mut self, key: &SeriesKey, frame: Vec<f64>) -> bool {
        let Some(state) = self.states.get_mut(key) else {
            return false;
        };
        state.ring.push(frame);
        trace!(series = %key, rows = state.ring.len(), "pushed waterfall frame");
        self.dirty = true;
        true
    }

    /// Broadcasts one frame to every rolling-window series.
    pub fn push_frame_all(&mut self, frame: &[f64]) {
        for state in self.states.values_mut() {
            state.ring.push(frame.to_vec());
        }
        if !self.states.is_empty() {
            self.dirty = true;
        }
    }

    #[must_use]
    pub fn frame_count(&self, key: &SeriesKey) -> Option<usize> {
        self.states.get(key).map(|state| state.ring.len())
    }

    #[must_use]
    pub fn frames(&self, key: &SeriesKey) -> Option<Vec<Vec<f64>>> {
        self.states.get(key).map(|state| state.ring.to_vec())
    }

    fn value_range(spec: &WaterfallSeriesSpec, ring: &RingBuffer<Vec<f64>>) -> (f64, f64) {
        if let ValueRange::Fixed([min, max]) = spec.value_range {
            if min.is_finite() && max.is_finite() {
                return (min, max);
            }
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in ring.iter() {
            for sample in row {
                if sample.is_finite() {
                    min = min.min(*sample);
                    max = max.max(*sample);
                }
            }
        }
        if min.is_finite() && max.is_finite() {
            (min, max)
        } else {
            EMPTY_VALUE_RANGE
        }
    }
}

impl RenderUnit for WaterfallSeriesUnit {
    fn kind(&self) -> UnitKind {
        UnitKind::WaterfallSeries
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
        for index in 0..self.prev_groups.max(self.series.len()) {
            services.surface.clear_group(GroupId::indexed(
                UnitKind::WaterfallSeries.as_str(),
                index as u32,
            ))?;
        }

        for (index, spec) in self.series.iter().enumerate() {
            if !spec.show {
                continue;
            }
            let key = SeriesKey::from_spec(spec.id.as_deref(), index);
            let Some(state) = self.states.get(&key) else {
                continue;
            };
            if state.ring.is_empty() {
                continue;
            }

            let group = GroupId::indexed(UnitKind::WaterfallSeries.as_str(), index as u32);
            let grid_index = services
                .option
                .x_axis
                .get(spec.x_axis_index)
                .or_else(|| services.option.x_axis.first())
                .map(|axis| axis.grid_index)
                .unwrap_or(0);
            let rect = services.grid_rect(grid_index);
            services.surface.set_clip(group, Some(rect))?;

            let cols = state.ring.iter().map(Vec::len).max().unwrap_or(0);
            if cols == 0 {
                continue;
            }
            let rows = state.ring.len();

            // Scroll direction decides which end of the window lands on top:
            // Down shows the newest frame first, Up the oldest.
            let mut samples = Vec::with_capacity(rows * cols);
            let mut fill_row = |row: &Vec<f64>| {
                for col in 0..cols {
                    samples.push(row.get(col).copied().unwrap_or(f64::NAN));
                }
            };
            match spec.scroll {
                ScrollDirection::Down => state.ring.iter().rev().for_each(&mut fill_row),
                ScrollDirection::Up => state.ring.iter().for_each(&mut fill_row),
            }

            let image = ImagePrimitive {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                cols,
                rows,
                samples,
                value_range: Self::value_range(spec, &state.ring),
                ramp: spec.color_map.clone(),
                placement: Placement::new(spec.zlevel, spec.z),
            };
            services.surface.draw_image(group, image)?;
        }

        self.prev_groups = self.series.len();
        self.dirty = false;
        Ok(())
    }

    fn clear(&mut self, surface: &mut dyn DrawSurface) {
        for index in 0..self.prev_groups.max(self.series.len()) {
            let _ = surface.clear_group(GroupId::indexed(
                UnitKind::WaterfallSeries.as_str(),
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
