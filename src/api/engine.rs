//! Main orchestration facade consumed by host applications.

use tracing::{debug, trace};

use crate::api::scheduler::{ComponentScheduler, RenderUnit, SceneServices, UnitKind, affected_units};
use crate::api::units::{
    AxisUnit, GridUnit, LineSeriesUnit, SeriesKey, TooltipUnit, VisualMapUnit, WaterfallSeriesUnit,
};
use crate::core::{
    AxisEngine, AxisFamily, ChangeSet, ChartOption, ConfigStore, CoordinateResolver,
    CoordinateTransform, Finder, InputOption, LayoutEngine, RenderContext,
};
use crate::error::{ChartError, ChartResult};
use crate::render::DrawSurface;

/// Configuration store plus the geometry caches every consumer shares.
#[derive(Debug)]
struct EngineCore {
    store: ConfigStore,
    context: RenderContext,
    layout: LayoutEngine,
    x_axis: AxisEngine,
    y_axis: AxisEngine,
}

impl EngineCore {
    fn invalidate_geometry(&mut self) {
        self.layout.invalidate();
        self.x_axis.invalidate();
        self.y_axis.invalidate();
    }
}

enum SeriesSelector<'a> {
    Id(&'a str),
    Index(usize),
}

/// The chart engine: owns the configuration store, the scheduler with the
/// built-in rendering units, the geometry caches and the draw surface.
///
/// The whole pipeline is synchronous; a configuration update is merged,
/// diffed, propagated and flushed before the call returns.
pub struct ChartEngine<S: DrawSurface> {
    surface: S,
    core: EngineCore,
    scheduler: ComponentScheduler,
}

impl<S: DrawSurface> ChartEngine<S> {
    /// Creates an engine over `surface` with the given container size and
    /// registers the built-in rendering units.
    pub fn new(surface: S, container_width: f64, container_height: f64) -> ChartResult<Self> {
        let context = RenderContext::new(container_width, container_height);
        if !context.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: container_width,
                height: container_height,
            });
        }

        let mut engine = Self {
            surface,
            core: EngineCore {
                store: ConfigStore::new(),
                context,
                layout: LayoutEngine::new(),
                x_axis: AxisEngine::new(AxisFamily::X),
                y_axis: AxisEngine::new(AxisFamily::Y),
            },
            scheduler: ComponentScheduler::new(),
        };

        let units: Vec<Box<dyn RenderUnit>> = vec![
            Box::new(GridUnit::new()),
            Box::new(AxisUnit::x()),
            Box::new(AxisUnit::y()),
            Box::new(VisualMapUnit::new()),
            Box::new(TooltipUnit::new()),
            Box::new(LineSeriesUnit::new()),
            Box::new(WaterfallSeriesUnit::new()),
        ];
        engine
            .scheduler
            .register(units, engine.core.store.current())?;

        Ok(engine)
    }

    /// The live normalized configuration.
    #[must_use]
    pub fn option(&self) -> &ChartOption {
        self.core.store.current()
    }

    #[must_use]
    pub fn context(&self) -> RenderContext {
        self.core.context
    }

    #[must_use]
    pub fn scheduler(&self) -> &ComponentScheduler {
        &self.scheduler
    }

    /// Mutable scheduler access, e.g. for typed unit lookups.
    pub fn scheduler_mut(&mut self) -> &mut ComponentScheduler {
        &mut self.scheduler
    }

    /// Registers additional rendering units alongside the built-in set.
    pub fn register_units(&mut self, units: Vec<Box<dyn RenderUnit>>) -> ChartResult<()> {
        self.scheduler.register(units, self.core.store.current())
    }

    /// Merges a partial configuration and re-renders the affected units.
    ///
    /// An empty change-set is a strict no-op: no broadcast, no flush.
    pub fn set_option(&mut self, input: InputOption) -> ChartResult<ChangeSet> {
        let changed = self.core.store.merge(input);
        if changed.is_empty() {
            debug!("option merge changed nothing; skipping render pass");
            return Ok(changed);
        }

        self.core.invalidate_geometry();
        let affected = affected_units(&changed);
        debug!(changed = %changed, affected = affected.len(), "propagating option change");
        self.scheduler.notify(&affected, self.core.store.current());
        self.flush()?;
        Ok(changed)
    }

    /// Parses a JSON partial configuration (camelCase keys) and applies it.
    pub fn set_option_json(&mut self, json: &str) -> ChartResult<ChangeSet> {
        let input: InputOption = serde_json::from_str(json)?;
        self.set_option(input)
    }

    /// Updates the container size, invalidates all cached geometry and
    /// re-renders every unit.
    pub fn resize(&mut self, container_width: f64, container_height: f64) -> ChartResult<()> {
        let context = RenderContext::new(container_width, container_height);
        if !context.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: container_width,
                height: container_height,
            });
        }

        debug!(container_width, container_height, "resizing container");
        self.core.context = context;
        self.core.invalidate_geometry();

        let core = &mut self.core;
        let mut services = SceneServices {
            option: core.store.current(),
            context: core.context,
            layout: &mut core.layout,
            x_axis: &mut core.x_axis,
            y_axis: &mut core.y_axis,
            surface: &mut self.surface,
        };
        self.scheduler.resize(context, &mut services)
    }

    /// Flushes pending dirty units without changing any configuration.
    pub fn render(&mut self) -> ChartResult<()> {
        self.flush()
    }

    fn flush(&mut self) -> ChartResult<()> {
        let core = &mut self.core;
        let mut services = SceneServices {
            option: core.store.current(),
            context: core.context,
            layout: &mut core.layout,
            x_axis: &mut core.x_axis,
            y_axis: &mut core.y_axis,
            surface: &mut self.surface,
        };
        self.scheduler.flush(&mut services)
    }

    fn resolver(&mut self) -> CoordinateResolver<'_> {
        let core = &mut self.core;
        CoordinateResolver::new(
            core.store.current(),
            core.context,
            &mut core.layout,
            &mut core.x_axis,
            &mut core.y_axis,
        )
    }

    /// Converts a data value to a pixel coordinate along the finder's axis.
    /// `None` when resolution fails or the input is not finite.
    pub fn to_pixel(&mut self, finder: &Finder, value: f64) -> Option<f64> {
        self.resolver().to_pixel(finder, value)
    }

    /// Converts a pixel coordinate back to a data value.
    pub fn from_pixel(&mut self, finder: &Finder, pixel: f64) -> Option<f64> {
        self.resolver().from_pixel(finder, pixel)
    }

    /// Converts an `[x, y]` data point to pixel space; unresolvable
    /// components pass through unchanged.
    pub fn point_to_pixel(&mut self, finder: &Finder, point: [f64; 2]) -> [f64; 2] {
        self.resolver().point_to_pixel(finder, point)
    }

    /// Converts an `[x, y]` pixel point back to data space.
    pub fn point_from_pixel(&mut self, finder: &Finder, point: [f64; 2]) -> [f64; 2] {
        self.resolver().point_from_pixel(finder, point)
    }

    /// Resolves both axis transforms once for high-volume callers.
    pub fn batch_transform(&mut self, finder: &Finder) -> CoordinateTransform {
        self.resolver().batch_transform(finder)
    }

    /// Whether a pixel point falls inside the finder's grid (inclusive).
    pub fn contains_point(&mut self, finder: &Finder, point: [f64; 2]) -> bool {
        self.resolver().contains_point(finder, point)
    }

    /// High-frequency data push addressed by series id: replaces the latest
    /// sample for line series, appends with FIFO eviction for rolling-window
    /// series. Bypasses the merge/diff pipeline entirely.
    pub fn push_frame(&mut self, series_id: &str, frame: Vec<f64>) -> ChartResult<()> {
        self.push_frame_to(SeriesSelector::Id(series_id), frame)
    }

    /// High-frequency data push addressed by series position in the
    /// configured series list.
    pub fn push_frame_at(&mut self, series_index: usize, frame: Vec<f64>) -> ChartResult<()> {
        self.push_frame_to(SeriesSelector::Index(series_index), frame)
    }

    fn push_frame_to(&mut self, selector: SeriesSelector<'_>, frame: Vec<f64>) -> ChartResult<()> {
        let (rolling, key) = self.locate_series(&selector).ok_or_else(|| match selector {
            SeriesSelector::Id(id) => ChartError::UnknownSeries(id.to_owned()),
            SeriesSelector::Index(index) => ChartError::UnknownSeries(format!("#{index}")),
        })?;

        let delivered = if rolling {
            self.scheduler
                .unit_mut::<WaterfallSeriesUnit>(UnitKind::WaterfallSeries)
                .map(|unit| unit.push_frame(&key, frame))
                .unwrap_or(false)
        } else {
            self.scheduler
                .unit_mut::<LineSeriesUnit>(UnitKind::LineSeries)
                .map(|unit| unit.replace_latest(&key, frame))
                .unwrap_or(false)
        };

        if !delivered {
            return Err(ChartError::UnknownSeries(key.to_string()));
        }

        trace!(series = %key, "pushed frame via high-frequency path");
        self.flush()
    }

    /// Broadcasts one frame to every rolling-window series, then flushes.
    pub fn push_frame_all(&mut self, frame: &[f64]) -> ChartResult<()> {
        if let Some(unit) = self
            .scheduler
            .unit_mut::<WaterfallSeriesUnit>(UnitKind::WaterfallSeries)
        {
            unit.push_frame_all(frame);
        }
        self.flush()
    }

    /// Resolves a series selector to its owning unit kind and the key the
    /// unit stores its model state under (id, or index within the unit's
    /// per-kind slice).
    fn locate_series(&self, selector: &SeriesSelector<'_>) -> Option<(bool, SeriesKey)> {
        let mut line_count = 0usize;
        let mut waterfall_count = 0usize;

        for (position, series) in self.core.store.current().series.iter().enumerate() {
            let local_index = if series.is_rolling_window() {
                waterfall_count
            } else {
                line_count
            };
            let matched = match selector {
                SeriesSelector::Id(id) => series.id() == Some(*id),
                SeriesSelector::Index(index) => position == *index,
            };
            if matched {
                return Some((
                    series.is_rolling_window(),
                    SeriesKey::from_spec(series.id(), local_index),
                ));
            }
            if series.is_rolling_window() {
                waterfall_count += 1;
            } else {
                line_count += 1;
            }
        }
        None
    }

    /// Tears down every registered unit and clears the surface.
    pub fn clear(&mut self) -> ChartResult<()> {
        self.scheduler.clear(&mut self.surface);
        self.surface.clear_all()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
