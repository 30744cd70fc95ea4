//! The component scheduler: unit registry, dependency graph, dirty
//! propagation and topologically ordered flushes.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::{
    AxisEngine, AxisFamily, AxisLayout, ChangeSet, ChartOption, CoordinateResolver, LayoutEngine,
    OptionKey, Rect, RenderContext,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawSurface, GroupId};

/// Stable identifier of a rendering unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Grid,
    XAxis,
    YAxis,
    VisualMap,
    Tooltip,
    LineSeries,
    WaterfallSeries,
}

impl UnitKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::XAxis => "xAxis",
            Self::YAxis => "yAxis",
            Self::VisualMap => "visualMap",
            Self::Tooltip => "tooltip",
            Self::LineSeries => "lineSeries",
            Self::WaterfallSeries => "waterfallSeries",
        }
    }

    /// The surface group a unit of this kind draws into.
    #[must_use]
    pub const fn group(self) -> GroupId {
        GroupId::new(self.as_str())
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared geometry and drawing access handed to units during `update`.
///
/// Units never hold references to one another; everything a unit consumes
/// from its dependencies flows through here.
pub struct SceneServices<'a> {
    pub option: &'a ChartOption,
    pub context: RenderContext,
    pub layout: &'a mut LayoutEngine,
    pub x_axis: &'a mut AxisEngine,
    pub y_axis: &'a mut AxisEngine,
    pub surface: &'a mut dyn DrawSurface,
}

impl SceneServices<'_> {
    pub fn grid_rect(&mut self, grid_index: usize) -> Rect {
        self.layout.rect(self.option, self.context, grid_index)
    }

    pub fn axis_layout(&mut self, family: AxisFamily, axis_index: usize) -> Option<AxisLayout> {
        let engine = match family {
            AxisFamily::X => &mut *self.x_axis,
            AxisFamily::Y => &mut *self.y_axis,
        };
        engine.layout(self.option, self.context, self.layout, axis_index)
    }

    pub fn coordinates(&mut self) -> CoordinateResolver<'_> {
        CoordinateResolver::new(
            self.option,
            self.context,
            self.layout,
            self.x_axis,
            self.y_axis,
        )
    }
}

/// One independently schedulable rendering unit.
///
/// Lifecycle: registered -> (dirty <-> clean) -> destroyed. A unit becomes
/// dirty when its configuration slice changes or the container resizes, and
/// clears its own dirty flag at the end of a successful `update`.
pub trait RenderUnit: Any {
    fn kind(&self) -> UnitKind;

    /// Static dependency declaration; immutable per unit type.
    fn depends_on(&self) -> &'static [UnitKind] {
        &[]
    }

    fn init(&mut self) {}

    /// Called once after registration with the resolved dependency sets. A
    /// missing dependency is non-fatal; the unit must degrade, not crash.
    fn on_dependencies_ready(&mut self, _available: &[UnitKind], _missing: &[UnitKind]) {}

    /// Extracts the unit's slice of the full configuration, marking itself
    /// dirty when the slice actually changed.
    fn on_option_update(&mut self, option: &ChartOption);

    /// Container size changed: drop local caches and mark dirty.
    fn on_resize(&mut self, context: RenderContext);

    fn update(&mut self, services: &mut SceneServices<'_>) -> ChartResult<()>;

    /// Teardown: release everything the unit drew.
    fn clear(&mut self, surface: &mut dyn DrawSurface);

    fn is_dirty(&self) -> bool;

    fn mark_dirty(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Maps a changed top-level configuration key to the units it directly
/// affects. Background color is consumed by the host surface, not a unit.
const fn units_for_key(key: OptionKey) -> &'static [UnitKind] {
    match key {
        OptionKey::BackgroundColor => &[],
        OptionKey::Grid => &[UnitKind::Grid],
        OptionKey::XAxis => &[UnitKind::XAxis],
        OptionKey::YAxis => &[UnitKind::YAxis],
        OptionKey::VisualMap => &[UnitKind::VisualMap],
        OptionKey::Tooltip => &[UnitKind::Tooltip],
        OptionKey::Series => &[UnitKind::LineSeries, UnitKind::WaterfallSeries],
    }
}

/// Expands a change-set into the transitively affected unit set: geometry
/// consumers follow their providers (grid -> axes -> series).
#[must_use]
pub fn affected_units(changed: &ChangeSet) -> SmallVec<[UnitKind; 8]> {
    let mut affected: SmallVec<[UnitKind; 8]> = SmallVec::new();
    let mut add = |kind: UnitKind, set: &mut SmallVec<[UnitKind; 8]>| {
        if !set.contains(&kind) {
            set.push(kind);
        }
    };

    for key in changed.iter() {
        for kind in units_for_key(key) {
            add(*kind, &mut affected);
        }
    }

    if affected.contains(&UnitKind::Grid) {
        add(UnitKind::XAxis, &mut affected);
        add(UnitKind::YAxis, &mut affected);
        add(UnitKind::LineSeries, &mut affected);
        add(UnitKind::WaterfallSeries, &mut affected);
    }
    if affected.contains(&UnitKind::XAxis) || affected.contains(&UnitKind::YAxis) {
        add(UnitKind::LineSeries, &mut affected);
        add(UnitKind::WaterfallSeries, &mut affected);
    }

    affected
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Owns the unit registry and the cached topological order.
#[derive(Default)]
pub struct ComponentScheduler {
    units: IndexMap<UnitKind, Box<dyn RenderUnit>>,
    sorted: Vec<UnitKind>,
    sort_stale: bool,
}

impl ComponentScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers units: stores them, wires dependencies, recomputes the
    /// topological order (structural cycles are fatal here), broadcasts the
    /// current configuration to every unit and runs `init` in registration
    /// order.
    pub fn register(
        &mut self,
        units: Vec<Box<dyn RenderUnit>>,
        option: &ChartOption,
    ) -> ChartResult<()> {
        for unit in units {
            let kind = unit.kind();
            if self.units.insert(kind, unit).is_some() {
                warn!(unit = %kind, "replacing already-registered unit");
            }
        }
        self.sort_stale = true;

        self.inject_dependencies();
        self.rebuild_order()?;

        for unit in self.units.values_mut() {
            unit.on_option_update(option);
        }
        for unit in self.units.values_mut() {
            unit.init();
        }
        Ok(())
    }

    fn inject_dependencies(&mut self) {
        let registered: SmallVec<[UnitKind; 8]> = self.units.keys().copied().collect();

        let plans: Vec<(UnitKind, SmallVec<[UnitKind; 4]>, SmallVec<[UnitKind; 4]>)> = self
            .units
            .iter()
            .map(|(kind, unit)| {
                let mut available: SmallVec<[UnitKind; 4]> = SmallVec::new();
                let mut missing: SmallVec<[UnitKind; 4]> = SmallVec::new();
                for dep in unit.depends_on() {
                    if registered.contains(dep) {
                        available.push(*dep);
                    } else {
                        missing.push(*dep);
                    }
                }
                (*kind, available, missing)
            })
            .collect();

        for (kind, available, missing) in plans {
            for dep in &missing {
                warn!(
                    unit = %kind,
                    dependency = %dep,
                    "unit dependency not registered; continuing with partial set"
                );
            }
            if let Some(unit) = self.units.get_mut(&kind) {
                unit.on_dependencies_ready(&available, &missing);
            }
        }
    }

    /// Three-color DFS over the static dependency declarations. Revisiting a
    /// gray node is a structural error naming the exact cycle path.
    fn rebuild_order(&mut self) -> ChartResult<()> {
        fn visit(
            units: &IndexMap<UnitKind, Box<dyn RenderUnit>>,
            kind: UnitKind,
            marks: &mut HashMap<UnitKind, Mark>,
            path: &mut Vec<UnitKind>,
            sorted: &mut Vec<UnitKind>,
        ) -> ChartResult<()> {
            match marks.get(&kind).copied().unwrap_or(Mark::White) {
                Mark::Black => return Ok(()),
                Mark::Gray => {
                    let start = path.iter().position(|entry| *entry == kind).unwrap_or(0);
                    let mut cycle: Vec<&str> =
                        path[start..].iter().map(|entry| entry.as_str()).collect();
                    cycle.push(kind.as_str());
                    return Err(ChartError::CircularDependency {
                        cycle: cycle.join(" -> "),
                    });
                }
                Mark::White => {}
            }

            marks.insert(kind, Mark::Gray);
            path.push(kind);

            let deps: SmallVec<[UnitKind; 4]> = units
                .get(&kind)
                .map(|unit| unit.depends_on().iter().copied().collect())
                .unwrap_or_default();
            for dep in deps {
                if units.contains_key(&dep) {
                    visit(units, dep, marks, path, sorted)?;
                }
            }

            path.pop();
            marks.insert(kind, Mark::Black);
            sorted.push(kind);
            Ok(())
        }

        let mut marks = HashMap::new();
        let mut path = Vec::new();
        let mut sorted = Vec::with_capacity(self.units.len());
        let kinds: SmallVec<[UnitKind; 8]> = self.units.keys().copied().collect();
        for kind in kinds {
            visit(&self.units, kind, &mut marks, &mut path, &mut sorted)?;
        }

        self.sorted = sorted;
        self.sort_stale = false;
        Ok(())
    }

    /// The cached dependency-correct update order.
    #[must_use]
    pub fn order(&self) -> &[UnitKind] {
        &self.sorted
    }

    #[must_use]
    pub fn is_registered(&self, kind: UnitKind) -> bool {
        self.units.contains_key(&kind)
    }

    #[must_use]
    pub fn dirty_units(&self) -> Vec<UnitKind> {
        self.units
            .iter()
            .filter(|(_, unit)| unit.is_dirty())
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Broadcasts the configuration to the given units only; everything else
    /// stays untouched (the minimal-re-render contract).
    pub fn notify(&mut self, kinds: &[UnitKind], option: &ChartOption) {
        for kind in kinds {
            if let Some(unit) = self.units.get_mut(kind) {
                unit.on_option_update(option);
            }
        }
    }

    /// Walks the cached topological order and updates dirty units only.
    ///
    /// A failing unit is isolated: the error is logged, the unit stays
    /// dirty, and the flush continues with the remaining units.
    pub fn flush(&mut self, services: &mut SceneServices<'_>) -> ChartResult<()> {
        if self.sort_stale {
            self.rebuild_order()?;
        }

        let order: SmallVec<[UnitKind; 8]> = self.sorted.iter().copied().collect();
        for kind in order {
            let Some(unit) = self.units.get_mut(&kind) else {
                continue;
            };
            if !unit.is_dirty() {
                continue;
            }
            debug!(unit = %kind, "updating dirty unit");
            if let Err(error) = unit.update(services) {
                warn!(unit = %kind, error = %error, "unit update failed; continuing flush");
            }
        }
        Ok(())
    }

    /// Broadcasts a container change to every unit, then flushes once.
    pub fn resize(
        &mut self,
        context: RenderContext,
        services: &mut SceneServices<'_>,
    ) -> ChartResult<()> {
        for unit in self.units.values_mut() {
            unit.on_resize(context);
        }
        self.flush(services)
    }

    /// Tears every unit down and discards the registry. All-or-nothing:
    /// there is no partially-destroyed state.
    pub fn clear(&mut self, surface: &mut dyn DrawSurface) {
        for unit in self.units.values_mut() {
            unit.clear(surface);
        }
        self.units.clear();
        self.sorted.clear();
        self.sort_stale = true;
    }

    /// Typed access to a registered unit, for the high-frequency data path.
    pub fn unit_mut<T: RenderUnit>(&mut self, kind: UnitKind) -> Option<&mut T> {
        self.units
            .get_mut(&kind)
            .and_then(|unit| unit.as_any_mut().downcast_mut::<T>())
    }
}

impl fmt::Debug for ComponentScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentScheduler")
            .field("units", &self.units.keys().collect::<Vec<_>>())
            .field("sorted", &self.sorted)
            .field("sort_stale", &self.sort_stale)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{UnitKind, affected_units};
    use crate::core::{ChangeSet, OptionKey};

    #[test]
    fn tooltip_change_affects_only_tooltip() {
        let changed: ChangeSet = [OptionKey::Tooltip].into_iter().collect();
        let affected = affected_units(&changed);
        assert_eq!(affected.as_slice(), &[UnitKind::Tooltip]);
    }

    #[test]
    fn grid_change_expands_to_axes_and_series() {
        let changed: ChangeSet = [OptionKey::Grid].into_iter().collect();
        let affected = affected_units(&changed);
        for kind in [
            UnitKind::Grid,
            UnitKind::XAxis,
            UnitKind::YAxis,
            UnitKind::LineSeries,
            UnitKind::WaterfallSeries,
        ] {
            assert!(affected.contains(&kind), "{kind} should be affected");
        }
        assert!(!affected.contains(&UnitKind::VisualMap));
        assert!(!affected.contains(&UnitKind::Tooltip));
    }

    #[test]
    fn axis_change_expands_to_series_only() {
        let changed: ChangeSet = [OptionKey::YAxis].into_iter().collect();
        let affected = affected_units(&changed);
        assert!(affected.contains(&UnitKind::YAxis));
        assert!(affected.contains(&UnitKind::LineSeries));
        assert!(affected.contains(&UnitKind::WaterfallSeries));
        assert!(!affected.contains(&UnitKind::Grid));
        assert!(!affected.contains(&UnitKind::XAxis));
    }

    #[test]
    fn background_color_change_affects_no_unit() {
        let changed: ChangeSet = [OptionKey::BackgroundColor].into_iter().collect();
        assert!(affected_units(&changed).is_empty());
    }
}
