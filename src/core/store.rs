//! The configuration store: canonical option ownership, merge and diff.

use std::fmt;

use indexmap::IndexSet;
use tracing::debug;

use crate::core::normalize::{InputOption, normalize_input};
use crate::core::option::ChartOption;

/// Top-level configuration keys, used to address change-sets and the
/// key-to-unit mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    BackgroundColor,
    Grid,
    XAxis,
    YAxis,
    VisualMap,
    Tooltip,
    Series,
}

impl OptionKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackgroundColor => "backgroundColor",
            Self::Grid => "grid",
            Self::XAxis => "xAxis",
            Self::YAxis => "yAxis",
            Self::VisualMap => "visualMap",
            Self::Tooltip => "tooltip",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of top-level keys whose value differs after a merge, in
/// first-changed order.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    keys: IndexSet<OptionKey>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: OptionKey) {
        self.keys.insert(key);
    }

    #[must_use]
    pub fn contains(&self, key: OptionKey) -> bool {
        self.keys.contains(&key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = OptionKey> + '_ {
        self.keys.iter().copied()
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for key in &self.keys {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(key.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<OptionKey> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = OptionKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Owns the canonical, normalized configuration and computes minimal
/// change-sets from partial submissions.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    option: ChartOption,
}

impl ConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The live normalized configuration. Read-only by contract: consumers
    /// must not retain or mutate it across merges.
    #[must_use]
    pub fn current(&self) -> &ChartOption {
        &self.option
    }

    /// Normalizes and merges a partial submission, returning the set of
    /// top-level keys whose value actually changed.
    ///
    /// Keys the caller did not supply are never reported. Invalid values are
    /// not rejected here; consumers default them at read time.
    pub fn merge(&mut self, input: InputOption) -> ChangeSet {
        let normalized = normalize_input(input, &self.option);
        let mut changed = ChangeSet::new();

        if let Some(value) = &normalized.background_color {
            if *value != self.option.background_color {
                changed.insert(OptionKey::BackgroundColor);
            }
        }
        if let Some(value) = &normalized.grid {
            if *value != self.option.grid {
                changed.insert(OptionKey::Grid);
            }
        }
        if let Some(value) = &normalized.x_axis {
            if *value != self.option.x_axis {
                changed.insert(OptionKey::XAxis);
            }
        }
        if let Some(value) = &normalized.y_axis {
            if *value != self.option.y_axis {
                changed.insert(OptionKey::YAxis);
            }
        }
        if let Some(value) = &normalized.visual_map {
            if *value != self.option.visual_map {
                changed.insert(OptionKey::VisualMap);
            }
        }
        if let Some(value) = &normalized.tooltip {
            if *value != self.option.tooltip {
                changed.insert(OptionKey::Tooltip);
            }
        }
        if let Some(value) = &normalized.series {
            if *value != self.option.series {
                changed.insert(OptionKey::Series);
            }
        }

        // Visual mapping can be derived from series: when series changed and
        // the caller also supplied a visual map, deep-differing content joins
        // the change-set even if the top-level diff above skipped it.
        if changed.contains(OptionKey::Series) {
            if let Some(value) = &normalized.visual_map {
                if *value != self.option.visual_map {
                    changed.insert(OptionKey::VisualMap);
                }
            }
        }

        if let Some(value) = normalized.background_color {
            self.option.background_color = value;
        }
        if let Some(value) = normalized.grid {
            self.option.grid = value;
        }
        if let Some(value) = normalized.x_axis {
            self.option.x_axis = value;
        }
        if let Some(value) = normalized.y_axis {
            self.option.y_axis = value;
        }
        if let Some(value) = normalized.visual_map {
            self.option.visual_map = value;
        }
        if let Some(value) = normalized.tooltip {
            self.option.tooltip = value;
        }
        if let Some(value) = normalized.series {
            self.option.series = value;
        }

        debug!(changed = %changed, "merged partial option");
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigStore, OptionKey};
    use crate::core::normalize::{InputAxisSpec, InputOption, OneOrMany};
    use crate::core::option::{LineSeriesSpec, SeriesSpec};

    fn axis_update() -> InputOption {
        InputOption {
            x_axis: Some(OneOrMany::One(InputAxisSpec {
                min: Some(10.0.into()),
                max: Some(90.0.into()),
                ..InputAxisSpec::default()
            })),
            ..InputOption::default()
        }
    }

    #[test]
    fn merge_reports_only_supplied_changed_keys() {
        let mut store = ConfigStore::new();
        let changed = store.merge(axis_update());
        assert_eq!(changed.len(), 1);
        assert!(changed.contains(OptionKey::XAxis));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut store = ConfigStore::new();
        let first = store.merge(axis_update());
        assert!(!first.is_empty());
        let second = store.merge(axis_update());
        assert!(second.is_empty(), "second identical merge must be a no-op");
    }

    #[test]
    fn unchanged_supplied_key_is_not_reported() {
        let mut store = ConfigStore::new();
        let background = store.current().background_color.clone();
        let changed = store.merge(InputOption {
            background_color: Some(background),
            ..InputOption::default()
        });
        assert!(changed.is_empty());
    }

    #[test]
    fn series_update_replaces_wholesale() {
        let mut store = ConfigStore::new();
        let series = vec![SeriesSpec::Line(LineSeriesSpec {
            data: vec![vec![0.0, 1.0]].into(),
            ..LineSeriesSpec::default()
        })];
        let changed = store.merge(InputOption::new().with_series(series.clone()));
        assert!(changed.contains(OptionKey::Series));
        assert_eq!(store.current().series, series);

        let changed = store.merge(InputOption::new().with_series(Vec::new()));
        assert!(changed.contains(OptionKey::Series));
        assert!(store.current().series.is_empty());
    }
}
