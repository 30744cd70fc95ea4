//! Partial-input normalization.
//!
//! User-supplied configuration allows singletons where the canonical form
//! keeps arrays, and omits any field it does not care about. Normalization
//! coerces everything into the canonical shape before the store diffs and
//! merges it: singletons become one-element arrays, omitted per-axis
//! sub-specs are copied from the index-0 template, and an omitted
//! `gridIndex` resolves to the axis's own index.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::axis::AxisFamily;
use crate::core::option::{
    AxisBound, AxisKind, AxisLabelSpec, AxisLineSpec, AxisPointerKind, AxisPointerSpec,
    AxisPosition, AxisSpec, AxisTickSpec, ChartOption, GridSpec, LineKind, LineStyleSpec,
    SeriesSpec, SplitLineSpec, TextStyleSpec, TickPolicy, TooltipSpec, TooltipTrigger, UnitSpec,
    VisualMapSpec,
};

/// A field accepting either a single spec or an array of specs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

/// Partial axis spec: every field and sub-spec field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputAxisSpec {
    pub id: Option<String>,
    pub grid_index: Option<usize>,
    pub z: Option<i32>,
    pub zlevel: Option<i32>,
    pub show: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<AxisKind>,
    pub min: Option<AxisBound>,
    pub max: Option<AxisBound>,
    pub position: Option<AxisPosition>,
    pub split_number: Option<u32>,
    pub tick_policy: Option<TickPolicy>,
    pub axis_line: Option<InputAxisLineSpec>,
    pub axis_tick: Option<InputAxisTickSpec>,
    pub axis_label: Option<InputAxisLabelSpec>,
    pub split_line: Option<InputSplitLineSpec>,
    pub unit: Option<InputUnitSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputAxisLineSpec {
    pub show: Option<bool>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputAxisTickSpec {
    pub show: Option<bool>,
    pub length: Option<f64>,
    pub color: Option<String>,
    pub split_number: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputAxisLabelSpec {
    pub show: Option<bool>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputLineStyleSpec {
    pub color: Option<String>,
    pub width: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<LineKind>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputSplitLineSpec {
    pub show: Option<bool>,
    pub line_style: Option<InputLineStyleSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputUnitSpec {
    pub show: Option<bool>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputTextStyleSpec {
    pub color: Option<String>,
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputAxisPointerSpec {
    #[serde(rename = "type")]
    pub kind: Option<AxisPointerKind>,
    pub line_style: Option<InputLineStyleSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputTooltipSpec {
    pub show: Option<bool>,
    pub trigger: Option<TooltipTrigger>,
    pub axis_pointer: Option<InputAxisPointerSpec>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub text_style: Option<InputTextStyleSpec>,
    pub padding: Option<f64>,
}

/// Partial configuration as submitted by callers.
///
/// Any field may be omitted; `grid`/`xAxis`/`yAxis`/`visualMap` additionally
/// accept a single spec in place of an array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputOption {
    pub background_color: Option<String>,
    pub grid: Option<OneOrMany<GridSpec>>,
    pub x_axis: Option<OneOrMany<InputAxisSpec>>,
    pub y_axis: Option<OneOrMany<InputAxisSpec>>,
    pub visual_map: Option<OneOrMany<VisualMapSpec>>,
    pub tooltip: Option<InputTooltipSpec>,
    pub series: Option<Vec<SeriesSpec>>,
}

impl InputOption {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_series(mut self, series: Vec<SeriesSpec>) -> Self {
        self.series = Some(series);
        self
    }

    #[must_use]
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

/// The canonical-shape projection of one partial submission. `None` means
/// "not supplied": never diffed, never merged.
#[derive(Debug, Clone, Default)]
pub(crate) struct NormalizedInput {
    pub background_color: Option<String>,
    pub grid: Option<Vec<GridSpec>>,
    pub x_axis: Option<Vec<AxisSpec>>,
    pub y_axis: Option<Vec<AxisSpec>>,
    pub visual_map: Option<Vec<VisualMapSpec>>,
    pub tooltip: Option<TooltipSpec>,
    pub series: Option<Vec<SeriesSpec>>,
}

pub(crate) fn normalize_input(input: InputOption, current: &ChartOption) -> NormalizedInput {
    let x_template = current
        .x_axis
        .first()
        .cloned()
        .unwrap_or_else(AxisSpec::default_x);
    let y_template = current
        .y_axis
        .first()
        .cloned()
        .unwrap_or_else(AxisSpec::default_y);

    NormalizedInput {
        background_color: input.background_color,
        grid: input.grid.map(OneOrMany::into_vec),
        x_axis: input.x_axis.map(|axes| {
            fill_axes(axes.into_vec(), &x_template, AxisFamily::X)
        }),
        y_axis: input.y_axis.map(|axes| {
            fill_axes(axes.into_vec(), &y_template, AxisFamily::Y)
        }),
        visual_map: input.visual_map.map(OneOrMany::into_vec),
        tooltip: input
            .tooltip
            .map(|tooltip| merge_tooltip(current.tooltip.clone(), tooltip)),
        series: input.series,
    }
}

fn fill_axes(axes: Vec<InputAxisSpec>, template: &AxisSpec, family: AxisFamily) -> Vec<AxisSpec> {
    axes.into_iter()
        .enumerate()
        .map(|(index, axis)| fill_axis(axis, template, index, family))
        .collect()
}

/// Fills one partial axis from the index-0 template, resolving `grid_index`
/// to the axis's own index when omitted.
fn fill_axis(
    input: InputAxisSpec,
    template: &AxisSpec,
    index: usize,
    family: AxisFamily,
) -> AxisSpec {
    let position = constrain_position(input.position.unwrap_or(template.position), family);
    let axis_line = input.axis_line.unwrap_or_default();
    let axis_tick = input.axis_tick.unwrap_or_default();
    let axis_label = input.axis_label.unwrap_or_default();
    let split_line = input.split_line.unwrap_or_default();
    let split_line_style = split_line.line_style.unwrap_or_default();
    let unit = input.unit.unwrap_or_default();

    AxisSpec {
        id: input.id,
        grid_index: input.grid_index.unwrap_or(index),
        z: input.z.unwrap_or(template.z),
        zlevel: input.zlevel.unwrap_or(template.zlevel),
        show: input.show.unwrap_or(template.show),
        kind: input.kind.unwrap_or(template.kind),
        min: input.min.unwrap_or(template.min),
        max: input.max.unwrap_or(template.max),
        position,
        split_number: input.split_number.unwrap_or(template.split_number),
        tick_policy: input.tick_policy.unwrap_or(template.tick_policy),
        axis_line: AxisLineSpec {
            show: axis_line.show.unwrap_or(template.axis_line.show),
            color: axis_line
                .color
                .unwrap_or_else(|| template.axis_line.color.clone()),
        },
        axis_tick: AxisTickSpec {
            show: axis_tick.show.unwrap_or(template.axis_tick.show),
            length: axis_tick.length.unwrap_or(template.axis_tick.length),
            color: axis_tick
                .color
                .unwrap_or_else(|| template.axis_tick.color.clone()),
            split_number: axis_tick
                .split_number
                .unwrap_or(template.axis_tick.split_number),
        },
        axis_label: AxisLabelSpec {
            show: axis_label.show.unwrap_or(template.axis_label.show),
            color: axis_label
                .color
                .unwrap_or_else(|| template.axis_label.color.clone()),
            font_size: axis_label
                .font_size
                .unwrap_or(template.axis_label.font_size),
        },
        split_line: SplitLineSpec {
            show: split_line.show.unwrap_or(template.split_line.show),
            line_style: LineStyleSpec {
                color: split_line_style
                    .color
                    .unwrap_or_else(|| template.split_line.line_style.color.clone()),
                width: split_line_style
                    .width
                    .unwrap_or(template.split_line.line_style.width),
                kind: split_line_style
                    .kind
                    .unwrap_or(template.split_line.line_style.kind),
            },
        },
        unit: UnitSpec {
            show: unit.show.unwrap_or(template.unit.show),
            text: unit.text.unwrap_or_else(|| template.unit.text.clone()),
            color: unit.color.unwrap_or_else(|| template.unit.color.clone()),
            font_size: unit.font_size.unwrap_or(template.unit.font_size),
        },
    }
}

/// X axes live on top/bottom, Y axes on left/right. An edge illegal for the
/// axis kind degrades to the kind's default edge.
fn constrain_position(position: AxisPosition, family: AxisFamily) -> AxisPosition {
    match family {
        AxisFamily::X if !position.is_horizontal() => {
            warn!(?position, "x axis position must be top or bottom; using bottom");
            AxisPosition::Bottom
        }
        AxisFamily::Y if position.is_horizontal() => {
            warn!(?position, "y axis position must be left or right; using left");
            AxisPosition::Left
        }
        _ => position,
    }
}

fn merge_tooltip(base: TooltipSpec, input: InputTooltipSpec) -> TooltipSpec {
    let axis_pointer = input.axis_pointer.unwrap_or_default();
    let pointer_style = axis_pointer.line_style.unwrap_or_default();
    let text_style = input.text_style.unwrap_or_default();

    TooltipSpec {
        show: input.show.unwrap_or(base.show),
        trigger: input.trigger.unwrap_or(base.trigger),
        axis_pointer: AxisPointerSpec {
            kind: axis_pointer.kind.unwrap_or(base.axis_pointer.kind),
            line_style: LineStyleSpec {
                color: pointer_style
                    .color
                    .unwrap_or_else(|| base.axis_pointer.line_style.color.clone()),
                width: pointer_style
                    .width
                    .unwrap_or(base.axis_pointer.line_style.width),
                kind: pointer_style
                    .kind
                    .unwrap_or(base.axis_pointer.line_style.kind),
            },
        },
        background_color: input
            .background_color
            .unwrap_or_else(|| base.background_color.clone()),
        border_color: input
            .border_color
            .unwrap_or_else(|| base.border_color.clone()),
        border_width: input.border_width.unwrap_or(base.border_width),
        text_style: TextStyleSpec {
            color: text_style
                .color
                .unwrap_or_else(|| base.text_style.color.clone()),
            font_size: text_style.font_size.unwrap_or(base.text_style.font_size),
        },
        padding: input.padding.unwrap_or(base.padding),
    }
}

#[cfg(test)]
mod tests {
    use super::{InputAxisSpec, InputOption, OneOrMany, normalize_input};
    use crate::core::option::{AxisPosition, ChartOption, GridSpec};

    #[test]
    fn singleton_grid_coerces_to_array() {
        let current = ChartOption::baseline();
        let input = InputOption {
            grid: Some(OneOrMany::One(GridSpec::default())),
            ..InputOption::default()
        };
        let normalized = normalize_input(input, &current);
        assert_eq!(normalized.grid.expect("grid supplied").len(), 1);
        assert!(normalized.x_axis.is_none(), "unsupplied keys stay None");
    }

    #[test]
    fn axis_defaults_fill_from_template_and_index() {
        let current = ChartOption::baseline();
        let input = InputOption {
            x_axis: Some(OneOrMany::Many(vec![
                InputAxisSpec::default(),
                InputAxisSpec {
                    min: Some(5.0.into()),
                    ..InputAxisSpec::default()
                },
            ])),
            ..InputOption::default()
        };
        let normalized = normalize_input(input, &current);
        let axes = normalized.x_axis.expect("axes supplied");
        assert_eq!(axes.len(), 2);
        // Sub-specs copied from the template axis.
        assert_eq!(axes[1].axis_tick, current.x_axis[0].axis_tick);
        // Omitted gridIndex resolves to the axis's own index.
        assert_eq!(axes[0].grid_index, 0);
        assert_eq!(axes[1].grid_index, 1);
    }

    #[test]
    fn illegal_axis_position_degrades_to_family_default() {
        let current = ChartOption::baseline();
        let input = InputOption {
            x_axis: Some(OneOrMany::One(InputAxisSpec {
                position: Some(AxisPosition::Left),
                ..InputAxisSpec::default()
            })),
            ..InputOption::default()
        };
        let normalized = normalize_input(input, &current);
        let axes = normalized.x_axis.expect("axes supplied");
        assert_eq!(axes[0].position, AxisPosition::Bottom);
    }

    #[test]
    fn input_option_parses_from_camel_case_json() {
        let input: InputOption = serde_json::from_str(
            r##"{
                "backgroundColor": "#101010",
                "grid": {"top": 40, "bottom": "15%"},
                "xAxis": {"min": 0, "max": 250, "splitNumber": 10},
                "yAxis": [{"min": "dataMin", "max": "dataMax", "position": "right"}],
                "series": [
                    {"type": "line", "data": [[0, 1], [1, 2]]},
                    {"type": "waterfall", "maxRows": 64, "scroll": "up"}
                ]
            }"##,
        )
        .expect("valid input JSON");

        assert_eq!(input.background_color.as_deref(), Some("#101010"));
        assert!(matches!(input.grid, Some(OneOrMany::One(_))));
        let series = input.series.expect("series supplied");
        assert_eq!(series.len(), 2);
        assert!(series[1].is_rolling_window());
    }
}
