//! The normalized configuration model.
//!
//! `ChartOption` is the canonical, always-fully-populated form every consumer
//! reads. Partial user input (`InputOption`, see `normalize`) is coerced into
//! this shape before merging, so downstream code never deals with missing
//! fields or singleton-vs-array ambiguity.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A box-model offset: literal pixels or a percentage of the container span.
///
/// Strings parse as `"12.5%"` or plain numerals; anything unparseable
/// resolves to zero so a malformed offset never aborts a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoxValue {
    Px(f64),
    Spec(String),
}

impl BoxValue {
    #[must_use]
    pub fn resolve(&self, total: f64) -> f64 {
        match self {
            Self::Px(value) => {
                if value.is_finite() {
                    *value
                } else {
                    0.0
                }
            }
            Self::Spec(raw) => {
                let trimmed = raw.trim();
                if let Some(percent) = trimmed.strip_suffix('%') {
                    match percent.trim().parse::<f64>() {
                        Ok(value) if value.is_finite() => value / 100.0 * total,
                        _ => 0.0,
                    }
                } else {
                    match trimmed.parse::<f64>() {
                        Ok(value) if value.is_finite() => value,
                        _ => 0.0,
                    }
                }
            }
        }
    }
}

impl From<f64> for BoxValue {
    fn from(value: f64) -> Self {
        Self::Px(value)
    }
}

impl From<&str> for BoxValue {
    fn from(value: &str) -> Self {
        Self::Spec(value.to_owned())
    }
}

/// Rectangular plotting region spec, addressed by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSpec {
    pub id: Option<String>,
    pub z: i32,
    pub zlevel: i32,
    pub top: BoxValue,
    pub bottom: BoxValue,
    pub left: BoxValue,
    pub right: BoxValue,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            id: None,
            z: 2,
            zlevel: 0,
            top: "10%".into(),
            bottom: "10%".into(),
            left: "10%".into(),
            right: "10%".into(),
        }
    }
}

/// Axis edge placement. X axes live on top/bottom, Y axes on left/right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Top,
    Bottom,
    Left,
    Right,
}

impl AxisPosition {
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Numeric axis kind. Only continuous value axes are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    #[default]
    Value,
}

/// Symbolic axis bound keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisBoundKeyword {
    DataMin,
    DataMax,
}

/// An axis domain bound: an explicit number or a data-derived keyword.
///
/// Symbolic bounds are a placeholder policy: `dataMin` resolves to 0 and
/// `dataMax` to 100, they are never computed from the bound data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisBound {
    Value(f64),
    Symbolic(AxisBoundKeyword),
}

impl AxisBound {
    /// Resolves the bound, degrading symbolic and non-finite values to `fallback`.
    #[must_use]
    pub fn resolve_or(self, fallback: f64) -> f64 {
        match self {
            Self::Value(value) if value.is_finite() => value,
            _ => fallback,
        }
    }
}

impl PartialEq for AxisBound {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // NaN bounds compare equal to themselves so repeated merges of the
            // same malformed input stay idempotent.
            (Self::Value(a), Self::Value(b)) => a == b || a.total_cmp(b) == Ordering::Equal,
            (Self::Symbolic(a), Self::Symbolic(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for AxisBound {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

/// Tick generation policy for a value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TickPolicy {
    /// `(max - min) / splitNumber` even division, min/max force-included.
    #[default]
    Even,
    /// "Nice numbers" steps rounded to 1/2/5/10 mantissas, bounds expanded outward.
    Nice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisLineSpec {
    pub show: bool,
    pub color: String,
}

impl Default for AxisLineSpec {
    fn default() -> Self {
        Self {
            show: true,
            color: "#fff".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisTickSpec {
    pub show: bool,
    pub length: f64,
    pub color: String,
    pub split_number: u32,
}

impl Default for AxisTickSpec {
    fn default() -> Self {
        Self {
            show: true,
            length: 6.0,
            color: "#fff".to_owned(),
            split_number: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisLabelSpec {
    pub show: bool,
    pub color: String,
    pub font_size: f64,
}

impl Default for AxisLabelSpec {
    fn default() -> Self {
        Self {
            show: true,
            color: "#fff".to_owned(),
            font_size: 12.0,
        }
    }
}

/// Stroke style shared by split lines and axis pointers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineStyleSpec {
    pub color: String,
    pub width: f64,
    #[serde(rename = "type")]
    pub kind: LineKind,
}

impl Default for LineStyleSpec {
    fn default() -> Self {
        Self {
            color: "#333".to_owned(),
            width: 1.0,
            kind: LineKind::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SplitLineSpec {
    pub show: bool,
    pub line_style: LineStyleSpec,
}

/// Optional axis caption rendered past the axis end (e.g. a unit like "MHz").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitSpec {
    pub show: bool,
    pub text: String,
    pub color: String,
    pub font_size: f64,
}

impl Default for UnitSpec {
    fn default() -> Self {
        Self {
            show: false,
            text: String::new(),
            color: "#fff".to_owned(),
            font_size: 12.0,
        }
    }
}

/// One coordinate axis bound to a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisSpec {
    pub id: Option<String>,
    pub grid_index: usize,
    pub z: i32,
    pub zlevel: i32,
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub min: AxisBound,
    pub max: AxisBound,
    pub position: AxisPosition,
    pub split_number: u32,
    pub tick_policy: TickPolicy,
    pub axis_line: AxisLineSpec,
    pub axis_tick: AxisTickSpec,
    pub axis_label: AxisLabelSpec,
    pub split_line: SplitLineSpec,
    pub unit: UnitSpec,
}

impl Default for AxisSpec {
    fn default() -> Self {
        Self::default_x()
    }
}

impl AxisSpec {
    /// Baseline X axis: bottom edge, 0..100, five splits.
    #[must_use]
    pub fn default_x() -> Self {
        Self {
            id: None,
            grid_index: 0,
            z: 0,
            zlevel: 0,
            show: true,
            kind: AxisKind::Value,
            min: AxisBound::Value(0.0),
            max: AxisBound::Value(100.0),
            position: AxisPosition::Bottom,
            split_number: 5,
            tick_policy: TickPolicy::Even,
            axis_line: AxisLineSpec::default(),
            axis_tick: AxisTickSpec::default(),
            axis_label: AxisLabelSpec::default(),
            split_line: SplitLineSpec::default(),
            unit: UnitSpec::default(),
        }
    }

    /// Baseline Y axis: left edge, 0..100, five splits.
    #[must_use]
    pub fn default_y() -> Self {
        Self {
            position: AxisPosition::Left,
            ..Self::default_x()
        }
    }
}

/// Raw sample rows. Line series store `[x, y]` pairs, waterfall series store
/// one sample row per frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesData(pub Vec<Vec<f64>>);

impl SeriesData {
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for SeriesData {
    fn eq(&self, other: &Self) -> bool {
        // NaN-tolerant row equality, so re-merging identical sample data
        // (spectra routinely carry NaN holes) reports no change.
        self.0.len() == other.0.len()
            && self.0.iter().zip(&other.0).all(|(a, b)| {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| x == y || x.total_cmp(y) == Ordering::Equal)
            })
    }
}

impl From<Vec<Vec<f64>>> for SeriesData {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self(rows)
    }
}

/// Scroll direction for rolling-window series: where new frames appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueRangeKeyword {
    Auto,
}

/// Sample value range used for color mapping: automatic or pinned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRange {
    Keyword(ValueRangeKeyword),
    Fixed([f64; 2]),
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::Keyword(ValueRangeKeyword::Auto)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineSeriesSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub show: bool,
    pub x_axis_index: usize,
    pub y_axis_index: usize,
    pub color: String,
    pub width: f64,
    pub z: i32,
    pub zlevel: i32,
    pub data: SeriesData,
}

impl Default for LineSeriesSpec {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            show: true,
            x_axis_index: 0,
            y_axis_index: 0,
            color: "#5470c6".to_owned(),
            width: 2.0,
            z: 3,
            zlevel: 0,
            data: SeriesData::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaterfallSeriesSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub show: bool,
    pub x_axis_index: usize,
    pub y_axis_index: usize,
    /// Ring-buffer capacity: the rolling window keeps this many frames.
    pub max_rows: usize,
    pub scroll: ScrollDirection,
    /// Color ramp name, passed through to the backend uninterpreted.
    pub color_map: String,
    pub value_range: ValueRange,
    pub z: i32,
    pub zlevel: i32,
    pub data: SeriesData,
}

impl Default for WaterfallSeriesSpec {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            show: true,
            x_axis_index: 0,
            y_axis_index: 0,
            max_rows: 100,
            scroll: ScrollDirection::default(),
            color_map: "viridis".to_owned(),
            value_range: ValueRange::default(),
            z: 1,
            zlevel: 0,
            data: SeriesData::default(),
        }
    }
}

/// A bound dataset rendered within a grid, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SeriesSpec {
    Line(LineSeriesSpec),
    Waterfall(WaterfallSeriesSpec),
}

impl SeriesSpec {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Line(spec) => spec.id.as_deref(),
            Self::Waterfall(spec) => spec.id.as_deref(),
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Line(spec) => spec.name.as_deref(),
            Self::Waterfall(spec) => spec.name.as_deref(),
        }
    }

    #[must_use]
    pub fn x_axis_index(&self) -> usize {
        match self {
            Self::Line(spec) => spec.x_axis_index,
            Self::Waterfall(spec) => spec.x_axis_index,
        }
    }

    #[must_use]
    pub fn y_axis_index(&self) -> usize {
        match self {
            Self::Line(spec) => spec.y_axis_index,
            Self::Waterfall(spec) => spec.y_axis_index,
        }
    }

    #[must_use]
    pub fn is_rolling_window(&self) -> bool {
        matches!(self, Self::Waterfall(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisualMapOrient {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyleSpec {
    pub color: String,
    pub font_size: f64,
}

impl Default for TextStyleSpec {
    fn default() -> Self {
        Self {
            color: "#fff".to_owned(),
            font_size: 12.0,
        }
    }
}

/// Visual-mapping legend: relates sample values to a color ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualMapSpec {
    pub show: bool,
    pub min: f64,
    pub max: f64,
    pub orient: VisualMapOrient,
    /// Ramp color stops, uninterpreted by the engine.
    pub colors: Vec<String>,
    pub series_index: Option<Vec<usize>>,
    pub item_width: f64,
    pub item_height: f64,
    pub right: BoxValue,
    pub bottom: BoxValue,
    pub text_style: TextStyleSpec,
    pub z: i32,
    pub zlevel: i32,
}

impl Default for VisualMapSpec {
    fn default() -> Self {
        Self {
            show: true,
            min: 0.0,
            max: 100.0,
            orient: VisualMapOrient::default(),
            colors: Vec::new(),
            series_index: None,
            item_width: 20.0,
            item_height: 140.0,
            right: "5%".into(),
            bottom: "10%".into(),
            text_style: TextStyleSpec::default(),
            z: 4,
            zlevel: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    #[default]
    Axis,
    Item,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisPointerKind {
    #[default]
    Line,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisPointerSpec {
    #[serde(rename = "type")]
    pub kind: AxisPointerKind,
    pub line_style: LineStyleSpec,
}

impl Default for AxisPointerSpec {
    fn default() -> Self {
        Self {
            kind: AxisPointerKind::Line,
            line_style: LineStyleSpec {
                color: "#fff".to_owned(),
                width: 1.0,
                kind: LineKind::Dashed,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TooltipSpec {
    pub show: bool,
    pub trigger: TooltipTrigger,
    pub axis_pointer: AxisPointerSpec,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub text_style: TextStyleSpec,
    pub padding: f64,
}

impl Default for TooltipSpec {
    fn default() -> Self {
        Self {
            show: true,
            trigger: TooltipTrigger::Axis,
            axis_pointer: AxisPointerSpec::default(),
            background_color: "rgba(50, 50, 50, 0.9)".to_owned(),
            border_color: "#333".to_owned(),
            border_width: 1.0,
            text_style: TextStyleSpec::default(),
            padding: 8.0,
        }
    }
}

/// The canonical, fully-populated chart configuration.
///
/// Every list field is always present (possibly empty) and every axis carries
/// a resolved `grid_index` and populated sub-specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOption {
    pub background_color: String,
    pub grid: Vec<GridSpec>,
    pub x_axis: Vec<AxisSpec>,
    pub y_axis: Vec<AxisSpec>,
    pub visual_map: Vec<VisualMapSpec>,
    pub tooltip: TooltipSpec,
    pub series: Vec<SeriesSpec>,
}

impl Default for ChartOption {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ChartOption {
    /// The fully-populated default configuration: one grid, one axis pair,
    /// no visual maps, no series.
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            background_color: "#000".to_owned(),
            grid: vec![GridSpec::default()],
            x_axis: vec![AxisSpec::default_x()],
            y_axis: vec![AxisSpec::default_y()],
            visual_map: Vec::new(),
            tooltip: TooltipSpec::default(),
            series: Vec::new(),
        }
    }
}
