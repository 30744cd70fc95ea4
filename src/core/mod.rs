pub mod axis;
pub mod coord;
pub mod layout;
pub mod normalize;
pub mod option;
pub mod ring;
pub mod store;

pub use axis::{
    AxisEngine, AxisFamily, AxisLayout, AxisLine, AxisTick, Orientation, format_tick_label,
    nice_step, nice_ticks,
};
pub use coord::{AxisTransform, CoordinateResolver, CoordinateTransform, Finder, linear_map};
pub use layout::{LayoutEngine, Rect, RenderContext};
pub use normalize::{InputAxisSpec, InputOption, InputTooltipSpec, OneOrMany};
pub use option::{
    AxisBound, AxisBoundKeyword, AxisKind, AxisLabelSpec, AxisLineSpec, AxisPointerKind,
    AxisPointerSpec, AxisPosition, AxisSpec, AxisTickSpec, BoxValue, ChartOption, GridSpec,
    LineKind, LineSeriesSpec, LineStyleSpec, ScrollDirection, SeriesData, SeriesSpec,
    SplitLineSpec, TextStyleSpec, TickPolicy, TooltipSpec, TooltipTrigger, UnitSpec, ValueRange,
    ValueRangeKeyword, VisualMapOrient, VisualMapSpec, WaterfallSeriesSpec,
};
pub use ring::RingBuffer;
pub use store::{ChangeSet, ConfigStore, OptionKey};
