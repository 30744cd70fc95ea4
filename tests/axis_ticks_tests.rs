use orchart::core::{
    AxisBound, AxisBoundKeyword, AxisEngine, AxisFamily, AxisPosition, ChartOption, LayoutEngine,
    Orientation, RenderContext, TickPolicy, nice_ticks,
};

fn context() -> RenderContext {
    RenderContext::new(800.0, 600.0)
}

fn layout_for(option: &ChartOption, family: AxisFamily, index: usize) -> orchart::core::AxisLayout {
    let mut layout = LayoutEngine::new();
    let mut engine = AxisEngine::new(family);
    engine
        .layout(option, context(), &mut layout, index)
        .expect("axis configured")
}

#[test]
fn even_ticks_include_bounds_when_span_divides_unevenly() {
    let mut option = ChartOption::baseline();
    option.x_axis[0].min = AxisBound::Value(0.0);
    option.x_axis[0].max = AxisBound::Value(97.0);
    option.x_axis[0].split_number = 5;

    let layout = layout_for(&option, AxisFamily::X, 0);
    let values: Vec<f64> = layout.ticks.iter().map(|tick| tick.value).collect();
    assert_eq!(values.first().copied(), Some(0.0));
    assert_eq!(values.last().copied(), Some(97.0));
    assert!(values.windows(2).all(|pair| pair[0] < pair[1]), "sorted ascending");
}

#[test]
fn horizontal_axis_maps_ticks_left_to_right() {
    let option = ChartOption::baseline();
    let layout = layout_for(&option, AxisFamily::X, 0);

    assert_eq!(layout.orient, Orientation::Horizontal);
    // Default grid on 800x600: x spans 80..720.
    assert_eq!(layout.pixel_range, (80.0, 720.0));
    let first = layout.ticks.first().expect("ticks");
    let last = layout.ticks.last().expect("ticks");
    assert!((first.coord - 80.0).abs() <= 1e-9);
    assert!((last.coord - 720.0).abs() <= 1e-9);
}

#[test]
fn vertical_axis_uses_inverted_pixel_range() {
    let option = ChartOption::baseline();
    let layout = layout_for(&option, AxisFamily::Y, 0);

    assert_eq!(layout.orient, Orientation::Vertical);
    // Screen Y grows downward: the min tick sits at the bottom edge.
    assert_eq!(layout.pixel_range, (540.0, 60.0));
    let first = layout.ticks.first().expect("ticks");
    let last = layout.ticks.last().expect("ticks");
    assert!((first.coord - 540.0).abs() <= 1e-9);
    assert!((last.coord - 60.0).abs() <= 1e-9);
}

#[test]
fn symbolic_bounds_degrade_to_placeholder_domain() {
    let mut option = ChartOption::baseline();
    option.y_axis[0].min = AxisBound::Symbolic(AxisBoundKeyword::DataMin);
    option.y_axis[0].max = AxisBound::Symbolic(AxisBoundKeyword::DataMax);

    let layout = layout_for(&option, AxisFamily::Y, 0);
    assert_eq!(layout.range, (0.0, 100.0));
}

#[test]
fn axis_line_follows_the_configured_edge() {
    let mut option = ChartOption::baseline();
    option.y_axis[0].position = AxisPosition::Right;

    let layout = layout_for(&option, AxisFamily::Y, 0);
    // Right edge of the default grid.
    assert!((layout.axis_line.x1 - 720.0).abs() <= 1e-9);
    assert!((layout.axis_line.x2 - 720.0).abs() <= 1e-9);
}

#[test]
fn nice_policy_expands_range_to_nice_bounds() {
    let mut option = ChartOption::baseline();
    option.x_axis[0].min = AxisBound::Value(0.0);
    option.x_axis[0].max = AxisBound::Value(97.0);
    option.x_axis[0].tick_policy = TickPolicy::Nice;

    let layout = layout_for(&option, AxisFamily::X, 0);
    let values: Vec<f64> = layout.ticks.iter().map(|tick| tick.value).collect();
    assert!(values[0] <= 0.0);
    assert!(*values.last().expect("ticks") >= 97.0);
    assert_eq!(layout.range, (values[0], *values.last().expect("ticks")));
}

#[test]
fn nice_ticks_handle_fractional_spans_without_drift() {
    let ticks = nice_ticks(0.0, 0.7, 5);
    assert!(*ticks.first().expect("ticks") <= 0.0);
    assert!(*ticks.last().expect("ticks") >= 0.7);
    for pair in ticks.windows(2) {
        // Drift correction keeps interior spacing exact to the step.
        assert!((pair[1] - pair[0] - (ticks[1] - ticks[0])).abs() <= 1e-12);
    }
}

#[test]
fn missing_axis_index_falls_back_to_axis_zero() {
    let option = ChartOption::baseline();
    let mut layout = LayoutEngine::new();
    let mut engine = AxisEngine::new(AxisFamily::X);

    let direct = engine
        .layout(&option, context(), &mut layout, 0)
        .expect("axis 0");
    let fallback = engine
        .layout(&option, context(), &mut layout, 9)
        .expect("falls back to axis 0");
    assert_eq!(direct.range, fallback.range);
    assert_eq!(direct.ticks, fallback.ticks);
}

#[test]
fn no_axes_configured_yields_none() {
    let option = ChartOption {
        x_axis: Vec::new(),
        ..ChartOption::baseline()
    };
    let mut layout = LayoutEngine::new();
    let mut engine = AxisEngine::new(AxisFamily::X);
    assert!(engine.layout(&option, context(), &mut layout, 0).is_none());
}

#[test]
fn cache_returns_same_layout_until_invalidated() {
    let mut option = ChartOption::baseline();
    let mut layout = LayoutEngine::new();
    let mut engine = AxisEngine::new(AxisFamily::X);

    let before = engine
        .layout(&option, context(), &mut layout, 0)
        .expect("axis 0");

    option.x_axis[0].max = AxisBound::Value(500.0);
    // Stale cache still answers with the old layout until invalidated.
    let cached = engine
        .layout(&option, context(), &mut layout, 0)
        .expect("cached");
    assert_eq!(before.range, cached.range);

    engine.invalidate();
    let fresh = engine
        .layout(&option, context(), &mut layout, 0)
        .expect("recomputed");
    assert_eq!(fresh.range, (0.0, 500.0));
}
