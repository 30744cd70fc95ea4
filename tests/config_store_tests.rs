use orchart::core::{
    AxisBound, ChartOption, ConfigStore, InputAxisSpec, InputOption, InputTooltipSpec, OneOrMany,
    OptionKey, VisualMapSpec,
};
use orchart::core::{LineSeriesSpec, SeriesSpec, WaterfallSeriesSpec};

fn line_series(data: Vec<Vec<f64>>) -> SeriesSpec {
    SeriesSpec::Line(LineSeriesSpec {
        data: data.into(),
        ..LineSeriesSpec::default()
    })
}

#[test]
fn merge_twice_with_same_input_is_idempotent() {
    let input = InputOption {
        background_color: Some("#101418".to_owned()),
        x_axis: Some(OneOrMany::One(InputAxisSpec {
            min: Some(AxisBound::Value(-50.0)),
            max: Some(AxisBound::Value(50.0)),
            ..InputAxisSpec::default()
        })),
        series: Some(vec![line_series(vec![vec![0.0, 1.0], vec![1.0, 4.0]])]),
        ..InputOption::default()
    };

    let mut store = ConfigStore::new();
    let first = store.merge(input.clone());
    assert_eq!(first.len(), 3);
    let second = store.merge(input);
    assert!(
        second.is_empty(),
        "identical resubmission must yield an empty change-set, got: {second}"
    );
}

#[test]
fn merged_option_is_always_complete() {
    let mut store = ConfigStore::new();
    let _ = store.merge(InputOption {
        x_axis: Some(OneOrMany::Many(vec![
            InputAxisSpec::default(),
            InputAxisSpec {
                max: Some(AxisBound::Value(500.0)),
                ..InputAxisSpec::default()
            },
        ])),
        series: Some(vec![line_series(Vec::new())]),
        ..InputOption::default()
    });

    let option = store.current();
    assert!(!option.grid.is_empty());
    assert_eq!(option.x_axis.len(), 2);
    assert!(!option.y_axis.is_empty());

    // Every axis carries populated sub-specs copied from the index-0 template.
    for axis in &option.x_axis {
        assert!(!axis.axis_line.color.is_empty());
        assert!(axis.axis_tick.length > 0.0);
        assert!(axis.axis_label.font_size > 0.0);
    }
    // The second axis defaulted its grid index to its own position.
    assert_eq!(option.x_axis[1].grid_index, 1);
}

#[test]
fn unsupplied_keys_are_never_reported_changed() {
    let mut store = ConfigStore::new();
    let changed = store.merge(InputOption {
        tooltip: Some(InputTooltipSpec {
            padding: Some(12.0),
            ..InputTooltipSpec::default()
        }),
        ..InputOption::default()
    });

    assert_eq!(changed.len(), 1);
    assert!(changed.contains(OptionKey::Tooltip));
    // The untouched fields still hold their defaults.
    assert_eq!(store.current().grid, ChartOption::baseline().grid);
    assert_eq!(store.current().series, ChartOption::baseline().series);
}

#[test]
fn tooltip_merges_field_wise_onto_current() {
    let mut store = ConfigStore::new();
    let _ = store.merge(InputOption {
        tooltip: Some(InputTooltipSpec {
            padding: Some(12.0),
            ..InputTooltipSpec::default()
        }),
        ..InputOption::default()
    });

    let tooltip = &store.current().tooltip;
    assert_eq!(tooltip.padding, 12.0);
    // Unsupplied tooltip fields survive from the defaults.
    assert!(tooltip.show);
    assert_eq!(tooltip.border_width, 1.0);
}

#[test]
fn visual_map_joins_change_set_when_series_change() {
    let mut store = ConfigStore::new();

    let changed = store.merge(InputOption {
        series: Some(vec![SeriesSpec::Waterfall(WaterfallSeriesSpec {
            id: Some("spectrum".to_owned()),
            ..WaterfallSeriesSpec::default()
        })]),
        visual_map: Some(OneOrMany::One(VisualMapSpec {
            min: -120.0,
            max: 0.0,
            series_index: Some(vec![0]),
            ..VisualMapSpec::default()
        })),
        ..InputOption::default()
    });

    assert!(changed.contains(OptionKey::Series));
    assert!(changed.contains(OptionKey::VisualMap));
}

#[test]
fn malformed_values_merge_without_aborting() {
    let mut store = ConfigStore::new();
    let changed = store.merge(InputOption {
        x_axis: Some(OneOrMany::One(InputAxisSpec {
            min: Some(AxisBound::Value(f64::NAN)),
            ..InputAxisSpec::default()
        })),
        ..InputOption::default()
    });

    // The malformed bound is stored as-is; consumers default it at read time.
    assert!(changed.contains(OptionKey::XAxis));
    assert_eq!(store.current().x_axis[0].min.resolve_or(0.0), 0.0);

    // Re-merging the same NaN bound stays idempotent.
    let changed = store.merge(InputOption {
        x_axis: Some(OneOrMany::One(InputAxisSpec {
            min: Some(AxisBound::Value(f64::NAN)),
            ..InputAxisSpec::default()
        })),
        ..InputOption::default()
    });
    assert!(changed.is_empty());
}

#[test]
fn input_parses_from_json_with_singleton_coercion() {
    let input: InputOption = serde_json::from_str(
        r#"{
            "grid": {"left": "5%", "right": 30},
            "xAxis": {"min": 0, "max": 1000},
            "series": [{"type": "line", "id": "trace", "data": [[0, 0], [10, 5]]}]
        }"#,
    )
    .expect("valid JSON input");

    let mut store = ConfigStore::new();
    let changed = store.merge(input);
    assert!(changed.contains(OptionKey::Grid));
    assert!(changed.contains(OptionKey::XAxis));
    assert!(changed.contains(OptionKey::Series));
    assert_eq!(store.current().series[0].id(), Some("trace"));
}
