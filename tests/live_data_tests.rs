use orchart::api::units::{LineSeriesUnit, SeriesKey, WaterfallSeriesUnit};
use orchart::api::{ChartEngine, UnitKind};
use orchart::core::{
    InputOption, LineSeriesSpec, RingBuffer, SeriesSpec, WaterfallSeriesSpec,
};
use orchart::error::ChartError;
use orchart::render::NullSurface;

fn engine_with_series() -> ChartEngine<NullSurface> {
    let mut engine = ChartEngine::new(NullSurface::default(), 800.0, 600.0).expect("engine init");
    engine
        .set_option(InputOption::new().with_series(vec![
            SeriesSpec::Line(LineSeriesSpec {
                id: Some("trace".to_owned()),
                data: vec![vec![0.0, 1.0], vec![1.0, 2.0]].into(),
                ..LineSeriesSpec::default()
            }),
            SeriesSpec::Waterfall(WaterfallSeriesSpec {
                id: Some("spectrum".to_owned()),
                max_rows: 4,
                ..WaterfallSeriesSpec::default()
            }),
        ]))
        .expect("series configured");
    engine
}

#[test]
fn ring_buffer_evicts_oldest_beyond_capacity() {
    let mut ring = RingBuffer::new(3);
    for frame in 0..4 {
        ring.push(vec![f64::from(frame)]);
    }
    assert_eq!(ring.len(), 3);
    assert_eq!(ring.oldest(), Some(&vec![1.0]));
    assert_eq!(ring.newest(), Some(&vec![3.0]));
}

#[test]
fn rolling_window_push_evicts_fifo() {
    let mut engine = engine_with_series();

    // Capacity 4: pushing 5 frames leaves exactly 4, oldest evicted first.
    for frame in 0..5 {
        engine
            .push_frame("spectrum", vec![f64::from(frame); 8])
            .expect("push frame");
    }

    let frames = waterfall_frames(&mut engine, "spectrum");
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0][0], 1.0, "frame 0 must have been evicted");
    assert_eq!(frames[3][0], 4.0);
}

#[test]
fn line_push_replaces_the_latest_sample() {
    let mut engine = engine_with_series();
    engine
        .push_frame("trace", vec![1.0, 9.5])
        .expect("push frame");

    let option = engine.option().clone();
    // The configured option is untouched: the push path bypasses merge.
    match &option.series[0] {
        SeriesSpec::Line(spec) => assert_eq!(spec.data.rows()[1], vec![1.0, 2.0]),
        SeriesSpec::Waterfall(_) => panic!("expected the line series first"),
    }

    // The unit's live model has the replacement in place of the old sample.
    let key = SeriesKey::Id("trace".to_owned());
    let rows = engine
        .scheduler_mut()
        .unit_mut::<LineSeriesUnit>(UnitKind::LineSeries)
        .expect("line unit registered")
        .rows(&key)
        .expect("series known")
        .to_vec();
    assert_eq!(rows, vec![vec![0.0, 1.0], vec![1.0, 9.5]]);
}

#[test]
fn push_addressed_by_index_reaches_the_same_series() {
    let mut engine = engine_with_series();
    engine
        .push_frame_at(1, vec![0.5; 8])
        .expect("push by position");
    assert_eq!(waterfall_frames(&mut engine, "spectrum").len(), 1);
}

#[test]
fn push_to_unknown_series_is_an_error() {
    let mut engine = engine_with_series();
    match engine.push_frame("nope", vec![1.0]) {
        Err(ChartError::UnknownSeries(id)) => assert_eq!(id, "nope"),
        other => panic!("expected UnknownSeries, got {other:?}"),
    }
    match engine.push_frame_at(9, vec![1.0]) {
        Err(ChartError::UnknownSeries(_)) => {}
        other => panic!("expected UnknownSeries, got {other:?}"),
    }
}

#[test]
fn push_frame_all_reaches_every_rolling_window() {
    let mut engine = ChartEngine::new(NullSurface::default(), 800.0, 600.0).expect("engine init");
    engine
        .set_option(InputOption::new().with_series(vec![
            SeriesSpec::Waterfall(WaterfallSeriesSpec {
                id: Some("a".to_owned()),
                max_rows: 8,
                ..WaterfallSeriesSpec::default()
            }),
            SeriesSpec::Waterfall(WaterfallSeriesSpec {
                id: Some("b".to_owned()),
                max_rows: 8,
                ..WaterfallSeriesSpec::default()
            }),
        ]))
        .expect("series configured");

    engine.push_frame_all(&[1.0, 2.0, 3.0]).expect("broadcast");
    assert_eq!(waterfall_frames(&mut engine, "a").len(), 1);
    assert_eq!(waterfall_frames(&mut engine, "b").len(), 1);
}

#[test]
fn pushed_frames_survive_unrelated_option_churn() {
    let mut engine = engine_with_series();
    engine
        .push_frame("spectrum", vec![0.25; 8])
        .expect("push frame");

    // A tooltip-only change must not reseed the rolling window.
    engine
        .set_option_json(r#"{"tooltip": {"padding": 4}}"#)
        .expect("tooltip update");
    assert_eq!(waterfall_frames(&mut engine, "spectrum").len(), 1);
}

#[test]
fn reconfiguring_capacity_evicts_from_the_front() {
    let mut engine = engine_with_series();
    for frame in 0..4 {
        engine
            .push_frame("spectrum", vec![f64::from(frame); 4])
            .expect("push frame");
    }

    // Shrink the window; the series list itself is otherwise unchanged.
    engine
        .set_option_json(
            r#"{"series": [
                {"type": "line", "id": "trace", "data": [[0, 1], [1, 2]]},
                {"type": "waterfall", "id": "spectrum", "maxRows": 2}
            ]}"#,
        )
        .expect("capacity update");

    let frames = waterfall_frames(&mut engine, "spectrum");
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0][0], 2.0);
    assert_eq!(frames[1][0], 3.0);
}

fn waterfall_frames(engine: &mut ChartEngine<NullSurface>, id: &str) -> Vec<Vec<f64>> {
    let key = SeriesKey::Id(id.to_owned());
    engine
        .scheduler_mut()
        .unit_mut::<WaterfallSeriesUnit>(UnitKind::WaterfallSeries)
        .expect("waterfall unit registered")
        .frames(&key)
        .expect("series known")
}
