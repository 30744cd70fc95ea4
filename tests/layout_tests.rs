use orchart::core::{ChartOption, GridSpec, LayoutEngine, Rect, RenderContext};
use proptest::prelude::*;

fn context() -> RenderContext {
    RenderContext::new(1000.0, 500.0)
}

fn option_with_grid(grid: GridSpec) -> ChartOption {
    ChartOption {
        grid: vec![grid],
        ..ChartOption::baseline()
    }
}

#[test]
fn mixed_percent_and_pixel_offsets_resolve() {
    let option = option_with_grid(GridSpec {
        top: 50.0.into(),
        bottom: "20%".into(),
        left: "10%".into(),
        right: 100.0.into(),
        ..GridSpec::default()
    });
    let mut layout = LayoutEngine::new();
    let rect = layout.rect(&option, context(), 0);
    assert_eq!(rect, Rect::new(100.0, 50.0, 800.0, 350.0));
}

#[test]
fn malformed_offsets_degrade_to_zero() {
    let option = option_with_grid(GridSpec {
        top: "oops".into(),
        bottom: "%".into(),
        left: "".into(),
        right: "".into(),
        ..GridSpec::default()
    });
    let mut layout = LayoutEngine::new();
    let rect = layout.rect(&option, context(), 0);
    assert_eq!(rect, Rect::new(0.0, 0.0, 1000.0, 500.0));
}

#[test]
fn no_grids_yields_zero_rect() {
    let option = ChartOption {
        grid: Vec::new(),
        ..ChartOption::baseline()
    };
    let mut layout = LayoutEngine::new();
    assert_eq!(layout.rect(&option, context(), 0), Rect::ZERO);
}

#[test]
fn cache_is_cleared_wholesale_on_invalidate() {
    let option = ChartOption::baseline();
    let mut layout = LayoutEngine::new();
    let before = layout.rect(&option, context(), 0);

    // Same engine, new container: stale cache would return the old rect.
    layout.invalidate();
    let after = layout.rect(&option, RenderContext::new(2000.0, 1000.0), 0);
    assert_ne!(before, after);
    assert_eq!(after.width, 1600.0);
}

proptest! {
    /// Oversized margins clamp to a zero dimension, never a negative one.
    #[test]
    fn rect_dimensions_are_never_negative(
        left in 0.0f64..2000.0,
        right in 0.0f64..2000.0,
        top in 0.0f64..2000.0,
        bottom in 0.0f64..2000.0,
    ) {
        let option = option_with_grid(GridSpec {
            top: top.into(),
            bottom: bottom.into(),
            left: left.into(),
            right: right.into(),
            ..GridSpec::default()
        });
        let mut layout = LayoutEngine::new();
        let rect = layout.rect(&option, context(), 0);
        prop_assert!(rect.width >= 0.0);
        prop_assert!(rect.height >= 0.0);
        if left + right > 1000.0 {
            prop_assert_eq!(rect.width, 0.0);
        }
    }
}
